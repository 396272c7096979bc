//! Unit-count formulas
//!
//! Pure functions from observed strength and resources to whole unit
//! counts. Fractional results are floored: mobile points cannot be spent in
//! fractions.

use crate::core::config::HeuristicsConfig;

fn floor_count(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    value.floor() as u32
}

/// `min(base + floor(strength / divisor), cap)`
fn scaled_by_strength(base: u32, strength: f64, divisor: f64, cap: u32) -> u32 {
    base.saturating_add(floor_count(strength / divisor)).min(cap)
}

/// Defensive interceptors against an opponent holding `opponent_mp`
pub fn interceptor_count(opponent_mp: f64, config: &HeuristicsConfig) -> u32 {
    floor_count((opponent_mp / config.interceptor_divisor).max(config.interceptor_floor))
}

/// Interceptors sent ahead of demolishers to soak turret fire
pub fn tank_count(edge_strength: f64, config: &HeuristicsConfig) -> u32 {
    scaled_by_strength(
        config.tank_base,
        edge_strength,
        config.siege_divisor,
        config.siege_cap,
    )
}

/// Demolishers sent against a trapped lane
pub fn siege_count(edge_strength: f64, config: &HeuristicsConfig) -> u32 {
    scaled_by_strength(
        config.siege_base,
        edge_strength,
        config.siege_divisor,
        config.siege_cap,
    )
}

/// Size of the leading scout wave
pub fn first_wave_count(edge_strength: f64, config: &HeuristicsConfig) -> u32 {
    scaled_by_strength(
        config.scout_base,
        edge_strength,
        config.scout_divisor,
        config.scout_cap,
    )
}

/// Size of the trailing scout wave: whatever the leading wave leaves over
pub fn second_wave_count(own_mp: f64, first_wave: u32) -> u32 {
    floor_count(own_mp - f64::from(first_wave))
}
