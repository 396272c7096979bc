//! Strategy configuration with documented constants
//!
//! Every tunable number and hand-picked cell the bot uses lives here. Cells
//! are given for the left flank only; the right flank is always the
//! horizontal mirror, so the two lanes cannot drift apart.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arena::{in_arena, is_own_half, mirror, mirror_point, ArenaEdge, HALF_ARENA};
use crate::core::error::{BotError, Result};
use crate::core::types::{Coord, Flank, MobileKind, ResourceCost, StructureKind, UnitKind};

/// Decision thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Walls below this health ratio are removed for a partial refund
    pub refund_wall: f64,
    /// Turrets below this health ratio are removed for a partial refund
    pub refund_turret: f64,
    /// Opponent mobile points at which a flank rush is expected
    pub block_edge_enemy_mp: f64,
    /// Opponent mobile points above which freshly placed edge walls are upgraded
    pub upgrade_edge_wall_enemy_mp: f64,
    /// Below this many own mobile points we always defend next turn
    pub attack_min_mp: f64,
    /// Above this many own mobile points we attack regardless of the opponent
    pub attack_eager_mp: f64,
    /// Structure points the build plan must leave untouched
    pub build_reserve: f64,
    /// Lower the rush threshold to the smallest attack the opponent has launched
    pub adaptive_block_threshold: bool,
    /// Never lower the learned rush threshold below this
    pub adaptive_block_floor: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            refund_wall: 0.5,
            refund_turret: 0.3,
            block_edge_enemy_mp: 12.0,
            upgrade_edge_wall_enemy_mp: 15.0,
            attack_min_mp: 10.0,
            attack_eager_mp: 20.0,
            build_reserve: 0.0,
            adaptive_block_threshold: false,
            adaptive_block_floor: 5.0,
        }
    }
}

/// Constants of the unit-count formulas
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// Interceptors = max(opponent MP / divisor, floor)
    pub interceptor_divisor: f64,
    pub interceptor_floor: f64,
    /// Tanking interceptors = min(tank_base + floor(strength / siege_divisor), siege_cap)
    pub tank_base: u32,
    /// Demolishers = min(siege_base + floor(strength / siege_divisor), siege_cap)
    pub siege_base: u32,
    pub siege_divisor: f64,
    pub siege_cap: u32,
    /// First scout wave = min(scout_base + floor(strength / scout_divisor), scout_cap)
    pub scout_base: u32,
    pub scout_divisor: f64,
    pub scout_cap: u32,
    /// Column of the leading scout wave's spawn cell on the bottom-left edge
    pub scout_lead_x: i32,
    /// Column offset of the trailing wave from the leading one
    pub scout_gap: i32,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            interceptor_divisor: 4.0,
            interceptor_floor: 3.0,
            tank_base: 2,
            siege_base: 2,
            siege_divisor: 10.0,
            siege_cap: 5,
            scout_base: 5,
            scout_divisor: 7.0,
            scout_cap: 10,
            scout_lead_x: 4,
            scout_gap: 1,
        }
    }
}

/// Hand-picked cells of the left flank
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlankCellsConfig {
    /// Own walls that seal the flank when all are present
    pub edge_block: Vec<Coord>,
    /// Start cell of the openness probe
    pub probe: Coord,
    /// Edge the probe path heads for
    pub probe_target: ArenaEdge,
    /// A probe path stepping below this row counts as blocked
    pub probe_boundary_row: i32,
    /// Number of leading probe steps inspected
    pub probe_horizon: usize,
    /// Opponent cells sampled for defense strength
    pub strength_samples: Vec<Coord>,
    /// Half-cell anchor turret distances are measured from
    pub strength_anchor: [f64; 2],
    /// Row on which opponent walls add a flat strength bonus
    pub edge_wall_row: i32,
    /// Deep opponent cell that signals a trap behind an open lane
    pub misdirect_trap: Coord,
    /// Where defensive interceptors deploy
    pub defense_interceptor: Coord,
    /// Where tanking interceptors deploy against a trap
    pub tank_spawn: Coord,
    /// Where demolishers deploy against a trap
    pub siege_spawn: Coord,
    /// Own cells kept free of structures while attacking through this flank
    pub attack_lane_clear: Vec<Coord>,
}

impl Default for FlankCellsConfig {
    fn default() -> Self {
        Self {
            edge_block: vec![Coord::new(0, 13), Coord::new(1, 13)],
            probe: Coord::new(1, 12),
            probe_target: ArenaEdge::TopRight,
            probe_boundary_row: 12,
            probe_horizon: 10,
            strength_samples: vec![
                Coord::new(0, 14),
                Coord::new(1, 14),
                Coord::new(2, 14),
                Coord::new(3, 14),
                Coord::new(1, 15),
                Coord::new(2, 15),
                Coord::new(3, 15),
                Coord::new(2, 16),
            ],
            strength_anchor: [0.5, 13.0],
            edge_wall_row: 14,
            misdirect_trap: Coord::new(0, 14),
            defense_interceptor: Coord::new(4, 9),
            tank_spawn: Coord::new(1, 12),
            siege_spawn: Coord::new(2, 11),
            attack_lane_clear: vec![Coord::new(0, 13), Coord::new(1, 13)],
        }
    }
}

/// Cells of one flank, already mirrored for the right side
#[derive(Debug, Clone, PartialEq)]
pub struct FlankLayout {
    pub flank: Flank,
    pub edge_block: Vec<Coord>,
    pub probe: Coord,
    pub probe_target: ArenaEdge,
    pub probe_boundary_row: i32,
    pub probe_horizon: usize,
    pub strength_samples: Vec<Coord>,
    pub strength_anchor: [f64; 2],
    pub edge_wall_row: i32,
    pub misdirect_trap: Coord,
    pub defense_interceptor: Coord,
    pub tank_spawn: Coord,
    pub siege_spawn: Coord,
    pub attack_lane_clear: Vec<Coord>,
    /// Leading and trailing scout spawn cells for an attack through this flank.
    /// Scouts cross the board diagonally, so they start on the opposite side.
    pub scout_cells: [Coord; 2],
}

fn mirror_edge(edge: ArenaEdge) -> ArenaEdge {
    match edge {
        ArenaEdge::TopLeft => ArenaEdge::TopRight,
        ArenaEdge::TopRight => ArenaEdge::TopLeft,
        ArenaEdge::BottomLeft => ArenaEdge::BottomRight,
        ArenaEdge::BottomRight => ArenaEdge::BottomLeft,
    }
}

impl FlankCellsConfig {
    /// Resolve the cells of `flank`, mirroring the configured left side
    pub fn layout(&self, flank: Flank, heuristics: &HeuristicsConfig) -> FlankLayout {
        let lead_x = heuristics.scout_lead_x;
        let trail_x = lead_x - heuristics.scout_gap;
        let lead = Coord::new(lead_x, HALF_ARENA - lead_x - 1);
        let trail = Coord::new(trail_x, HALF_ARENA - trail_x - 1);

        match flank {
            Flank::Left => FlankLayout {
                flank,
                edge_block: self.edge_block.clone(),
                probe: self.probe,
                probe_target: self.probe_target,
                probe_boundary_row: self.probe_boundary_row,
                probe_horizon: self.probe_horizon,
                strength_samples: self.strength_samples.clone(),
                strength_anchor: self.strength_anchor,
                edge_wall_row: self.edge_wall_row,
                misdirect_trap: self.misdirect_trap,
                defense_interceptor: self.defense_interceptor,
                tank_spawn: self.tank_spawn,
                siege_spawn: self.siege_spawn,
                attack_lane_clear: self.attack_lane_clear.clone(),
                scout_cells: [mirror(lead), mirror(trail)],
            },
            Flank::Right => FlankLayout {
                flank,
                edge_block: self.edge_block.iter().copied().map(mirror).collect(),
                probe: mirror(self.probe),
                probe_target: mirror_edge(self.probe_target),
                probe_boundary_row: self.probe_boundary_row,
                probe_horizon: self.probe_horizon,
                strength_samples: self.strength_samples.iter().copied().map(mirror).collect(),
                strength_anchor: mirror_point(self.strength_anchor),
                edge_wall_row: self.edge_wall_row,
                misdirect_trap: mirror(self.misdirect_trap),
                defense_interceptor: mirror(self.defense_interceptor),
                tank_spawn: mirror(self.tank_spawn),
                siege_spawn: mirror(self.siege_spawn),
                attack_lane_clear: self.attack_lane_clear.iter().copied().map(mirror).collect(),
                scout_cells: [lead, trail],
            },
        }
    }
}

/// Build and upgrade price of a structure
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StructureCost {
    pub build: f64,
    pub upgrade: f64,
}

/// Unit price table as published in the engine's game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitCosts {
    pub wall: StructureCost,
    pub support: StructureCost,
    pub turret: StructureCost,
    pub scout: f64,
    pub demolisher: f64,
    pub interceptor: f64,
}

impl Default for UnitCosts {
    fn default() -> Self {
        Self {
            wall: StructureCost {
                build: 1.0,
                upgrade: 1.0,
            },
            support: StructureCost {
                build: 4.0,
                upgrade: 4.0,
            },
            turret: StructureCost {
                build: 2.0,
                upgrade: 4.0,
            },
            scout: 1.0,
            demolisher: 3.0,
            interceptor: 1.0,
        }
    }
}

impl UnitCosts {
    pub fn cost_of(&self, kind: UnitKind, upgrade: bool) -> ResourceCost {
        match kind {
            UnitKind::Structure(structure) => {
                let entry = self.structure(structure);
                ResourceCost::structure(if upgrade { entry.upgrade } else { entry.build })
            }
            UnitKind::Mobile(mobile) => ResourceCost::mobile(self.mobile(mobile)),
        }
    }

    pub fn structure(&self, kind: StructureKind) -> StructureCost {
        match kind {
            StructureKind::Wall => self.wall,
            StructureKind::Support => self.support,
            StructureKind::Turret => self.turret,
        }
    }

    pub fn mobile(&self, kind: MobileKind) -> f64 {
        match kind {
            MobileKind::Scout => self.scout,
            MobileKind::Demolisher => self.demolisher,
            MobileKind::Interceptor => self.interceptor,
        }
    }
}

/// Complete strategy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Name of this strategy variant (set from filename)
    #[serde(default)]
    pub name: String,
    /// Seed for the flank-closing coin flip; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub heuristics: HeuristicsConfig,
    #[serde(default)]
    pub cells: FlankCellsConfig,
    #[serde(default)]
    pub costs: UnitCosts,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            seed: None,
            thresholds: ThresholdConfig::default(),
            heuristics: HeuristicsConfig::default(),
            cells: FlankCellsConfig::default(),
            costs: UnitCosts::default(),
        }
    }
}

impl StrategyConfig {
    /// Cells of one flank
    pub fn layout(&self, flank: Flank) -> FlankLayout {
        self.cells.layout(flank, &self.heuristics)
    }

    /// Parse a TOML document and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: StrategyConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        for (name, ratio) in [("refund_wall", t.refund_wall), ("refund_turret", t.refund_turret)] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(invalid(format!("{} ({}) must be within [0, 1]", name, ratio)));
            }
        }
        if t.build_reserve < 0.0 {
            return Err(invalid(format!(
                "build_reserve ({}) must not be negative",
                t.build_reserve
            )));
        }
        if t.attack_min_mp > t.attack_eager_mp {
            return Err(invalid(format!(
                "attack_min_mp ({}) should be <= attack_eager_mp ({})",
                t.attack_min_mp, t.attack_eager_mp
            )));
        }

        let h = &self.heuristics;
        for (name, divisor) in [
            ("interceptor_divisor", h.interceptor_divisor),
            ("siege_divisor", h.siege_divisor),
            ("scout_divisor", h.scout_divisor),
        ] {
            if divisor <= 0.0 {
                return Err(invalid(format!("{} ({}) must be positive", name, divisor)));
            }
        }
        if h.siege_cap < h.siege_base || h.siege_cap < h.tank_base {
            return Err(invalid(format!(
                "siege_cap ({}) should be >= siege_base ({}) and tank_base ({})",
                h.siege_cap, h.siege_base, h.tank_base
            )));
        }
        if h.scout_cap < h.scout_base {
            return Err(invalid(format!(
                "scout_cap ({}) should be >= scout_base ({})",
                h.scout_cap, h.scout_base
            )));
        }
        let trail_x = h.scout_lead_x - h.scout_gap;
        if h.scout_gap < 1 || trail_x < 0 || h.scout_lead_x >= HALF_ARENA {
            return Err(invalid(format!(
                "scout lanes must satisfy 0 <= lead_x - gap < lead_x < {} (lead_x {}, gap {})",
                HALF_ARENA, h.scout_lead_x, h.scout_gap
            )));
        }

        let c = &self.cells;
        if c.probe_horizon == 0 {
            return Err(invalid("probe_horizon must be at least 1".to_string()));
        }
        if c.edge_block.is_empty() {
            return Err(invalid("edge_block needs at least one cell".to_string()));
        }
        let own_cells = c
            .edge_block
            .iter()
            .chain(c.attack_lane_clear.iter())
            .copied()
            .chain([c.probe, c.defense_interceptor, c.tank_spawn, c.siege_spawn]);
        for cell in own_cells {
            if !is_own_half(cell) {
                return Err(invalid(format!("cell {} is not on our half", cell)));
            }
        }
        for cell in c.strength_samples.iter().chain(std::iter::once(&c.misdirect_trap)) {
            if !in_arena(*cell) || is_own_half(*cell) {
                return Err(invalid(format!("cell {} is not on the opponent's half", cell)));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> BotError {
    BotError::InvalidConfig(message)
}

/// Load a strategy from a TOML file; the file stem becomes the strategy name
pub fn load_strategy(path: &Path) -> Result<StrategyConfig> {
    let contents = fs::read_to_string(path)?;
    let mut config = StrategyConfig::from_toml_str(&contents)?;
    if config.name.is_empty() {
        config.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(config)
}
