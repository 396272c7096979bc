//! Edge analysis: which lanes are open and how well the opponent guards them
//!
//! `BattlefieldView` is the bot's per-turn reading of the board, taken once
//! at the start of the turn and updated only by our own edge-blocking.

use serde::Serialize;

use crate::core::config::{FlankLayout, StrategyConfig};
use crate::core::types::{Currency, Flank, Side, StructureKind, Turn};
use crate::oracle::GameOracle;

/// Strength of a turret at the sampled cells, divided by its distance to the anchor
const TURRET_WEIGHT: f64 = 5.0;
const UPGRADED_TURRET_WEIGHT: f64 = 25.0;
/// Flat strength of a wall on the edge row
const EDGE_WALL_WEIGHT: f64 = 1.0;
const UPGRADED_EDGE_WALL_WEIGHT: f64 = 3.0;

/// Probe whether the opponent's layout stops a straight run through `layout`
///
/// Fixed-horizon check: a probe path shorter than the horizon, or one that
/// steps below the boundary row within the horizon, counts as blocked.
pub fn is_edge_blocked<O: GameOracle + ?Sized>(oracle: &O, layout: &FlankLayout) -> bool {
    let path = oracle.find_path_to_edge(layout.probe, layout.probe_target);
    if path.len() < layout.probe_horizon {
        return true;
    }
    path.iter()
        .take(layout.probe_horizon)
        .any(|cell| cell.y < layout.probe_boundary_row)
}

/// Score the opponent's fortifications around the flank corner
pub fn edge_strength<O: GameOracle + ?Sized>(oracle: &O, layout: &FlankLayout) -> f64 {
    let mut strength = 0.0;
    for &cell in &layout.strength_samples {
        let Some(unit) = oracle.stationary_unit_at(cell) else {
            continue;
        };
        strength += match unit.kind {
            StructureKind::Turret => {
                // The anchor sits half a cell off the grid, so this is never zero
                let distance = cell.distance_from(layout.strength_anchor);
                let weight = if unit.upgraded {
                    UPGRADED_TURRET_WEIGHT
                } else {
                    TURRET_WEIGHT
                };
                weight / distance
            }
            StructureKind::Wall if cell.y == layout.edge_wall_row => {
                if unit.upgraded {
                    UPGRADED_EDGE_WALL_WEIGHT
                } else {
                    EDGE_WALL_WEIGHT
                }
            }
            _ => 0.0,
        };
    }
    strength
}

/// Check whether every blocking cell of our own flank holds a structure
pub fn is_own_edge_blocked<O: GameOracle + ?Sized>(oracle: &O, layout: &FlankLayout) -> bool {
    layout
        .edge_block
        .iter()
        .all(|cell| oracle.contains_stationary_unit(*cell))
}

/// The lane is open but a structure waits on the deep corner cell
pub fn is_misdirecting<O: GameOracle + ?Sized>(
    oracle: &O,
    layout: &FlankLayout,
    edge_blocked: bool,
) -> bool {
    !edge_blocked && oracle.contains_stationary_unit(layout.misdirect_trap)
}

/// Observed state of one flank
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeState {
    /// The opponent's layout closes the lane (probe heuristic)
    pub opponent_blocked: bool,
    /// Our own blocking walls are all in place
    pub own_blocked: bool,
    /// Opponent defense strength around the corner, never negative
    pub strength: f64,
    /// Lane is open but guarded by a trap structure
    pub misdirecting: bool,
}

impl EdgeState {
    pub fn observe<O: GameOracle + ?Sized>(oracle: &O, layout: &FlankLayout) -> Self {
        let opponent_blocked = is_edge_blocked(oracle, layout);
        Self {
            opponent_blocked,
            own_blocked: is_own_edge_blocked(oracle, layout),
            strength: edge_strength(oracle, layout),
            misdirecting: is_misdirecting(oracle, layout, opponent_blocked),
        }
    }

    /// Neither side closes the lane
    pub fn is_open(&self) -> bool {
        !self.opponent_blocked && !self.own_blocked
    }
}

/// The bot's filtered view of the battlefield for one turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattlefieldView {
    pub turn: Turn,
    pub own_mp: f64,
    pub opponent_mp: f64,
    pub left: EdgeState,
    pub right: EdgeState,
}

impl BattlefieldView {
    pub fn observe<O: GameOracle + ?Sized>(oracle: &O, config: &StrategyConfig) -> Self {
        Self {
            turn: oracle.turn_number(),
            own_mp: oracle.resource(Currency::Mobile, Side::Own),
            opponent_mp: oracle.resource(Currency::Mobile, Side::Opponent),
            left: EdgeState::observe(oracle, &config.layout(Flank::Left)),
            right: EdgeState::observe(oracle, &config.layout(Flank::Right)),
        }
    }

    pub fn edge(&self, flank: Flank) -> &EdgeState {
        match flank {
            Flank::Left => &self.left,
            Flank::Right => &self.right,
        }
    }

    pub fn edge_mut(&mut self, flank: Flank) -> &mut EdgeState {
        match flank {
            Flank::Left => &mut self.left,
            Flank::Right => &mut self.right,
        }
    }

    /// All four lane checks report open
    pub fn both_flanks_open(&self) -> bool {
        self.left.is_open() && self.right.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Coord;
    use crate::oracle::SnapshotOracle;

    fn left() -> FlankLayout {
        StrategyConfig::default().layout(Flank::Left)
    }

    fn right() -> FlankLayout {
        StrategyConfig::default().layout(Flank::Right)
    }

    #[test]
    fn test_empty_board_is_open_and_weak() {
        let oracle = SnapshotOracle::new(1);
        assert!(!is_edge_blocked(&oracle, &left()));
        assert!(!is_edge_blocked(&oracle, &right()));
        assert_eq!(edge_strength(&oracle, &left()), 0.0);
        assert!(!is_own_edge_blocked(&oracle, &left()));
    }

    #[test]
    fn test_short_probe_path_is_blocked() {
        let mut oracle = SnapshotOracle::new(1);
        let path: Vec<Coord> = (0..9).map(|i| Coord::new(1 + i, 12 + i % 2)).collect();
        oracle.script_path(Coord::new(1, 12), path);
        assert!(is_edge_blocked(&oracle, &left()));
    }

    #[test]
    fn test_probe_dipping_below_boundary_is_blocked() {
        let mut oracle = SnapshotOracle::new(1);
        let mut path: Vec<Coord> = (0..12).map(|i| Coord::new(1 + i, 13)).collect();
        path[6] = Coord::new(7, 11);
        oracle.script_path(Coord::new(1, 12), path);
        assert!(is_edge_blocked(&oracle, &left()));
    }

    #[test]
    fn test_dip_after_horizon_is_ignored() {
        let mut oracle = SnapshotOracle::new(1);
        let mut path: Vec<Coord> = (0..12).map(|i| Coord::new(1 + i, 13)).collect();
        path[10] = Coord::new(11, 11);
        oracle.script_path(Coord::new(1, 12), path);
        assert!(!is_edge_blocked(&oracle, &left()));
    }

    #[test]
    fn test_turret_strength_scales_with_distance() {
        let mut oracle = SnapshotOracle::new(1);
        oracle.place(StructureKind::Turret, Coord::new(2, 14), false);
        let expected = 5.0 / Coord::new(2, 14).distance_from([0.5, 13.0]);
        assert!((edge_strength(&oracle, &left()) - expected).abs() < 1e-12);

        oracle.place(StructureKind::Turret, Coord::new(2, 14), true);
        let expected = 25.0 / Coord::new(2, 14).distance_from([0.5, 13.0]);
        assert!((edge_strength(&oracle, &left()) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_walls_only_count_on_edge_row() {
        let mut oracle = SnapshotOracle::new(1);
        oracle.place(StructureKind::Wall, Coord::new(1, 14), false);
        oracle.place(StructureKind::Wall, Coord::new(2, 14), true);
        oracle.place(StructureKind::Wall, Coord::new(2, 15), true);
        oracle.place(StructureKind::Support, Coord::new(3, 14), true);
        assert_eq!(edge_strength(&oracle, &left()), 4.0);
    }

    #[test]
    fn test_right_flank_samples_are_mirrored() {
        let mut oracle = SnapshotOracle::new(1);
        oracle.place(StructureKind::Turret, Coord::new(25, 16), false);
        let expected = 5.0 / Coord::new(25, 16).distance_from([26.5, 13.0]);
        assert!((edge_strength(&oracle, &right()) - expected).abs() < 1e-12);
        assert_eq!(edge_strength(&oracle, &left()), 0.0);
    }

    #[test]
    fn test_own_block_needs_both_cells() {
        let mut oracle = SnapshotOracle::new(1);
        oracle.place(StructureKind::Wall, Coord::new(0, 13), false);
        assert!(!is_own_edge_blocked(&oracle, &left()));
        oracle.place(StructureKind::Wall, Coord::new(1, 13), false);
        assert!(is_own_edge_blocked(&oracle, &left()));
    }

    #[test]
    fn test_misdirection() {
        let mut oracle = SnapshotOracle::new(1);
        oracle.place(StructureKind::Turret, Coord::new(0, 14), false);
        assert!(is_misdirecting(&oracle, &left(), false));
        assert!(!is_misdirecting(&oracle, &left(), true));
        assert!(!is_misdirecting(&oracle, &right(), false));
    }

    #[test]
    fn test_view_observes_both_flanks() {
        let mut oracle = SnapshotOracle::new(3).with_resources(Side::Opponent, 30.0, 14.0);
        oracle.place(StructureKind::Wall, Coord::new(27, 13), false);
        oracle.place(StructureKind::Wall, Coord::new(26, 13), false);
        let view = BattlefieldView::observe(&oracle, &StrategyConfig::default());
        assert_eq!(view.turn, 3);
        assert_eq!(view.opponent_mp, 14.0);
        assert!(view.right.own_blocked);
        assert!(!view.left.own_blocked);
        assert!(view.left.is_open());
        assert!(!view.both_flanks_open());
    }
}
