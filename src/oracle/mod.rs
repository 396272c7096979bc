//! Boundary to the game engine
//!
//! The bot never simulates combat or routing itself. Everything it knows
//! about the board comes through `GameOracle`, and every action it takes is
//! an oracle call that the engine may reject.

pub mod plan;
pub mod snapshot;

pub use plan::{DeploymentPlan, PlannedAction};
pub use snapshot::{PlacedStructure, ScriptedPath, SideResources, SnapshotOracle, TurnSnapshot};

use serde::{Deserialize, Serialize};

use crate::arena::ArenaEdge;
use crate::core::types::{Coord, Currency, ResourceCost, Side, StructureKind, Turn, UnitKind};

/// What the engine reports about a stationary unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureDescriptor {
    pub kind: StructureKind,
    pub health: f64,
    pub max_health: f64,
    pub upgraded: bool,
}

impl StructureDescriptor {
    /// Remaining health as a fraction of maximum
    pub fn health_ratio(&self) -> f64 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        self.health / self.max_health
    }
}

/// Queries and actions the engine exposes for one turn
///
/// Resource pools reflect actions already issued this turn. Rejected actions
/// return `false` and leave the state untouched.
pub trait GameOracle {
    /// Current turn number (0 for the opening turn)
    fn turn_number(&self) -> Turn;

    fn resource(&self, currency: Currency, side: Side) -> f64;

    fn stationary_unit_at(&self, cell: Coord) -> Option<StructureDescriptor>;

    /// Route a mobile unit spawned at `start` would take toward `target`
    fn find_path_to_edge(&self, start: Coord, target: ArenaEdge) -> Vec<Coord>;

    fn spawn(&mut self, kind: UnitKind, cell: Coord, count: u32) -> bool;

    fn upgrade(&mut self, cell: Coord) -> bool;

    fn remove(&mut self, cell: Coord) -> bool;

    fn cost_of(&self, kind: UnitKind, upgrade: bool) -> ResourceCost;

    /// Hand over the actions queued so far, leaving an empty queue
    fn drain_plan(&mut self) -> DeploymentPlan;

    fn contains_stationary_unit(&self, cell: Coord) -> bool {
        self.stationary_unit_at(cell).is_some()
    }
}
