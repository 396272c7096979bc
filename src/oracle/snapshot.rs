//! In-memory oracle built from a recorded turn snapshot
//!
//! Mirrors the engine's same-turn bookkeeping closely enough to drive the
//! bot offline: costs are deducted as soon as an action is accepted, removals
//! are queued and only take effect after the turn, and paths either come from
//! the snapshot or from the BFS stand-in.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::arena::{find_path_to_edge, in_arena, is_own_half, ArenaEdge};
use crate::core::config::UnitCosts;
use crate::core::error::{BotError, Result};
use crate::core::types::{Coord, Currency, ResourceCost, Side, StructureKind, Turn, UnitKind};
use crate::oracle::plan::{DeploymentPlan, PlannedAction};
use crate::oracle::{GameOracle, StructureDescriptor};

/// Tolerance for comparing fractional resource pools against costs
const RESOURCE_EPSILON: f64 = 1e-9;

fn default_max_health(kind: StructureKind) -> f64 {
    match kind {
        StructureKind::Wall => 60.0,
        StructureKind::Support => 30.0,
        StructureKind::Turret => 75.0,
    }
}

/// Both currency pools of one player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideResources {
    pub structure: f64,
    pub mobile: f64,
}

impl Default for SideResources {
    /// Pools at the start of a game
    fn default() -> Self {
        Self {
            structure: 40.0,
            mobile: 5.0,
        }
    }
}

impl SideResources {
    fn get(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Structure => self.structure,
            Currency::Mobile => self.mobile,
        }
    }

    fn can_afford(&self, cost: &ResourceCost) -> bool {
        self.structure + RESOURCE_EPSILON >= cost.structure
            && self.mobile + RESOURCE_EPSILON >= cost.mobile
    }

    fn pay(&mut self, cost: &ResourceCost) {
        self.structure -= cost.structure;
        self.mobile -= cost.mobile;
    }
}

/// A structure present at the start of the turn; the owner follows from its half
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedStructure {
    pub kind: StructureKind,
    pub location: Coord,
    #[serde(default)]
    pub health: Option<f64>,
    #[serde(default)]
    pub max_health: Option<f64>,
    #[serde(default)]
    pub upgraded: bool,
}

/// An engine-computed route to replay instead of the BFS stand-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedPath {
    pub start: Coord,
    pub cells: Vec<Coord>,
}

/// Recorded start-of-turn state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnSnapshot {
    pub turn: Turn,
    #[serde(default)]
    pub own: SideResources,
    #[serde(default)]
    pub opponent: SideResources,
    #[serde(default)]
    pub structures: Vec<PlacedStructure>,
    #[serde(default)]
    pub paths: Vec<ScriptedPath>,
    #[serde(default)]
    pub costs: UnitCosts,
    /// Raw action frames observed after this turn was submitted
    #[serde(default)]
    pub frames: Vec<serde_json::Value>,
}

impl TurnSnapshot {
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }
}

/// `GameOracle` over an in-memory board
#[derive(Debug, Clone)]
pub struct SnapshotOracle {
    turn: Turn,
    own: SideResources,
    opponent: SideResources,
    structures: AHashMap<Coord, StructureDescriptor>,
    pending_removal: AHashSet<Coord>,
    scripted_paths: AHashMap<Coord, Vec<Coord>>,
    costs: UnitCosts,
    plan: DeploymentPlan,
}

impl SnapshotOracle {
    /// Empty board with starting resources for both players
    pub fn new(turn: Turn) -> Self {
        Self {
            turn,
            own: SideResources::default(),
            opponent: SideResources::default(),
            structures: AHashMap::new(),
            pending_removal: AHashSet::new(),
            scripted_paths: AHashMap::new(),
            costs: UnitCosts::default(),
            plan: DeploymentPlan::new(turn),
        }
    }

    pub fn from_snapshot(snapshot: &TurnSnapshot) -> Result<Self> {
        let mut oracle = Self::new(snapshot.turn);
        oracle.own = snapshot.own;
        oracle.opponent = snapshot.opponent;
        oracle.costs = snapshot.costs.clone();

        for (side, pools) in [("own", &snapshot.own), ("opponent", &snapshot.opponent)] {
            if pools.structure < 0.0 || pools.mobile < 0.0 {
                return Err(BotError::InvalidSnapshot(format!(
                    "{} resources must not be negative",
                    side
                )));
            }
        }

        for placed in &snapshot.structures {
            if !in_arena(placed.location) {
                return Err(BotError::InvalidSnapshot(format!(
                    "structure at {} is outside the arena",
                    placed.location
                )));
            }
            if oracle.structures.contains_key(&placed.location) {
                return Err(BotError::InvalidSnapshot(format!(
                    "two structures at {}",
                    placed.location
                )));
            }
            let max_health = placed
                .max_health
                .unwrap_or_else(|| default_max_health(placed.kind));
            oracle.structures.insert(
                placed.location,
                StructureDescriptor {
                    kind: placed.kind,
                    health: placed.health.unwrap_or(max_health),
                    max_health,
                    upgraded: placed.upgraded,
                },
            );
        }

        for path in &snapshot.paths {
            oracle.scripted_paths.insert(path.start, path.cells.clone());
        }

        Ok(oracle)
    }

    pub fn with_resources(mut self, side: Side, structure: f64, mobile: f64) -> Self {
        *self.pools_mut(side) = SideResources { structure, mobile };
        self
    }

    /// Put a full-health structure on the board (either half)
    pub fn place(&mut self, kind: StructureKind, cell: Coord, upgraded: bool) {
        let max_health = default_max_health(kind);
        self.structures.insert(
            cell,
            StructureDescriptor {
                kind,
                health: max_health,
                max_health,
                upgraded,
            },
        );
    }

    /// Put a structure with explicit health on the board
    pub fn place_damaged(&mut self, kind: StructureKind, cell: Coord, health: f64) {
        self.structures.insert(
            cell,
            StructureDescriptor {
                kind,
                health,
                max_health: default_max_health(kind),
                upgraded: false,
            },
        );
    }

    /// Replay `cells` whenever a path from `start` is requested
    pub fn script_path(&mut self, start: Coord, cells: Vec<Coord>) {
        self.scripted_paths.insert(start, cells);
    }

    /// Cells queued for removal at the end of the turn
    pub fn pending_removals(&self) -> impl Iterator<Item = &Coord> {
        self.pending_removal.iter()
    }

    /// Actions accepted so far this turn
    pub fn plan(&self) -> &DeploymentPlan {
        &self.plan
    }

    fn pools(&self, side: Side) -> &SideResources {
        match side {
            Side::Own => &self.own,
            Side::Opponent => &self.opponent,
        }
    }

    fn pools_mut(&mut self, side: Side) -> &mut SideResources {
        match side {
            Side::Own => &mut self.own,
            Side::Opponent => &mut self.opponent,
        }
    }

    fn spawn_structure(&mut self, kind: StructureKind, cell: Coord) -> bool {
        if !is_own_half(cell) || self.structures.contains_key(&cell) {
            return false;
        }
        let cost = self.costs.cost_of(kind.into(), false);
        if !self.own.can_afford(&cost) {
            return false;
        }
        self.own.pay(&cost);
        self.place(kind, cell, false);
        self.plan.push(PlannedAction::Spawn {
            unit: kind.into(),
            location: cell,
            count: 1,
        });
        true
    }

    fn spawn_mobile(&mut self, kind: UnitKind, cell: Coord, count: u32) -> bool {
        let on_own_edge =
            ArenaEdge::BottomLeft.contains(cell) || ArenaEdge::BottomRight.contains(cell);
        if !on_own_edge || self.structures.contains_key(&cell) {
            return false;
        }
        let unit_cost = self.costs.cost_of(kind, false).mobile;
        let affordable = if unit_cost <= 0.0 {
            count
        } else {
            let max = ((self.own.mobile + RESOURCE_EPSILON) / unit_cost).floor();
            count.min(max.max(0.0) as u32)
        };
        if affordable == 0 {
            return false;
        }
        self.own.mobile -= unit_cost * f64::from(affordable);
        self.plan.push(PlannedAction::Spawn {
            unit: kind,
            location: cell,
            count: affordable,
        });
        true
    }
}

impl GameOracle for SnapshotOracle {
    fn turn_number(&self) -> Turn {
        self.turn
    }

    fn resource(&self, currency: Currency, side: Side) -> f64 {
        self.pools(side).get(currency)
    }

    fn stationary_unit_at(&self, cell: Coord) -> Option<StructureDescriptor> {
        self.structures.get(&cell).copied()
    }

    fn find_path_to_edge(&self, start: Coord, target: ArenaEdge) -> Vec<Coord> {
        if let Some(cells) = self.scripted_paths.get(&start) {
            return cells.clone();
        }
        find_path_to_edge(start, target, |cell| self.structures.contains_key(&cell))
    }

    fn spawn(&mut self, kind: UnitKind, cell: Coord, count: u32) -> bool {
        if count == 0 {
            return false;
        }
        match kind {
            UnitKind::Structure(structure) => self.spawn_structure(structure, cell),
            UnitKind::Mobile(_) => self.spawn_mobile(kind, cell, count),
        }
    }

    fn upgrade(&mut self, cell: Coord) -> bool {
        if !is_own_half(cell) {
            return false;
        }
        let Some(structure) = self.structures.get(&cell).copied() else {
            return false;
        };
        if structure.upgraded {
            return false;
        }
        let cost = self.costs.cost_of(structure.kind.into(), true);
        if !self.own.can_afford(&cost) {
            return false;
        }
        self.own.pay(&cost);
        if let Some(entry) = self.structures.get_mut(&cell) {
            entry.upgraded = true;
        }
        self.plan.push(PlannedAction::Upgrade { location: cell });
        true
    }

    fn remove(&mut self, cell: Coord) -> bool {
        if !is_own_half(cell)
            || !self.structures.contains_key(&cell)
            || !self.pending_removal.insert(cell)
        {
            return false;
        }
        self.plan.push(PlannedAction::Remove { location: cell });
        true
    }

    fn cost_of(&self, kind: UnitKind, upgrade: bool) -> ResourceCost {
        self.costs.cost_of(kind, upgrade)
    }

    fn drain_plan(&mut self) -> DeploymentPlan {
        std::mem::replace(&mut self.plan, DeploymentPlan::new(self.turn))
    }
}
