//! Deployment plan handed to the engine at the end of a turn

use serde::{Deserialize, Serialize};

use crate::core::types::{Coord, Turn, UnitKind};

/// One accepted action, in issue order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlannedAction {
    Spawn {
        unit: UnitKind,
        location: Coord,
        count: u32,
    },
    Upgrade {
        location: Coord,
    },
    Remove {
        location: Coord,
    },
}

/// Everything the bot committed to during one turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    pub turn: Turn,
    pub actions: Vec<PlannedAction>,
}

impl DeploymentPlan {
    pub fn new(turn: Turn) -> Self {
        Self {
            turn,
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, action: PlannedAction) {
        self.actions.push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Total units spawned of the given kind
    pub fn spawned(&self, kind: UnitKind) -> u32 {
        self.actions
            .iter()
            .map(|action| match action {
                PlannedAction::Spawn { unit, count, .. } if *unit == kind => *count,
                _ => 0,
            })
            .sum()
    }

    /// Spawn actions aimed at `location`
    pub fn spawns_at(&self, location: Coord) -> impl Iterator<Item = &PlannedAction> {
        self.actions.iter().filter(move |action| {
            matches!(action, PlannedAction::Spawn { location: l, .. } if *l == location)
        })
    }
}
