//! What the bot learns from action frames between turns
//!
//! Frames arrive many times per turn, so this only does bookkeeping. Board
//! analysis is left to the next turn.

use ahash::AHashSet;
use serde::Deserialize;
use tracing::trace;

use crate::core::config::{ThresholdConfig, UnitCosts};
use crate::core::error::Result;
use crate::core::types::{Coord, Turn, UnitKind};

/// Player number of the opponent in raw frame data (we are 1)
const OPPONENT_PLAYER: u8 = 2;

/// The parts of an engine action frame we read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionFrame {
    /// `[phase, turn, frame]`
    #[serde(rename = "turnInfo", default)]
    pub turn_info: Vec<i64>,
    #[serde(default)]
    pub events: FrameEvents,
}

impl ActionFrame {
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn turn(&self) -> Option<Turn> {
        self.turn_info
            .get(1)
            .and_then(|turn| Turn::try_from(*turn).ok())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameEvents {
    #[serde(default)]
    pub breach: Vec<BreachEvent>,
    #[serde(default)]
    pub spawn: Vec<SpawnEvent>,
}

/// `[location, damage, unit type, unit id, owner]`
#[derive(Debug, Clone, Deserialize)]
pub struct BreachEvent(
    pub Coord,
    pub f64,
    pub u8,
    pub serde_json::Value,
    pub u8,
);

/// `[location, unit type, unit id, owner]`
#[derive(Debug, Clone, Deserialize)]
pub struct SpawnEvent(pub Coord, pub u8, pub serde_json::Value, pub u8);

/// Accumulated knowledge about the opponent
#[derive(Debug, Clone, Default)]
pub struct Intel {
    /// Cells where opponent units reached our edge, in arrival order
    pub scored_on_locations: Vec<Coord>,
    /// Latest turn seen in a frame and the opponent's mobile spend on it
    current_turn: Option<(Turn, f64)>,
    /// Smallest non-zero spend of any finished turn
    smallest_past_attack: Option<f64>,
    /// Opponent unit ids already priced this turn
    seen_units: AHashSet<String>,
}

impl Intel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and record one raw frame
    pub fn observe_frame(&mut self, contents: &str, costs: &UnitCosts) -> Result<()> {
        let frame = ActionFrame::from_json(contents)?;
        self.record(&frame, costs);
        Ok(())
    }

    pub fn record(&mut self, frame: &ActionFrame, costs: &UnitCosts) {
        for breach in &frame.events.breach {
            if breach.4 == OPPONENT_PLAYER {
                trace!("Scored on at {}", breach.0);
                self.scored_on_locations.push(breach.0);
            }
        }

        let Some(turn) = frame.turn() else {
            return;
        };
        if !self.advance_to(turn) {
            return;
        }
        for spawn in &frame.events.spawn {
            if spawn.3 != OPPONENT_PLAYER {
                continue;
            }
            let Some(UnitKind::Mobile(kind)) = UnitKind::from_engine_index(spawn.1) else {
                continue;
            };
            if !self.seen_units.insert(unit_id(&spawn.2)) {
                continue;
            }
            if let Some((_, spend)) = self.current_turn.as_mut() {
                *spend += costs.mobile(kind);
                trace!("Opponent {} spawned on turn {} ({:.1} MP so far)", kind, turn, *spend);
            }
        }
    }

    /// Move the bookkeeping to `turn`, folding the finished turn into the
    /// running minimum. Returns false for frames of a turn already over.
    fn advance_to(&mut self, turn: Turn) -> bool {
        match self.current_turn {
            Some((current, _)) if turn < current => false,
            Some((current, _)) if turn == current => true,
            finished => {
                if let Some((_, spend)) = finished {
                    self.smallest_past_attack = min_attack(self.smallest_past_attack, spend);
                }
                self.seen_units.clear();
                self.current_turn = Some((turn, 0.0));
                true
            }
        }
    }

    /// Mobile points the opponent spent on `turn`
    ///
    /// Only the latest turn seen is kept; earlier turns read as zero.
    pub fn opponent_spend(&self, turn: Turn) -> f64 {
        match self.current_turn {
            Some((current, spend)) if current == turn => spend,
            _ => 0.0,
        }
    }

    /// Smallest non-zero attack the opponent has launched
    pub fn smallest_attack(&self) -> Option<f64> {
        let current = self.current_turn.map_or(0.0, |(_, spend)| spend);
        min_attack(self.smallest_past_attack, current)
    }

    /// Opponent mobile points at which a flank rush is expected
    pub fn block_threshold(&self, thresholds: &ThresholdConfig) -> f64 {
        if !thresholds.adaptive_block_threshold {
            return thresholds.block_edge_enemy_mp;
        }
        match self.smallest_attack() {
            Some(smallest) => thresholds
                .block_edge_enemy_mp
                .min(smallest.max(thresholds.adaptive_block_floor)),
            None => thresholds.block_edge_enemy_mp,
        }
    }
}

fn min_attack(smallest: Option<f64>, spend: f64) -> Option<f64> {
    if spend <= 0.0 {
        return smallest;
    }
    Some(smallest.map_or(spend, |smallest| smallest.min(spend)))
}

fn unit_id(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}
