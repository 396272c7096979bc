//! Turn strategy state machine
//!
//! The mode is chosen at the end of a turn and acted on during the next one.
//! There is no dwell time: the mode may flip every turn if resources or
//! opponent strength oscillate.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::config::ThresholdConfig;
use crate::core::error::BotError;
use crate::core::types::Flank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStrategy {
    #[default]
    #[display(fmt = "defend")]
    Defend,
    #[display(fmt = "attack_left")]
    AttackLeft,
    #[display(fmt = "attack_right")]
    AttackRight,
}

impl TurnStrategy {
    /// Flank under attack, if any
    pub fn attack_flank(self) -> Option<Flank> {
        match self {
            TurnStrategy::Defend => None,
            TurnStrategy::AttackLeft => Some(Flank::Left),
            TurnStrategy::AttackRight => Some(Flank::Right),
        }
    }

    pub fn is_attacking(self, flank: Flank) -> bool {
        self.attack_flank() == Some(flank)
    }
}

impl FromStr for TurnStrategy {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "defend" => Ok(TurnStrategy::Defend),
            "attack_left" => Ok(TurnStrategy::AttackLeft),
            "attack_right" => Ok(TurnStrategy::AttackRight),
            other => Err(BotError::InvalidConfig(format!(
                "unknown turn strategy {:?}",
                other
            ))),
        }
    }
}

/// Pick next turn's mode from resources left after this turn's deployment
///
/// Attacks go through the flank with the lower opponent strength; equal
/// strengths pick the left flank.
pub fn next_mode(
    own_mp: f64,
    opponent_mp: f64,
    left_strength: f64,
    right_strength: f64,
    thresholds: &ThresholdConfig,
) -> TurnStrategy {
    if own_mp < thresholds.attack_min_mp {
        return TurnStrategy::Defend;
    }
    if own_mp > thresholds.attack_eager_mp || own_mp > opponent_mp {
        if left_strength > right_strength {
            TurnStrategy::AttackRight
        } else {
            TurnStrategy::AttackLeft
        }
    } else {
        TurnStrategy::Defend
    }
}
