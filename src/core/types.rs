//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::error::{BotError, Result};

/// Game turn counter
pub type Turn = u32;

/// Grid cell on the arena, serialized as `[x, y]` like the engine does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance from a (possibly half-integer) point to this cell
    pub fn distance_from(&self, point: [f64; 2]) -> f64 {
        let dx = f64::from(self.x) - point[0];
        let dy = f64::from(self.y) - point[1];
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<[i32; 2]> for Coord {
    fn from(value: [i32; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<Coord> for [i32; 2] {
    fn from(value: Coord) -> Self {
        [value.x, value.y]
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Price of an action in both currencies
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceCost {
    pub structure: f64,
    pub mobile: f64,
}

impl ResourceCost {
    pub fn structure(amount: f64) -> Self {
        Self {
            structure: amount,
            mobile: 0.0,
        }
    }

    pub fn mobile(amount: f64) -> Self {
        Self {
            structure: 0.0,
            mobile: amount,
        }
    }
}

/// Which player a query is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[display(fmt = "own")]
    Own,
    #[display(fmt = "opponent")]
    Opponent,
}

/// One of the two symmetric approach lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flank {
    #[display(fmt = "left")]
    Left,
    #[display(fmt = "right")]
    Right,
}

impl Flank {
    pub const BOTH: [Flank; 2] = [Flank::Left, Flank::Right];

    pub fn opposite(self) -> Flank {
        match self {
            Flank::Left => Flank::Right,
            Flank::Right => Flank::Left,
        }
    }
}

/// The two independent per-turn currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// Spent on walls, supports and turrets
    Structure,
    /// Regenerates each turn, spent on mobile units
    Mobile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    #[display(fmt = "wall")]
    Wall,
    #[display(fmt = "support")]
    Support,
    #[display(fmt = "turret")]
    Turret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobileKind {
    #[display(fmt = "scout")]
    Scout,
    #[display(fmt = "demolisher")]
    Demolisher,
    #[display(fmt = "interceptor")]
    Interceptor,
}

/// Any unit the engine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitKind {
    #[display(fmt = "{}", _0)]
    Structure(StructureKind),
    #[display(fmt = "{}", _0)]
    Mobile(MobileKind),
}

/// Configuration names accepted for unit kinds: constant names and engine shorthands
const KIND_NAMES: [(&str, UnitKind); 12] = [
    ("WALL", UnitKind::Structure(StructureKind::Wall)),
    ("SUPPORT", UnitKind::Structure(StructureKind::Support)),
    ("TURRET", UnitKind::Structure(StructureKind::Turret)),
    ("SCOUT", UnitKind::Mobile(MobileKind::Scout)),
    ("DEMOLISHER", UnitKind::Mobile(MobileKind::Demolisher)),
    ("INTERCEPTOR", UnitKind::Mobile(MobileKind::Interceptor)),
    ("FF", UnitKind::Structure(StructureKind::Wall)),
    ("EF", UnitKind::Structure(StructureKind::Support)),
    ("DF", UnitKind::Structure(StructureKind::Turret)),
    ("PI", UnitKind::Mobile(MobileKind::Scout)),
    ("EI", UnitKind::Mobile(MobileKind::Demolisher)),
    ("SI", UnitKind::Mobile(MobileKind::Interceptor)),
];

impl UnitKind {
    /// Resolve a configuration name. Unknown names are a configuration error.
    pub fn from_name(name: &str) -> Result<UnitKind> {
        let trimmed = name.trim();
        KIND_NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(trimmed))
            .map(|(_, kind)| *kind)
            .ok_or_else(|| BotError::UnknownUnitKind(name.to_string()))
    }

    /// Unit type index used in engine frame data
    pub fn from_engine_index(index: u8) -> Option<UnitKind> {
        match index {
            0 => Some(StructureKind::Wall.into()),
            1 => Some(StructureKind::Support.into()),
            2 => Some(StructureKind::Turret.into()),
            3 => Some(MobileKind::Scout.into()),
            4 => Some(MobileKind::Demolisher.into()),
            5 => Some(MobileKind::Interceptor.into()),
            _ => None,
        }
    }
}

impl From<StructureKind> for UnitKind {
    fn from(kind: StructureKind) -> Self {
        UnitKind::Structure(kind)
    }
}

impl From<MobileKind> for UnitKind {
    fn from(kind: MobileKind) -> Self {
        UnitKind::Mobile(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_resolve() {
        assert_eq!(
            UnitKind::from_name("WALL").unwrap(),
            UnitKind::Structure(StructureKind::Wall)
        );
        assert_eq!(
            UnitKind::from_name("df").unwrap(),
            UnitKind::Structure(StructureKind::Turret)
        );
        assert_eq!(
            UnitKind::from_name(" SI ").unwrap(),
            UnitKind::Mobile(MobileKind::Interceptor)
        );
    }

    #[test]
    fn test_unknown_kind_is_error() {
        let err = UnitKind::from_name("CATAPULT").unwrap_err();
        assert!(matches!(err, BotError::UnknownUnitKind(name) if name == "CATAPULT"));
    }

    #[test]
    fn test_engine_index_mapping() {
        assert_eq!(
            UnitKind::from_engine_index(4),
            Some(UnitKind::Mobile(MobileKind::Demolisher))
        );
        assert_eq!(UnitKind::from_engine_index(6), None);
    }

    #[test]
    fn test_coord_serializes_as_pair() {
        let json = serde_json::to_string(&Coord::new(3, 10)).unwrap();
        assert_eq!(json, "[3,10]");
        let back: Coord = serde_json::from_str("[26, 12]").unwrap();
        assert_eq!(back, Coord::new(26, 12));
    }

    #[test]
    fn test_distance_from_half_cell_anchor() {
        let d = Coord::new(0, 14).distance_from([0.5, 13.0]);
        assert!((d - 1.25_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_flank_opposite() {
        assert_eq!(Flank::Left.opposite(), Flank::Right);
        assert_eq!(Flank::Right.opposite(), Flank::Left);
    }
}
