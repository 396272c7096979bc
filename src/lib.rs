//! Rampart - per-turn decision engine for a two-lane tower-defense bot

pub mod arena;
pub mod core;
pub mod oracle;
pub mod strategy;
