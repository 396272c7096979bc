//! Arena dimensions - fixed by the engine

/// Side length of the square bounding box around the diamond arena
pub const ARENA_SIZE: i32 = 28;

/// Row splitting the own half (below) from the opponent's half
pub const HALF_ARENA: i32 = 14;

/// Largest valid x or y index
pub const MAX_INDEX: i32 = ARENA_SIZE - 1;
