/// Game configuration constants.
///
/// This module defines the main gameplay parameters: board dimensions,
/// roster limits, and the turn/action economy.
pub const BOARD_SIZE: usize = 8; // The board is BOARD_SIZE x BOARD_SIZE cells.

/// Points a side may spend on its roster.
pub const POINT_BUDGET: i32 = 10;

/// Maximum copies of a single unit template in one roster.
pub const MAX_COPIES: usize = 4;

/// Number of rows nearest its own edge a side may deploy into.
pub const DEPLOY_ROWS: usize = 2;

/// Actions a side takes before the turn passes to the opponent.
pub const ACTIONS_PER_TURN: usize = 2;

/// Extra move range granted while resolving a sprint.
pub const SPRINT_BONUS: i32 = 1;

/// Health an overcharged unit pays when its turn ends.
pub const OVERCHARGE_COST: i32 = 2;
