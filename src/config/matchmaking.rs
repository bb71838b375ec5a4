/// Matchmaking configuration constants.
///
/// This module defines parameters for the ladder queue.
pub const ROOM_PLAYERS: usize = 2; // A room always seats exactly two players.
