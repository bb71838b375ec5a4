//! The match engine: board and unit models, combat math, and the
//! selecting -> placing -> playing state machine.
//!
//! Everything in here is synchronous and single-threaded; the server layer
//! serializes access by putting each `Match` behind one actor mailbox.

pub mod board;
pub mod error;
pub mod events;
pub mod skills;
pub mod state;
pub mod types;
pub mod unit;

#[cfg(test)]
mod tests;
