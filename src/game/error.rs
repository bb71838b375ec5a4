use thiserror::Error;

use crate::config::game::{MAX_COPIES, POINT_BUDGET};
use crate::game::types::{Coords, Phase};

/// Typed rejection reason for every rule violation.
///
/// The `Display` text is what the offending side sees. A rejected action
/// never mutates match state, so any of these can simply be re-issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("coordinates {0} are off the board")]
    OutOfBounds(Coords),
    #[error("there is already a unit at {0}")]
    Occupied(Coords),
    #[error("that can only be done during the {0} phase")]
    WrongPhase(Phase),
    #[error("it's not your turn")]
    NotYourTurn,
    #[error("unknown unit: '{0}'")]
    UnknownUnit(String),
    #[error("a roster may hold at most {MAX_COPIES} copies of {0}")]
    TooManyCopies(String),
    #[error("a roster may spend at most {POINT_BUDGET} points")]
    BudgetExceeded,
    #[error("your roster has already been committed")]
    AlreadyCommitted,
    #[error("you have no {0} in your roster")]
    NotInRoster(String),
    #[error("you have already placed all of your {0} copies")]
    AllCopiesPlaced(String),
    #[error("you may only deploy within the two rows nearest you")]
    OutsideDeploymentRows,
    #[error("you have no unit at {0}")]
    NoUnitAt(Coords),
    #[error("there is no target to attack at {0}")]
    NoTarget(Coords),
    #[error("that unit cannot reach {0}")]
    OutOfRange(Coords),
    #[error("you've already moved this turn")]
    AlreadyMoved,
    #[error("you've already sprinted this turn")]
    AlreadySprinted,
    #[error("you've already attacked this turn")]
    AlreadyAttacked,
    #[error("you've already overcharged this turn")]
    AlreadyOvercharged,
    #[error("you sprinted this turn, so you may not attack")]
    SprintedThisTurn,
}
