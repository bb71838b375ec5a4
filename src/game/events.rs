//! Wire-facing message types and the outbound notification seam.
//!
//! Inbound requests arrive already authenticated and seat-checked by the
//! transport layer; the engine only validates game rules. Outbound events
//! leave through the `Notifier` trait so the engine never touches sockets.

use serde::{Deserialize, Serialize};

use crate::catalog::TerrainKind;
use crate::game::types::{Coords, Facing, Side};
use crate::game::unit::Unit;

/// An action request from a client, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClientRequest {
    SetTeam {
        members: Vec<String>,
    },
    Place {
        coords: Coords,
        #[serde(rename = "unitId")]
        unit_id: String,
    },
    Move {
        from: Coords,
        to: Coords,
    },
    Sprint {
        from: Coords,
        to: Coords,
    },
    Attack {
        from: Coords,
        to: Coords,
    },
    Overcharge {
        coords: Coords,
    },
    SetDirection {
        coords: Coords,
        direction: Facing,
    },
}

/// A notification from the engine to one or both seats, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    Error {
        message: String,
    },
    Team {
        members: Vec<String>,
    },
    GameStart,
    BoardUpdate {
        grid: BoardSnapshot,
    },
    StartTurn,
    Overcharged {
        coords: Coords,
    },
    PieceLost {
        coords: Coords,
        #[serde(rename = "unitName")]
        unit_name: String,
    },
}

/// Full grid snapshot: terrain plus an occupant summary per cell, row-major.
pub type BoardSnapshot = Vec<Vec<CellView>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub terrain: TerrainKind,
    pub unit: Option<UnitView>,
}

/// Occupant summary included in board snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitView {
    pub name: String,
    pub health: i32,
    pub attack: i32,
    #[serde(rename = "move")]
    pub move_range: i32,
    #[serde(rename = "range")]
    pub attack_range: i32,
    pub location: Coords,
    pub direction: Facing,
}

impl UnitView {
    pub fn of(unit: &Unit) -> Self {
        UnitView {
            name: unit.template.name.clone(),
            health: unit.health,
            attack: unit.attack,
            move_range: unit.move_range,
            attack_range: unit.attack_range,
            location: unit.pos,
            direction: unit.facing,
        }
    }
}

/// Outbound notification sink. The room layer implements this over actix
/// recipients; tests implement it with a recording buffer.
pub trait Notifier {
    /// Deliver an event to one seat.
    fn notify(&mut self, side: Side, event: &ServerEvent);
    /// Deliver an event to both seats and any spectators.
    fn broadcast(&mut self, event: &ServerEvent);
}
