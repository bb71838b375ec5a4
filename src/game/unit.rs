//! A live unit instance and its combat math.

use std::sync::Arc;

use crate::catalog::UnitTemplate;
use crate::game::types::{Coords, Facing, Side, UnitHandle};

/// A unit on (or fallen from) the board, derived from a catalog template.
#[derive(Debug, Clone)]
pub struct Unit {
    pub handle: UnitHandle,
    pub template: Arc<UnitTemplate>,
    pub health: i32,
    pub attack: i32,
    /// Temporarily bumped while a sprint is range-checked; always restored.
    pub move_range: i32,
    pub attack_range: i32,
    /// Stamped by `Board::place`; stays at the last occupied cell after a
    /// faint.
    pub pos: Coords,
    pub facing: Facing,
    pub side: Side,
    pub active: bool,
}

impl Unit {
    pub fn new(handle: UnitHandle, template: Arc<UnitTemplate>, side: Side) -> Self {
        let stats = template.stats;
        Unit {
            handle,
            health: stats.health,
            attack: stats.attack,
            move_range: stats.move_range,
            attack_range: stats.attack_range,
            pos: Coords::new(0, 0),
            facing: Facing::Front,
            side,
            active: true,
            template,
        }
    }

    /// Square reachability test: both coordinate deltas must fit within the
    /// relevant range. Start and end are all that matter; nothing in between
    /// blocks movement or attacks.
    pub fn can_reach(&self, to: Coords, attack: bool) -> bool {
        let dx = self.pos.x.abs_diff(to.x) as i32;
        let dy = self.pos.y.abs_diff(to.y) as i32;
        let range = if attack { self.attack_range } else { self.move_range };
        dx <= range && dy <= range
    }

    /// Direction this unit attacks `target` from, relative to the target's
    /// facing sides. The vertical axis is resolved first, then any
    /// horizontal offset overrides it. `None` only when both units share a
    /// cell, which placement and movement rules make unreachable.
    pub fn facing_toward(&self, target: &Unit) -> Option<Facing> {
        let mut direction = if self.pos.y > target.pos.y {
            Some(Facing::Front)
        } else if self.pos.y < target.pos.y {
            Some(Facing::Back)
        } else {
            None
        };
        if self.pos.x < target.pos.x {
            direction = Some(Facing::Left);
        } else if self.pos.x > target.pos.x {
            direction = Some(Facing::Right);
        }
        direction
    }

    /// Attacking power against `target`, whose tile carries `terrain_mod`.
    /// Terrain advantage is always evaluated on the defender's tile.
    pub fn attack_power(&self, target: &Unit, terrain_mod: i32) -> i32 {
        let direction = self.facing_toward(target);
        let mut power = self.attack + terrain_mod;
        let hits = |sides: &[Facing]| direction.is_some_and(|d| sides.contains(&d));
        if hits(&target.template.weak) {
            power += 1;
        } else if hits(&target.template.strong) {
            power -= 1;
        }
        power
    }
}
