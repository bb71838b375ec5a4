//! Pluggable unit skills.
//!
//! Catalog templates carry skill labels only; actual behavior is supplied by
//! registering a `SkillEffect` against a template id. The stock registry is
//! empty, which matches the catalog: every built-in skill is descriptive.

use std::collections::HashMap;

use crate::game::board::Board;
use crate::game::types::UnitHandle;
use crate::game::unit::Unit;

/// Mutable view of the match handed to a skill at a trigger point.
pub struct SkillContext<'a> {
    pub board: &'a mut Board,
    pub units: &'a mut [Unit],
    /// The unit whose skill is firing.
    pub actor: UnitHandle,
}

/// Behavior hooks for a unit skill. Every method defaults to a no-op, so an
/// effect implements only the triggers it cares about.
pub trait SkillEffect: Send + Sync {
    /// Fired for each of the incoming side's units when its turn begins.
    fn on_turn_start(&self, _cx: &mut SkillContext<'_>) {}
    /// Fired for the attacker when it declares an attack.
    fn on_attack(&self, _cx: &mut SkillContext<'_>) {}
    /// Fired for a cell's occupant when its terrain kind changes.
    fn on_terrain_change(&self, _cx: &mut SkillContext<'_>) {}
}

/// Trigger points a skill can hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillTrigger {
    TurnStart,
    Attack,
    TerrainChange,
}

/// Effects keyed by unit template id.
#[derive(Default)]
pub struct SkillRegistry {
    effects: HashMap<String, Box<dyn SkillEffect>>,
}

impl SkillRegistry {
    /// The stock registry: no effects. Built-in skills are labels only.
    pub fn builtin() -> Self {
        SkillRegistry::default()
    }

    pub fn register(&mut self, template_id: &str, effect: Box<dyn SkillEffect>) {
        self.effects.insert(template_id.to_string(), effect);
    }

    pub fn get(&self, template_id: &str) -> Option<&dyn SkillEffect> {
        self.effects.get(template_id).map(Box::as_ref)
    }

    /// Fire one trigger for one unit, if it has a registered effect.
    pub fn fire(
        &self,
        trigger: SkillTrigger,
        template_id: &str,
        board: &mut Board,
        units: &mut [Unit],
        actor: UnitHandle,
    ) {
        let Some(effect) = self.get(template_id) else {
            return;
        };
        let mut cx = SkillContext { board, units, actor };
        match trigger {
            SkillTrigger::TurnStart => effect.on_turn_start(&mut cx),
            SkillTrigger::Attack => effect.on_attack(&mut cx),
            SkillTrigger::TerrainChange => effect.on_terrain_change(&mut cx),
        }
    }
}

impl std::fmt::Debug for SkillRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillRegistry")
            .field("effects", &self.effects.keys().collect::<Vec<_>>())
            .finish()
    }
}
