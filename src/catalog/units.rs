use serde::{Deserialize, Serialize};

use crate::game::types::Facing;

/// Broad combat role of a unit template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Melee,
    Ranged,
    Charge,
    Dash,
    Aerial,
    Grapple,
}

/// Stats a fresh unit instance starts with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BaseStats {
    pub health: i32,
    pub attack: i32,
    pub move_range: i32,
    pub attack_range: i32,
}

/// A named skill. Currently a label only: no skill in the stock catalog has
/// an executable effect. Behavior plugs in through `game::skills`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillNote {
    pub name: String,
}

/// Immutable description of a unit kind, looked up by `id`.
#[derive(Debug, Clone)]
pub struct UnitTemplate {
    pub id: String,
    pub name: String,
    pub category: UnitCategory,
    pub points: i32,
    pub stats: BaseStats,
    /// Facings from which incoming attacks gain +1 power.
    pub weak: Vec<Facing>,
    /// Facings from which incoming attacks lose 1 power.
    pub strong: Vec<Facing>,
    pub skill: Option<SkillNote>,
}

impl UnitTemplate {
    fn new(
        id: &str,
        name: &str,
        category: UnitCategory,
        points: i32,
        stats: BaseStats,
        weak: &[Facing],
        strong: &[Facing],
    ) -> Self {
        UnitTemplate {
            id: id.to_string(),
            name: name.to_string(),
            category,
            points,
            stats,
            weak: weak.to_vec(),
            strong: strong.to_vec(),
            skill: None,
        }
    }

    fn with_skill(mut self, label: &str) -> Self {
        self.skill = Some(SkillNote { name: label.to_string() });
        self
    }
}

fn stats(health: i32, attack: i32, move_range: i32, attack_range: i32) -> BaseStats {
    BaseStats { health, attack, move_range, attack_range }
}

/// The stock unit roster.
pub fn builtin() -> Vec<UnitTemplate> {
    use Facing::{Back, Front, Left, Right};
    use UnitCategory::*;

    vec![
        // 1 point
        UnitTemplate::new("scuttler", "Scuttler", Melee, 1, stats(4, 2, 2, 1), &[Back], &[Front]),
        UnitTemplate::new("springtail", "Springtail", Melee, 1, stats(3, 1, 4, 1), &[Back], &[Front]),
        UnitTemplate::new("strider", "Strider", Charge, 1, stats(4, 1, 2, 1), &[Left, Right], &[Front]),
        // 2 points
        UnitTemplate::new("lancer", "Lancer", Dash, 2, stats(4, 2, 2, 2), &[Back], &[Front])
            .with_skill("+1 attack power when attacking from a grassland tile"),
        UnitTemplate::new("watcher", "Watcher", Ranged, 2, stats(4, 2, 2, 3), &[Back, Left, Right], &[Front]),
        // 3 points
        UnitTemplate::new("longhorn", "Longhorn", Charge, 3, stats(5, 2, 3, 1), &[Back], &[Front]),
        UnitTemplate::new("skyhook", "Skyhook", Aerial, 3, stats(4, 2, 3, 1), &[Back], &[])
            .with_skill("raises the tile it lands on"),
        UnitTemplate::new("dragnet", "Dragnet", Grapple, 3, stats(6, 2, 2, 2), &[Back], &[Front])
            .with_skill("drags its target one cell closer after attacking"),
        // 4 points
        UnitTemplate::new("bulwark", "Bulwark", Melee, 4, stats(7, 3, 2, 1), &[Back], &[Front, Left, Right]),
        UnitTemplate::new("ravager", "Ravager", Ranged, 4, stats(5, 3, 2, 3), &[Left, Right], &[Front]),
        // 5 points
        UnitTemplate::new("colossus", "Colossus", Charge, 5, stats(9, 3, 2, 1), &[Back], &[Front]),
        // 7 points
        UnitTemplate::new("warbringer", "Warbringer", Melee, 7, stats(10, 3, 2, 2), &[Left, Right], &[Front])
            .with_skill("lowers the defender's tile when attacking"),
        // 10 points
        UnitTemplate::new("spinereaver", "Spinereaver", Melee, 10, stats(15, 4, 2, 1), &[Left, Right], &[Front])
            .with_skill("-1 health to every unit within attack range at turn start"),
    ]
}
