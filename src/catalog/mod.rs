//! Static game data: unit templates and terrain modifiers.
//!
//! The catalogs are read-only lookup tables built once at startup and shared
//! behind `Arc`. The match engine consumes them but never mutates them.

pub mod terrain;
pub mod units;

use std::collections::HashMap;
use std::sync::Arc;

pub use terrain::{TerrainKind, TerrainTable};
pub use units::{BaseStats, SkillNote, UnitCategory, UnitTemplate};

/// Immutable unit and terrain data for one ruleset.
#[derive(Debug, Clone)]
pub struct Catalog {
    units: HashMap<String, Arc<UnitTemplate>>,
    terrain: TerrainTable,
}

impl Catalog {
    pub fn new(templates: Vec<UnitTemplate>, terrain: TerrainTable) -> Self {
        let units = templates
            .into_iter()
            .map(|t| (t.id.clone(), Arc::new(t)))
            .collect();
        Catalog { units, terrain }
    }

    /// The stock ruleset: built-in units and terrain modifiers.
    pub fn builtin() -> Self {
        Catalog::new(units::builtin(), TerrainTable::builtin())
    }

    /// Look up a unit template by its identifier.
    pub fn unit(&self, id: &str) -> Option<&Arc<UnitTemplate>> {
        self.units.get(id)
    }

    /// Combat modifier for a terrain kind. Unlisted kinds count as flat.
    pub fn terrain_modifier(&self, kind: TerrainKind) -> i32 {
        self.terrain.modifier(kind)
    }
}
