use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Terrain kinds a cell can carry. Depressed terrain penalizes the unit
/// standing on it, elevated terrain protects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    Chasm,
    Marsh,
    Grassland,
    Forest,
    Hill,
    Mountain,
}

/// Kind -> combat modifier lookup, applied to the defender's tile.
#[derive(Debug, Clone, Default)]
pub struct TerrainTable {
    modifiers: HashMap<TerrainKind, i32>,
}

impl TerrainTable {
    pub fn new(modifiers: HashMap<TerrainKind, i32>) -> Self {
        TerrainTable { modifiers }
    }

    pub fn builtin() -> Self {
        let modifiers = HashMap::from([
            (TerrainKind::Chasm, -2),
            (TerrainKind::Marsh, -1),
            (TerrainKind::Grassland, 0),
            (TerrainKind::Forest, 1),
            (TerrainKind::Hill, 2),
            (TerrainKind::Mountain, 3),
        ]);
        TerrainTable { modifiers }
    }

    pub fn modifier(&self, kind: TerrainKind) -> i32 {
        self.modifiers.get(&kind).copied().unwrap_or(0)
    }
}
