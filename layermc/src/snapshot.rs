//! JSON world snapshots for the command line tool.
//!
//! `{ "columns": [{ "x", "z", "height" }], "blocks": [{ "x", "y", "z", "id", "layers"? }] }`

use std::path::Path;

use anyhow::{Context, Result};
use layermc_gen::{MemoryWorld, World};
use layermc_registry::Identifier;
use layermc_storage::BlockPos;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub columns: Vec<ColumnEntry>,
    #[serde(default)]
    pub blocks: Vec<BlockEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnEntry {
    pub x: i32,
    pub z: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockEntry {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<u32>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read world snapshot {:?}", path))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse world snapshot {:?}", path))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize world snapshot")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write world snapshot {:?}", path))
    }

    pub fn into_world(self) -> MemoryWorld {
        let mut world = MemoryWorld::new();
        for c in self.columns {
            world.set_height(c.x, c.z, c.height);
        }
        for b in self.blocks {
            let pos = BlockPos::new(b.x, b.y, b.z);
            match b.layers {
                Some(layers) => world.set_layers(pos, &b.id, layers),
                None => world.set_block(pos, &b.id),
            }
        }
        world
    }

    /// Sorted so re-saving an unchanged world gives the same file.
    pub fn from_world(world: &MemoryWorld) -> Self {
        let mut columns: Vec<ColumnEntry> = world
            .heights()
            .map(|(x, z, height)| ColumnEntry { x, z, height })
            .collect();
        columns.sort_by_key(|c| (c.x, c.z));

        let mut blocks: Vec<BlockEntry> = world
            .blocks()
            .map(|(pos, id, layers)| BlockEntry {
                x: pos.x,
                y: pos.y,
                z: pos.z,
                id: id.clone(),
                layers,
            })
            .collect();
        blocks.sort_by_key(|b| (b.x, b.y, b.z));

        Self { columns, blocks }
    }
}
