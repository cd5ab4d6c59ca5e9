//! In-memory world using HashMaps.
//!
//! Used by tests and by the command line tool, which loads it from a
//! snapshot file. Cells that were never set read as air.

use std::collections::HashMap;

use layermc_registry::Identifier;
use layermc_storage::BlockPos;

use crate::{Region, TerrainView, World};

#[derive(Debug, Clone)]
pub struct MemoryWorld {
    heights: HashMap<(i32, i32), i32>,
    blocks: HashMap<BlockPos, Identifier>,
    layers: HashMap<BlockPos, u32>,
    default_height: i32,
    air: Identifier,
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self {
            heights: HashMap::new(),
            blocks: HashMap::new(),
            layers: HashMap::new(),
            default_height: 0,
            air: Identifier::air(),
        }
    }

    /// Flat ground of `surface` at `height` over every column of `region`.
    pub fn flat(region: Region, height: i32, surface: &Identifier) -> Self {
        let mut world = Self::new();
        for (x, z) in region.columns() {
            world.set_column(x, z, height, surface);
        }
        world
    }

    /// Set the surface height of a column and put `surface` on top.
    pub fn set_column(&mut self, x: i32, z: i32, height: i32, surface: &Identifier) {
        self.heights.insert((x, z), height);
        self.set_block(BlockPos::new(x, height, z), surface);
    }

    pub fn set_height(&mut self, x: i32, z: i32, height: i32) {
        self.heights.insert((x, z), height);
    }

    pub fn layer_count(&self, pos: BlockPos) -> Option<u32> {
        self.layers.get(&pos).copied()
    }

    pub fn air(&self) -> &Identifier {
        &self.air
    }

    pub fn heights(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        self.heights.iter().map(|(&(x, z), &h)| (x, z, h))
    }

    pub fn blocks(&self) -> impl Iterator<Item = (BlockPos, &Identifier, Option<u32>)> + '_ {
        self.blocks.iter().map(|(pos, id)| (*pos, id, self.layers.get(pos).copied()))
    }
}

impl TerrainView for MemoryWorld {
    fn surface_height(&self, x: i32, z: i32) -> i32 {
        self.heights.get(&(x, z)).copied().unwrap_or(self.default_height)
    }

    fn block_at(&self, pos: BlockPos) -> Identifier {
        self.blocks.get(&pos).cloned().unwrap_or_else(|| self.air.clone())
    }
}

impl World for MemoryWorld {
    fn set_block(&mut self, pos: BlockPos, block: &Identifier) {
        self.layers.remove(&pos);
        if *block == self.air {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block.clone());
        }
    }

    fn set_layers(&mut self, pos: BlockPos, block: &Identifier, layers: u32) {
        self.set_block(pos, block);
        if *block != self.air {
            self.layers.insert(pos, layers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_world() {
        let grass = Identifier::parse("minecraft:grass_block").unwrap();
        let snow = Identifier::parse("minecraft:snow").unwrap();
        let mut world = MemoryWorld::flat(Region::new(0, 0, 2, 2), 64, &grass);

        assert_eq!(world.surface_height(1, 1), 64);
        assert_eq!(world.block_at(BlockPos::new(1, 64, 1)), grass);
        assert_eq!(world.block_at(BlockPos::new(1, 65, 1)), *world.air());

        world.set_layers(BlockPos::new(1, 65, 1), &snow, 3);
        assert_eq!(world.layer_count(BlockPos::new(1, 65, 1)), Some(3));

        let air = world.air().clone();
        world.set_block(BlockPos::new(1, 65, 1), &air);
        assert_eq!(world.layer_count(BlockPos::new(1, 65, 1)), None);
        assert_eq!(world.blocks().count(), 4);
    }
}
