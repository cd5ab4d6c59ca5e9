use layermc_registry::Identifier;
use layermc_storage::BlockPos;

pub mod config;
pub mod edge;
pub mod engine;
pub mod gradient;
pub mod memory;
pub mod region;

pub use config::{GenerationConfig, GenerationMode};
pub use engine::{ColumnAction, EdgeGradientEngine, GenerationPlan, GenerationReport};
pub use memory::MemoryWorld;
pub use region::Region;

/// Read access to the terrain being decorated.
pub trait TerrainView {
    /// Y of the topmost terrain block in the column, ignoring vegetation and
    /// generated layers.
    fn surface_height(&self, x: i32, z: i32) -> i32;

    fn block_at(&self, pos: BlockPos) -> Identifier;
}

/// Terrain the engine's writes can be applied to.
pub trait World: TerrainView {
    fn set_block(&mut self, pos: BlockPos, block: &Identifier);

    /// Place a layer block with `layers` layers. Worlds without layer state
    /// just place the block.
    fn set_layers(&mut self, pos: BlockPos, block: &Identifier, layers: u32) {
        let _ = layers;
        self.set_block(pos, block);
    }
}
