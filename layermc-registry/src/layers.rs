use std::collections::HashSet;
use std::sync::Arc;

use crate::identifier::Identifier;
use crate::registry::BlockRegistry;
use crate::table::IdentifierMappingTable;
use crate::MappingError;

/// Plain snow layers, used whenever a surface block has no usable layer block.
pub const FALLBACK_LAYER: &str = "minecraft:snow";

/// Surface block -> decorative layer block.
pub struct BlockLayerResolver {
    table: IdentifierMappingTable,
    registry: Arc<dyn BlockRegistry>,
    fallback: Identifier,
    layer_blocks: HashSet<Identifier>,
}

impl BlockLayerResolver {
    /// Fails only if the registry does not know the fallback block, since
    /// `resolve` could then hand out an unplaceable block.
    pub fn new(table: IdentifierMappingTable, registry: Arc<dyn BlockRegistry>) -> Result<Self, MappingError> {
        let fallback = Identifier::parse(FALLBACK_LAYER)?;
        if !registry.is_registered(&fallback) {
            return Err(MappingError::UnregisteredFallback(fallback));
        }

        log::info!("Registered {} block-to-layer mappings", table.len());
        let mut resolver = Self {
            table,
            registry,
            fallback,
            layer_blocks: HashSet::new(),
        };
        resolver.rebuild_layer_blocks();
        Ok(resolver)
    }

    fn rebuild_layer_blocks(&mut self) {
        self.layer_blocks = self
            .table
            .iter()
            .filter_map(|(_, raw)| Identifier::try_parse(raw))
            .chain(std::iter::once(self.fallback.clone()))
            .collect();
    }

    /// Layer block for `surface`. Always returns a registered block.
    pub fn resolve(&self, surface: &Identifier) -> Identifier {
        let Some(raw) = self.table.raw_target(surface) else {
            log::debug!("No layer mapping found for block: {}, using {} as fallback", surface, self.fallback);
            return self.fallback.clone();
        };

        let target = match Identifier::parse(raw) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("Invalid layer block identifier {:?}: {}", raw, e);
                return self.fallback.clone();
            }
        };

        if !self.registry.is_registered(&target) {
            log::warn!("Layer block not found in registry: {}. Is the layer pack installed?", target);
            return self.fallback.clone();
        }

        target
    }

    pub fn has_mapping(&self, surface: &Identifier) -> bool {
        self.table.contains(surface)
    }

    /// Add or replace a mapping at runtime.
    pub fn register_mapping(&mut self, surface: Identifier, layer_block: impl Into<String>) {
        let layer_block = layer_block.into();
        log::info!("Registered custom mapping: {} -> {}", surface, layer_block);
        self.table.upsert(surface, layer_block);
        self.rebuild_layer_blocks();
    }

    /// Whether `block` is something `resolve` can produce (a previous run's layer).
    pub fn is_layer_block(&self, block: &Identifier) -> bool {
        self.layer_blocks.contains(block)
    }

    pub fn fallback(&self) -> &Identifier {
        &self.fallback
    }

    pub fn table(&self) -> &IdentifierMappingTable {
        &self.table
    }
}
