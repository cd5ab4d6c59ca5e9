use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use layermc_registry::config::{self, BLOCK_MAPPINGS_FILE, DEFAULT_BLOCK_MAPPINGS, DEFAULT_PLANT_MAPPINGS, PLANT_MAPPINGS_FILE};
use layermc_registry::{
    BlockLayerResolver, BlockRegistry, Identifier, IdentifierMappingTable, MappingError, OpenRegistry,
    PlantMappingResolver, SetRegistry,
};

/// Which mapping table a command edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MappingKind {
    /// Surface block -> layer block
    Block,
    /// Vanilla plant -> decorative plant
    Plant,
}

impl MappingKind {
    fn file(self) -> (&'static str, &'static [(&'static str, &'static str)]) {
        match self {
            Self::Block => (BLOCK_MAPPINGS_FILE, DEFAULT_BLOCK_MAPPINGS),
            Self::Plant => (PLANT_MAPPINGS_FILE, DEFAULT_PLANT_MAPPINGS),
        }
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block => f.write_str("block"),
            Self::Plant => f.write_str("plant"),
        }
    }
}

/// Block registry from a newline-separated id list, or an open one.
pub fn load_registry(path: Option<&Path>) -> Result<Arc<dyn BlockRegistry>> {
    let Some(path) = path else {
        log::info!("No block registry given, every well-formed id is accepted");
        return Ok(Arc::new(OpenRegistry));
    };

    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read block registry {:?}", path))?;
    let registry = SetRegistry::from_names(text.lines());
    log::info!("Loaded {} block ids from {:?}", registry.len(), path);
    Ok(Arc::new(registry))
}

/// Load both mapping tables (bootstrapping default files) and build the resolvers.
pub fn load_resolvers(
    config_dir: &Path,
    registry: Arc<dyn BlockRegistry>,
) -> Result<(BlockLayerResolver, PlantMappingResolver)> {
    let block_pairs = config::load_mappings(config_dir, BLOCK_MAPPINGS_FILE, DEFAULT_BLOCK_MAPPINGS);
    let table = IdentifierMappingTable::build(&block_pairs, registry.as_ref());
    let layers = BlockLayerResolver::new(table, registry.clone()).context("Failed to set up layer blocks")?;

    let plant_pairs = config::load_mappings(config_dir, PLANT_MAPPINGS_FILE, DEFAULT_PLANT_MAPPINGS);
    let plants = PlantMappingResolver::build(&plant_pairs, registry);

    Ok((layers, plants))
}

/// Validate one mapping and write it into its config file. Entries already in
/// the file are kept as they are, including ones this registry does not know.
pub fn register_mapping(
    config_dir: &Path,
    registry: &dyn BlockRegistry,
    kind: MappingKind,
    from: &str,
    to: &str,
) -> Result<()> {
    let source = Identifier::parse(from).with_context(|| format!("Invalid source id {:?}", from))?;
    let target = Identifier::parse(to).with_context(|| format!("Invalid target id {:?}", to))?;
    if !registry.is_registered(&source) {
        return Err(MappingError::UnregisteredSource(source).into());
    }
    if !registry.is_registered(&target) {
        log::warn!("Target block {} is not registered yet, the mapping stays inactive until it is", target);
    }

    let (file, defaults) = kind.file();
    let mut mappings = config::load_mappings(config_dir, file, defaults);
    let (source, target) = (source.to_string(), target.to_string());
    if kind == MappingKind::Plant {
        // Decorative plants map back to exactly one vanilla plant
        mappings.retain(|vanilla, decorative| *vanilla == source || *decorative != target);
    }
    if let Some(old) = mappings.insert(source.clone(), target.clone()) {
        log::info!("Replacing {} mapping {} -> {}", kind, source, old);
    }
    config::save_mappings(config_dir, file, &mappings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstraps_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let (layers, plants) = load_resolvers(dir.path(), Arc::new(OpenRegistry)).unwrap();

        assert!(dir.path().join(BLOCK_MAPPINGS_FILE).exists());
        assert!(dir.path().join(PLANT_MAPPINGS_FILE).exists());
        assert_eq!(layers.table().len(), DEFAULT_BLOCK_MAPPINGS.len());
        assert_eq!(plants.len(), DEFAULT_PLANT_MAPPINGS.len());
    }

    #[test]
    fn test_registry_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.txt");
        std::fs::write(&path, "# vanilla\nminecraft:stone\nminecraft:snow\n\n").unwrap();

        let registry = load_registry(Some(&path)).unwrap();
        assert!(registry.is_registered(&Identifier::parse("minecraft:stone").unwrap()));
        assert!(!registry.is_registered(&Identifier::parse("conquest:grass_layer").unwrap()));
        assert!(load_registry(Some(&dir.path().join("missing.txt"))).is_err());
    }

    #[test]
    fn test_registry_without_snow_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(SetRegistry::from_names(["minecraft:stone"]));
        assert!(load_resolvers(dir.path(), registry).is_err());
    }

    #[test]
    fn test_register_mapping_persists() {
        let dir = tempfile::tempdir().unwrap();
        register_mapping(dir.path(), &OpenRegistry, MappingKind::Block, "minecraft:clay", "conquest:clay_layer").unwrap();

        let (layers, _) = load_resolvers(dir.path(), Arc::new(OpenRegistry)).unwrap();
        assert_eq!(
            layers.resolve(&Identifier::parse("minecraft:clay").unwrap()),
            Identifier::parse("conquest:clay_layer").unwrap()
        );
        // defaults were bootstrapped alongside the new entry
        assert_eq!(layers.table().len(), DEFAULT_BLOCK_MAPPINGS.len() + 1);
    }

    #[test]
    fn test_register_plant_mapping_replaces_old_owner() {
        let dir = tempfile::tempdir().unwrap();
        register_mapping(dir.path(), &OpenRegistry, MappingKind::Plant, "minecraft:azure_bluet", "conquest:fern").unwrap();

        let mappings = config::read_mapping_file(&dir.path().join(PLANT_MAPPINGS_FILE)).unwrap();
        assert_eq!(mappings.get("minecraft:azure_bluet").map(String::as_str), Some("conquest:fern"));
        assert!(!mappings.contains_key("minecraft:fern"));
    }

    #[test]
    fn test_register_mapping_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SetRegistry::from_names(["minecraft:snow", "minecraft:stone"]);
        assert!(register_mapping(dir.path(), &registry, MappingKind::Block, "Bad Id", "minecraft:snow").is_err());
        assert!(register_mapping(dir.path(), &registry, MappingKind::Block, "minecraft:clay", "minecraft:snow").is_err());
        assert!(!dir.path().join(BLOCK_MAPPINGS_FILE).exists());
    }
}
