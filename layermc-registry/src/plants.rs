use std::collections::HashMap;
use std::sync::Arc;

use crate::identifier::Identifier;
use crate::registry::BlockRegistry;
use crate::MappingError;

/// Vanilla plant <-> decorative plant, both directions.
///
/// The two maps are exact inverses: registering `(v, d)` evicts whatever
/// `v` or `d` were paired with before.
pub struct PlantMappingResolver {
    to_decorative: HashMap<Identifier, Identifier>,
    to_vanilla: HashMap<Identifier, Identifier>,
    registry: Arc<dyn BlockRegistry>,
}

impl PlantMappingResolver {
    pub fn new(registry: Arc<dyn BlockRegistry>) -> Self {
        Self {
            to_decorative: HashMap::new(),
            to_vanilla: HashMap::new(),
            registry,
        }
    }

    /// Build from config pairs. Bad pairs are logged and skipped.
    pub fn build<I, K, V>(pairs: I, registry: Arc<dyn BlockRegistry>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut resolver = Self::new(registry);
        for (vanilla, decorative) in pairs {
            if let Err(e) = resolver.register_mapping_str(vanilla.as_ref(), decorative.as_ref()) {
                log::warn!("Skipping plant mapping {} -> {}: {}", vanilla.as_ref(), decorative.as_ref(), e);
            }
        }

        log::info!("Registered {} plant mappings", resolver.len());
        resolver
    }

    fn register_mapping_str(&mut self, vanilla: &str, decorative: &str) -> Result<(), MappingError> {
        let vanilla = Identifier::parse(vanilla)?;
        let decorative = Identifier::parse(decorative)?;
        self.register_mapping(vanilla, decorative)
    }

    /// Register a bidirectional mapping. The vanilla plant must be a known block.
    pub fn register_mapping(&mut self, vanilla: Identifier, decorative: Identifier) -> Result<(), MappingError> {
        if !self.registry.is_registered(&vanilla) {
            return Err(MappingError::UnregisteredSource(vanilla));
        }

        if let Some(old) = self.to_decorative.remove(&vanilla) {
            self.to_vanilla.remove(&old);
        }
        if let Some(old) = self.to_vanilla.remove(&decorative) {
            self.to_decorative.remove(&old);
        }

        self.to_decorative.insert(vanilla.clone(), decorative.clone());
        self.to_vanilla.insert(decorative, vanilla);
        Ok(())
    }

    /// Decorative plant for `vanilla`, or `None` (plants have no fallback).
    pub fn to_decorative(&self, vanilla: &Identifier) -> Option<Identifier> {
        let decorative = self.to_decorative.get(vanilla)?;
        if !self.registry.is_registered(decorative) {
            log::warn!("Decorative plant not found: {}. Is the plant pack installed?", decorative);
            return None;
        }
        Some(decorative.clone())
    }

    pub fn to_vanilla(&self, decorative: &Identifier) -> Option<&Identifier> {
        self.to_vanilla.get(decorative)
    }

    pub fn to_vanilla_str(&self, decorative: &str) -> Option<&Identifier> {
        self.to_vanilla.get(&Identifier::try_parse(decorative)?)
    }

    pub fn is_replaceable(&self, block: &Identifier) -> bool {
        self.to_decorative.contains_key(block)
    }

    pub fn is_decorative_plant(&self, block: &Identifier) -> bool {
        self.to_vanilla.contains_key(block)
    }

    pub fn len(&self) -> usize {
        self.to_decorative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_decorative.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SetRegistry;

    fn id(s: &str) -> Identifier {
        Identifier::parse(s).unwrap()
    }

    fn registry() -> Arc<dyn BlockRegistry> {
        Arc::new(SetRegistry::from_names([
            "minecraft:fern",
            "minecraft:short_grass",
            "minecraft:dandelion",
            "minecraft:poppy",
            "conquest:fern",
            "conquest:short_grass",
            "conquest:dandelion",
        ]))
    }

    #[test]
    fn test_round_trip_both_directions() {
        let pairs = [
            ("minecraft:fern", "conquest:fern"),
            ("minecraft:short_grass", "conquest:short_grass"),
        ];
        let plants = PlantMappingResolver::build(pairs, registry());
        assert_eq!(plants.len(), 2);
        for (v, d) in pairs {
            assert_eq!(plants.to_decorative(&id(v)), Some(id(d)));
            assert_eq!(plants.to_vanilla(&id(d)), Some(&id(v)));
            assert_eq!(plants.to_vanilla_str(d), Some(&id(v)));
        }
    }

    #[test]
    fn test_classification() {
        let plants = PlantMappingResolver::build([("minecraft:fern", "conquest:fern")], registry());
        assert!(plants.is_replaceable(&id("minecraft:fern")));
        assert!(!plants.is_replaceable(&id("conquest:fern")));
        assert!(plants.is_decorative_plant(&id("conquest:fern")));
        assert!(!plants.is_decorative_plant(&id("minecraft:fern")));
    }

    #[test]
    fn test_missing_and_unregistered_have_no_fallback() {
        let plants = PlantMappingResolver::build(
            [("minecraft:poppy", "conquest:poppy"), ("minecraft:fern", "conquest:fern")],
            registry(),
        );
        assert_eq!(plants.to_decorative(&id("minecraft:dandelion")), None);
        // mapped, but the decorative block is not installed
        assert!(plants.is_replaceable(&id("minecraft:poppy")));
        assert_eq!(plants.to_decorative(&id("minecraft:poppy")), None);
    }

    #[test]
    fn test_build_skips_bad_pairs() {
        let plants = PlantMappingResolver::build(
            [
                ("minecraft:fern", "conquest:fern"),
                ("minecraft:unknown_plant", "conquest:short_grass"),
                ("minecraft:dandelion", "conquest:Not Valid"),
                ("bad key", "conquest:dandelion"),
            ],
            registry(),
        );
        assert_eq!(plants.len(), 1);
        assert_eq!(plants.to_vanilla_str("conquest:Not Valid"), None);
    }

    #[test]
    fn test_reregistration_keeps_maps_inverse() {
        let mut plants = PlantMappingResolver::new(registry());
        plants.register_mapping(id("minecraft:fern"), id("conquest:fern")).unwrap();
        // same decorative target claimed by another vanilla plant
        plants.register_mapping(id("minecraft:short_grass"), id("conquest:fern")).unwrap();
        assert!(!plants.is_replaceable(&id("minecraft:fern")));
        assert_eq!(plants.to_vanilla(&id("conquest:fern")), Some(&id("minecraft:short_grass")));

        // vanilla plant moved to a new decorative target
        plants.register_mapping(id("minecraft:short_grass"), id("conquest:short_grass")).unwrap();
        assert!(!plants.is_decorative_plant(&id("conquest:fern")));
        assert_eq!(plants.len(), 1);
        assert_eq!(
            plants.to_decorative(&id("minecraft:short_grass")),
            Some(id("conquest:short_grass"))
        );
    }
}
