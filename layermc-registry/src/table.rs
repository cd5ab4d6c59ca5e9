use std::collections::HashMap;

use crate::identifier::Identifier;
use crate::registry::BlockRegistry;

/// Source block -> raw target id, loaded from a mapping config file.
///
/// Targets stay as strings until looked up; an invalid target only makes
/// that single lookup miss.
#[derive(Debug, Default, Clone)]
pub struct IdentifierMappingTable {
    entries: HashMap<Identifier, String>,
}

impl IdentifierMappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from config pairs. Never fails: bad or unknown keys are logged and dropped.
    pub fn build<I, K, V>(pairs: I, registry: &dyn BlockRegistry) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            let source = match Identifier::parse(key) {
                Ok(id) => id,
                Err(e) => {
                    log::warn!("Invalid source block ID in config: {} ({})", key, e);
                    continue;
                }
            };
            if !registry.is_registered(&source) {
                log::warn!("Source block not found in registry: {}", source);
                continue;
            }
            table.entries.insert(source, value.into());
        }
        table
    }

    /// Parsed target for `key`. `None` when unmapped or the target is not a valid id.
    pub fn lookup(&self, key: &Identifier) -> Option<Identifier> {
        let raw = self.entries.get(key)?;
        match Identifier::parse(raw) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Invalid target identifier {:?} for {}: {}", raw, key, e);
                None
            }
        }
    }

    pub fn raw_target(&self, key: &Identifier) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert or overwrite one mapping. Returns the previous raw target.
    pub fn upsert(&mut self, key: Identifier, target: impl Into<String>) -> Option<String> {
        self.entries.insert(key, target.into())
    }

    pub fn contains(&self, key: &Identifier) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }
}
