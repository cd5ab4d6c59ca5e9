use std::collections::HashSet;

use crate::identifier::Identifier;

/// Lookup capability for "does this block exist in the running game".
///
/// Implementations:
/// - `SetRegistry` - explicit set of known blocks (tests, `--registry` file)
/// - `OpenRegistry` - every well-formed identifier resolves
pub trait BlockRegistry: Send + Sync {
    fn is_registered(&self, id: &Identifier) -> bool;
}

#[derive(Debug, Default, Clone)]
pub struct SetRegistry {
    blocks: HashSet<Identifier>,
}

impl SetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw names. Unparseable names are skipped with a warning.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || name.starts_with('#') {
                continue;
            }
            match Identifier::parse(name) {
                Ok(id) => {
                    registry.blocks.insert(id);
                }
                Err(e) => log::warn!("Skipping registry entry {:?}: {}", name, e),
            }
        }
        registry
    }

    pub fn register(&mut self, id: Identifier) {
        self.blocks.insert(id);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockRegistry for SetRegistry {
    fn is_registered(&self, id: &Identifier) -> bool {
        self.blocks.contains(id)
    }
}

/// Registry that knows every block. Used when no block list is supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenRegistry;

impl BlockRegistry for OpenRegistry {
    fn is_registered(&self, _id: &Identifier) -> bool {
        true
    }
}
