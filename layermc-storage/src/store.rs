use std::collections::BTreeMap;

use layermc_registry::Identifier;

use crate::format::{self, PlantDocument};
use crate::{BlockPos, MemoryBackend, PlantBackend, StoreError};

/// Record of every plant the generator replaced, keyed by the plant's position.
///
/// Per position: `empty -> store_plant -> recorded (-> store_tall_plant) -> remove_* -> empty`.
/// Identity and tall flag are independent maps so either can be set or
/// cleared on its own. Changes stay in memory until [`save`](Self::save).
pub struct PlantRestorationStore {
    backend: Box<dyn PlantBackend>,
    plants: BTreeMap<BlockPos, String>,
    tall_flags: BTreeMap<BlockPos, bool>,
}

impl PlantRestorationStore {
    /// Open and eagerly load. A missing or malformed document gives an empty store.
    pub fn open(backend: impl PlantBackend + 'static) -> Self {
        let mut store = Self {
            backend: Box::new(backend),
            plants: BTreeMap::new(),
            tall_flags: BTreeMap::new(),
        };
        store.load();
        store
    }

    pub fn in_memory() -> Self {
        Self::open(MemoryBackend::new())
    }

    fn load(&mut self) {
        let text = match self.backend.read() {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::info!("No existing plant data found at {}", self.backend.describe());
                return;
            }
            Err(e) => {
                log::error!("Failed to read plant data from {}: {}", self.backend.describe(), e);
                return;
            }
        };

        match format::parse_document(&text) {
            Ok(doc) => {
                self.plants = doc.plants;
                self.tall_flags = doc.tall_flags;
                log::info!("Loaded {} plant entries from {}", self.plants.len(), self.backend.describe());
            }
            Err(e) => {
                log::error!("Failed to load plant data from {}: {}", self.backend.describe(), e);
            }
        }
    }

    pub fn store_plant(&mut self, pos: BlockPos, original: &Identifier) {
        self.plants.insert(pos, original.to_string());
    }

    pub fn store_tall_plant(&mut self, pos: BlockPos, is_tall: bool) {
        self.tall_flags.insert(pos, is_tall);
    }

    /// Original plant at `pos`, or None if nothing valid was recorded.
    pub fn get_plant(&self, pos: BlockPos) -> Option<Identifier> {
        let raw = self.plants.get(&pos)?;
        match Identifier::parse(raw) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Stored plant at {} is not a valid identifier: {}", pos, e);
                None
            }
        }
    }

    pub fn is_tall_plant(&self, pos: BlockPos) -> bool {
        self.tall_flags.get(&pos).copied().unwrap_or(false)
    }

    pub fn remove_plant(&mut self, pos: BlockPos) {
        self.plants.remove(&pos);
    }

    pub fn remove_tall_plant_flag(&mut self, pos: BlockPos) {
        self.tall_flags.remove(&pos);
    }

    pub fn has_plant_data(&self, pos: BlockPos) -> bool {
        self.plants.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    /// Persist both maps. The previous save survives a failed write.
    pub fn try_save(&self) -> Result<(), StoreError> {
        let doc = PlantDocument {
            plants: self.plants.clone(),
            tall_flags: self.tall_flags.clone(),
        };
        let json = format::to_json(&doc)?;
        self.backend.write(&json)?;
        log::info!("Saved {} plant entries to {}", self.plants.len(), self.backend.describe());
        Ok(())
    }

    /// Like [`try_save`](Self::try_save) but only logs failures. Returns whether it worked.
    pub fn save(&self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save plant data to {}: {}", self.backend.describe(), e);
                false
            }
        }
    }

    /// Drop everything and persist the empty state.
    pub fn clear(&mut self) -> bool {
        self.plants.clear();
        self.tall_flags.clear();
        self.save()
    }
}
