//! In-memory plant backend.
//!
//! Useful for tests and dry runs. Data is lost on restart.

use std::sync::{Arc, RwLock};

use super::{PlantBackend, StoreError};

/// Keeps the last written document in memory.
///
/// Clones share the same document, so a test can keep a handle and
/// "reopen" a store from it.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    document: Arc<RwLock<Option<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a pre-existing document (e.g. a legacy file's contents).
    pub fn with_document(contents: impl Into<String>) -> Self {
        Self {
            document: Arc::new(RwLock::new(Some(contents.into()))),
        }
    }

    pub fn document(&self) -> Option<String> {
        self.document.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl PlantBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.document())
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        *self.document.write().unwrap_or_else(|e| e.into_inner()) = Some(contents.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
