use std::fmt;
use std::str::FromStr;

use thiserror::Error;

mod file;
pub mod format;
mod memory;
pub mod store;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use store::PlantRestorationStore;

/// Default restoration file name inside the data directory.
pub const PLANTS_FILE: &str = "layermc_plants.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("plant data io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("plant data json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("plant data has unexpected shape: {0}")]
    Format(String),
}

/// Coordinates of a block in the world.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn up(self, dy: i32) -> Self {
        Self::new(self.x, self.y + dy, self.z)
    }

    /// Like [`up`](Self::up), but None past the top of the `i32` range.
    pub fn checked_up(self, dy: i32) -> Option<Self> {
        Some(Self::new(self.x, self.y.checked_add(dy)?, self.z))
    }

    /// Canonical persistence key, `"x,y,z"`.
    pub fn to_key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid block position key: {0:?}")]
pub struct BlockPosParseError(pub String);

impl FromStr for BlockPos {
    type Err = BlockPosParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || BlockPosParseError(s.to_string());
        let mut parts = s.split(',').map(|p| p.trim().parse::<i32>());
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) => Ok(Self::new(x, y, z)),
            _ => Err(err()),
        }
    }
}

/// Where the restoration document lives.
///
/// - `FileBackend` - JSON file on disk, replaced atomically
/// - `MemoryBackend` - in-memory string (tests, dry runs)
pub trait PlantBackend: Send + Sync {
    /// Returns None if nothing has been saved yet.
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored document. A failed write must leave the previous one intact.
    fn write(&self, contents: &str) -> Result<(), StoreError>;

    /// Human readable location for logs.
    fn describe(&self) -> String;
}
