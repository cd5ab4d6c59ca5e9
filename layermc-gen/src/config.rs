use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Linear gradient from the edge: 7, 6, 5, 4, 3, 2, 1
    #[default]
    Basic,
    /// Each value held for two columns: 7, 7, 6, 6, ... 1, 1 (gentler on flat ground)
    Smooth,
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "smooth" => Ok(Self::Smooth),
            other => Err(format!("unknown generation mode {:?} (expected basic or smooth)", other)),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => f.write_str("basic"),
            Self::Smooth => f.write_str("smooth"),
        }
    }
}

/// Parameters for one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub mode: GenerationMode,
    /// Distance from an edge over which layers fade out (doubled in smooth mode).
    /// Recommended: 5-10.
    pub max_layer_distance: u32,
    /// Minimum height difference between neighbouring columns that counts as an edge.
    /// 1 = any step.
    pub edge_height_threshold: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::Basic,
            max_layer_distance: 7,
            edge_height_threshold: 1,
        }
    }
}

impl GenerationConfig {
    /// Clamp zero values up to 1 so a run always has a usable config.
    pub fn sanitized(self) -> Self {
        let mut config = self;
        if config.max_layer_distance == 0 {
            log::warn!("max_layer_distance must be positive, using 1");
            config.max_layer_distance = 1;
        }
        if config.edge_height_threshold == 0 {
            log::warn!("edge_height_threshold must be positive, using 1");
            config.edge_height_threshold = 1;
        }
        config
    }
}
