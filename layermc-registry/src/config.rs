//! Mapping config files.
//!
//! Both tables live in `<config dir>/<name>.json`:
//! `{ "_comment": "...", "mappings": { "<vanilla id>": "<target id>" } }`.
//! A missing file is bootstrapped from the built-in defaults so users have
//! something to edit; an existing file is never overwritten on load.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const BLOCK_MAPPINGS_FILE: &str = "block_mappings.json";
pub const PLANT_MAPPINGS_FILE: &str = "plant_mappings.json";

const EDIT_COMMENT: &str = "This file can be edited to customize mappings. Changes will be loaded on next startup.";

pub const DEFAULT_BLOCK_MAPPINGS: &[(&str, &str)] = &[
    ("minecraft:grass_block", "conquest:grass_layer"),
    ("minecraft:dirt", "conquest:dirt_layer"),
    ("minecraft:coarse_dirt", "conquest:coarse_dirt_layer"),
    ("minecraft:podzol", "conquest:podzol_layer"),
    ("minecraft:sand", "conquest:sand_layer"),
    ("minecraft:red_sand", "conquest:red_sand_layer"),
    ("minecraft:gravel", "conquest:gravel_layer"),
    ("minecraft:stone", "conquest:stone_layer"),
    ("minecraft:mud", "conquest:mud_layer"),
    ("minecraft:snow_block", "minecraft:snow"),
];

pub const DEFAULT_PLANT_MAPPINGS: &[(&str, &str)] = &[
    ("minecraft:short_grass", "conquest:short_grass"),
    ("minecraft:tall_grass", "conquest:tall_grass"),
    ("minecraft:fern", "conquest:fern"),
    ("minecraft:large_fern", "conquest:large_fern"),
    ("minecraft:dandelion", "conquest:dandelion"),
    ("minecraft:poppy", "conquest:poppy"),
    ("minecraft:cornflower", "conquest:cornflower"),
    ("minecraft:dead_bush", "conquest:dead_bush"),
];

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MappingFile {
    #[serde(rename = "_comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
}

pub fn defaults_to_map(defaults: &[(&str, &str)]) -> BTreeMap<String, String> {
    defaults.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Parse a mapping file. Unknown top-level keys are ignored.
pub fn read_mapping_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file: MappingFile =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(file.mappings)
}

/// Load `file_name` from `config_dir`, falling back to `defaults`.
///
/// Never fails: a broken user file is logged and the defaults are used
/// (without touching the user's file).
pub fn load_mappings(config_dir: &Path, file_name: &str, defaults: &[(&str, &str)]) -> BTreeMap<String, String> {
    let path = config_dir.join(file_name);
    if path.exists() {
        match read_mapping_file(&path) {
            Ok(mappings) => {
                log::info!("Loaded {} mappings from external config: {}", mappings.len(), path.display());
                return mappings;
            }
            Err(e) => {
                log::error!("Failed to load external config file {}: {:?}", path.display(), e);
            }
        }
    }

    let mappings = defaults_to_map(defaults);
    log::info!("Using {} built-in default mappings for {}", mappings.len(), file_name);

    if let Err(e) = create_default_config(config_dir, file_name, &mappings) {
        log::error!("Failed to create external config file: {:?}", e);
    }
    mappings
}

/// Write the defaults out for editing, unless the file already exists.
fn create_default_config(config_dir: &Path, file_name: &str, mappings: &BTreeMap<String, String>) -> Result<()> {
    let path = config_dir.join(file_name);
    if path.exists() {
        return Ok(());
    }
    write_mapping_file(config_dir, file_name, mappings)?;
    log::info!("Created default config file: {}", path.display());
    Ok(())
}

/// Write `mappings` to `config_dir/file_name`, replacing any existing file.
pub fn save_mappings(config_dir: &Path, file_name: &str, mappings: &BTreeMap<String, String>) -> Result<()> {
    write_mapping_file(config_dir, file_name, mappings)?;
    log::info!("Saved mappings to config file: {}", config_dir.join(file_name).display());
    Ok(())
}

fn write_mapping_file(config_dir: &Path, file_name: &str, mappings: &BTreeMap<String, String>) -> Result<()> {
    if !config_dir.exists() {
        fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config directory {}", config_dir.display()))?;
        log::info!("Created config directory: {}", config_dir.display());
    }

    let file = MappingFile {
        comment: Some(EDIT_COMMENT.to_string()),
        mappings: mappings.clone(),
    };
    let json = serde_json::to_string_pretty(&file).context("Failed to serialize mappings")?;
    let path = config_dir.join(file_name);
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
