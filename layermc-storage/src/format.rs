//! On-disk shape of the restoration file.
//!
//! Current form:
//! `{ "plants": { "x,y,z": "<plant id>" }, "tallFlags": { "x,y,z": true } }`
//!
//! Older saves were a flat `{ "x,y,z": "<plant id>" }` object, possibly with a
//! `tallFlags` key next to the entries. Both are accepted on load; saves always
//! use the current form.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{BlockPos, StoreError};

const PLANTS_KEY: &str = "plants";
const TALL_FLAGS_KEY: &str = "tallFlags";

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlantDocument {
    pub plants: BTreeMap<BlockPos, String>,
    pub tall_flags: BTreeMap<BlockPos, bool>,
}

#[derive(Serialize)]
struct DocumentOut<'a> {
    plants: BTreeMap<String, &'a str>,
    #[serde(rename = "tallFlags")]
    tall_flags: BTreeMap<String, bool>,
}

pub fn to_json(doc: &PlantDocument) -> Result<String, StoreError> {
    let out = DocumentOut {
        plants: doc.plants.iter().map(|(pos, id)| (pos.to_key(), id.as_str())).collect(),
        tall_flags: doc.tall_flags.iter().map(|(pos, tall)| (pos.to_key(), *tall)).collect(),
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

/// Parse either document shape. Individual bad entries are skipped with a
/// warning; only an unreadable document as a whole is an error.
pub fn parse_document(text: &str) -> Result<PlantDocument, StoreError> {
    let root = match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => map,
        Value::Null => return Ok(PlantDocument::default()),
        other => return Err(StoreError::Format(format!("expected an object, found {}", kind(&other)))),
    };

    let mut doc = PlantDocument::default();

    match root.get(PLANTS_KEY) {
        Some(Value::Object(plants)) => read_plants(plants.iter(), &mut doc),
        Some(_) => log::warn!("Ignoring non-object \"{}\" entry in plant data", PLANTS_KEY),
        None => {
            // Legacy: the root itself is the plant map
            read_plants(root.iter().filter(|(k, _)| k.as_str() != TALL_FLAGS_KEY), &mut doc);
        }
    }

    if let Some(flags) = root.get(TALL_FLAGS_KEY) {
        match flags {
            Value::Object(flags) => read_tall_flags(flags, &mut doc),
            _ => log::warn!("Ignoring non-object \"{}\" entry in plant data", TALL_FLAGS_KEY),
        }
    }

    Ok(doc)
}

fn read_plants<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>, doc: &mut PlantDocument) {
    for (key, value) in entries {
        let Some(pos) = parse_key(key) else { continue };
        match value {
            Value::String(id) => {
                doc.plants.insert(pos, id.clone());
            }
            other => log::warn!("Skipping plant entry {}: expected a string, found {}", key, kind(other)),
        }
    }
}

fn read_tall_flags(flags: &Map<String, Value>, doc: &mut PlantDocument) {
    for (key, value) in flags {
        let Some(pos) = parse_key(key) else { continue };
        let tall = match value {
            Value::Bool(b) => *b,
            Value::String(s) => s.eq_ignore_ascii_case("true"),
            other => {
                log::warn!("Skipping tall flag {}: expected a boolean, found {}", key, kind(other));
                continue;
            }
        };
        doc.tall_flags.insert(pos, tall);
    }
}

fn parse_key(key: &str) -> Option<BlockPos> {
    match key.parse() {
        Ok(pos) => Some(pos),
        Err(e) => {
            log::warn!("Skipping plant data entry: {}", e);
            None
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
