use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_NAMESPACE: &str = "minecraft";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,
    #[error("identifier {0:?} has an empty path")]
    MissingPart(String),
    #[error("identifier {0:?} contains more than one ':'")]
    ExtraSeparator(String),
    #[error("identifier {id:?} has invalid character {ch:?}")]
    InvalidChar { id: String, ch: char },
}

/// A `namespace:path` block name, e.g. `minecraft:grass_block`.
///
/// Stored in canonical form so equality is plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    full: String,
    split: usize,
}

impl Identifier {
    /// Parse `namespace:path`. A bare `path` or an empty namespace (`:path`)
    /// lands in the `minecraft` namespace.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        if raw.is_empty() {
            return Err(IdentifierError::Empty);
        }

        let (namespace, path) = match raw.split_once(':') {
            Some(("", path)) => (DEFAULT_NAMESPACE, path),
            Some((ns, path)) => (ns, path),
            None => (DEFAULT_NAMESPACE, raw),
        };
        if path.is_empty() {
            return Err(IdentifierError::MissingPart(raw.to_string()));
        }
        if path.contains(':') {
            return Err(IdentifierError::ExtraSeparator(raw.to_string()));
        }

        let valid_ns = |c: char| matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-');
        let valid_path = |c: char| valid_ns(c) || c == '/';
        if let Some(ch) = namespace.chars().find(|c| !valid_ns(*c)) {
            return Err(IdentifierError::InvalidChar { id: raw.to_string(), ch });
        }
        if let Some(ch) = path.chars().find(|c| !valid_path(*c)) {
            return Err(IdentifierError::InvalidChar { id: raw.to_string(), ch });
        }

        Ok(Self {
            full: format!("{}:{}", namespace, path),
            split: namespace.len(),
        })
    }

    /// `minecraft:air`
    pub fn air() -> Self {
        Self {
            full: format!("{}:air", DEFAULT_NAMESPACE),
            split: DEFAULT_NAMESPACE.len(),
        }
    }

    /// Like [`Identifier::parse`] but for call sites that treat a bad id as "absent".
    pub fn try_parse(raw: &str) -> Option<Self> {
        Self::parse(raw).ok()
    }

    pub fn namespace(&self) -> &str {
        &self.full[..self.split]
    }

    pub fn path(&self) -> &str {
        &self.full[self.split + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespaced() {
        let id = Identifier::parse("conquest:grass_layer").unwrap();
        assert_eq!(id.namespace(), "conquest");
        assert_eq!(id.path(), "grass_layer");
        assert_eq!(id.to_string(), "conquest:grass_layer");
    }

    #[test]
    fn test_bare_path_defaults_to_minecraft() {
        let id = Identifier::parse("fern").unwrap();
        assert_eq!(id.as_str(), "minecraft:fern");
        assert_eq!(id, Identifier::parse("minecraft:fern").unwrap());
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(Identifier::parse(""), Err(IdentifierError::Empty));
        assert!(matches!(Identifier::parse("minecraft:"), Err(IdentifierError::MissingPart(_))));
        assert!(matches!(Identifier::parse(":"), Err(IdentifierError::MissingPart(_))));
        assert!(matches!(Identifier::parse("a:b:c"), Err(IdentifierError::ExtraSeparator(_))));
        assert!(matches!(
            Identifier::parse("Minecraft:Stone"),
            Err(IdentifierError::InvalidChar { ch: 'M', .. })
        ));
        assert!(Identifier::try_parse("minecraft:tall grass").is_none());
    }

    #[test]
    fn test_empty_namespace_defaults_to_minecraft() {
        let id = Identifier::parse(":stone").unwrap();
        assert_eq!(id.as_str(), "minecraft:stone");
        assert_eq!(id.namespace(), "minecraft");
        assert!(matches!(Identifier::parse("::stone"), Err(IdentifierError::ExtraSeparator(_))));
    }

    #[test]
    fn test_air() {
        assert_eq!(Identifier::air(), Identifier::parse("air").unwrap());
        assert_eq!(Identifier::air().path(), "air");
    }

    #[test]
    fn test_path_may_contain_slash() {
        let id = Identifier::parse("conquest:plants/fern_small").unwrap();
        assert_eq!(id.path(), "plants/fern_small");
    }

    #[test]
    fn test_serde_as_string() {
        let id = Identifier::parse("minecraft:snow").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"minecraft:snow\"");
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<Identifier>("\"bad id\"").is_err());
    }
}
