use thiserror::Error;

pub mod config;
pub mod identifier;
pub mod layers;
pub mod plants;
pub mod registry;
pub mod table;

pub use identifier::{Identifier, IdentifierError};
pub use layers::BlockLayerResolver;
pub use plants::PlantMappingResolver;
pub use registry::{BlockRegistry, OpenRegistry, SetRegistry};
pub use table::IdentifierMappingTable;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
    #[error("block not found in registry: {0}")]
    UnregisteredSource(Identifier),
    #[error("fallback layer block not found in registry: {0}")]
    UnregisteredFallback(Identifier),
}
