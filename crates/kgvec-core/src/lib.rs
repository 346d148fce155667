//! kgvec Core Library
//!
//! Entity model, canonical text, point identity and run configuration for
//! synchronizing a knowledge graph into a vector index.

pub mod config;
pub mod entity;
pub mod error;
pub mod identity;

pub use config::{EmbeddingProvider, SyncConfig};
pub use entity::{canonical_text, EntityRecord};
pub use error::{KgvecError, KgvecResult};
pub use identity::point_id;
