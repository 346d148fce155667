//! Sync run configuration.

use serde::{Deserialize, Serialize};

use crate::error::{KgvecError, KgvecResult};

pub const DEFAULT_COLLECTION: &str = "acme_knowledge_graph";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_SCAN_LIMIT: u32 = 10_000;
pub const DEFAULT_EMBED_CONCURRENCY: usize = 4;

/// Models whose output dimension is known without asking the provider.
const KNOWN_DIMENSIONS: &[(&str, usize)] = &[
    ("text-embedding-3-small", 1536),
    ("text-embedding-3-large", 3072),
    ("text-embedding-ada-002", 1536),
    ("nomic-embed-text", 768),
    ("mxbai-embed-large", 1024),
    ("all-minilm", 384),
];

/// Look up the vector dimension of a known embedding model.
pub fn known_dimension(model: &str) -> Option<usize> {
    KNOWN_DIMENSIONS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, dim)| *dim)
}

/// Which embedding service produces the vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    #[default]
    OpenAi,
    Ollama,
}

impl EmbeddingProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }

    pub fn from_str(s: &str) -> KgvecResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            _ => Err(KgvecError::config(format!(
                "Invalid embedding provider: '{}'. Use: openai, ollama",
                s
            ))),
        }
    }
}

/// Options for one synchronization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub embedding_provider: EmbeddingProvider,
    pub embedding_model: String,
    /// Explicit vector size. Required for models missing from the known table.
    pub vector_dimension: Option<usize>,
    pub batch_size: usize,
    /// Only sync the first N entities of the graph snapshot.
    pub max_items: Option<usize>,
    pub collection_name: String,
    /// Upper bound on the number of stored points read for change detection.
    pub scan_limit: u32,
    pub embed_concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            embedding_provider: EmbeddingProvider::default(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            vector_dimension: None,
            batch_size: DEFAULT_BATCH_SIZE,
            max_items: None,
            collection_name: DEFAULT_COLLECTION.to_string(),
            scan_limit: DEFAULT_SCAN_LIMIT,
            embed_concurrency: DEFAULT_EMBED_CONCURRENCY,
        }
    }
}

impl SyncConfig {
    /// Resolve the vector dimension from the explicit setting or the model table.
    pub fn resolved_dimension(&self) -> KgvecResult<usize> {
        match (self.vector_dimension, known_dimension(&self.embedding_model)) {
            (Some(0), _) => Err(KgvecError::config("vector_dimension must be greater than 0")),
            (Some(explicit), Some(known)) if explicit != known => Err(KgvecError::config(format!(
                "vector_dimension {} does not match model '{}' ({} dimensions)",
                explicit, self.embedding_model, known
            ))),
            (Some(explicit), _) => Ok(explicit),
            (None, Some(known)) => Ok(known),
            (None, None) => Err(KgvecError::config(format!(
                "Unknown embedding model '{}': set vector_dimension explicitly",
                self.embedding_model
            ))),
        }
    }

    /// Check every option before a run starts. Returns the resolved dimension.
    pub fn validate(&self) -> KgvecResult<usize> {
        if self.collection_name.trim().is_empty() {
            return Err(KgvecError::config("collection_name must not be empty"));
        }
        if self.embedding_model.trim().is_empty() {
            return Err(KgvecError::config("embedding_model must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(KgvecError::config("batch_size must be greater than 0"));
        }
        if self.embed_concurrency == 0 {
            return Err(KgvecError::config("embed_concurrency must be greater than 0"));
        }
        if self.scan_limit == 0 {
            return Err(KgvecError::config("scan_limit must be greater than 0"));
        }
        self.resolved_dimension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve() {
        let config = SyncConfig::default();
        assert_eq!(config.validate().unwrap(), 1536);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.max_items, None);
    }

    #[test]
    fn test_large_model_dimension() {
        let config = SyncConfig {
            embedding_model: "text-embedding-3-large".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolved_dimension().unwrap(), 3072);
    }

    #[test]
    fn test_unknown_model_needs_dimension() {
        let mut config = SyncConfig {
            embedding_model: "my-finetuned-embedder".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(KgvecError::Config(_))));

        config.vector_dimension = Some(512);
        assert_eq!(config.validate().unwrap(), 512);
    }

    #[test]
    fn test_conflicting_dimension_rejected() {
        let config = SyncConfig {
            vector_dimension: Some(768),
            ..Default::default()
        };
        assert!(config.resolved_dimension().is_err());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = SyncConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: SyncConfig = toml::from_str(
            r#"
            embedding_provider = "ollama"
            embedding_model = "nomic-embed-text"
            batch_size = 50
            max_items = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.embedding_provider, EmbeddingProvider::Ollama);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.max_items, Some(20));
        assert_eq!(config.collection_name, DEFAULT_COLLECTION);
        assert_eq!(config.validate().unwrap(), 768);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!(EmbeddingProvider::from_str("OpenAI").unwrap(), EmbeddingProvider::OpenAi);
        assert!(EmbeddingProvider::from_str("cohere").is_err());
    }
}
