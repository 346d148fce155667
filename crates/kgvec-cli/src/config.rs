//! Layered configuration: `kgvec.toml`, then environment, then flags.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use kgvec_core::SyncConfig;
use kgvec_embedding::{OllamaConfig, OpenAiConfig, QdrantConfig};
use kgvec_graph::GraphConfig;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "kgvec.toml";

/// Everything the binary needs to wire a run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sync: SyncConfig,
    pub graph: GraphConfig,
    pub qdrant: QdrantConfig,
    pub openai: OpenAiConfig,
    pub ollama: OllamaConfig,
}

impl AppConfig {
    /// Load the file (if any) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override file values with non-empty environment variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = var("OPENAI_API_KEY") {
            self.openai.api_key = Some(key);
        }
        if let Some(endpoint) = var("KGVEC_GRAPH_ENDPOINT") {
            self.graph.endpoint = endpoint;
        }
        if let Some(url) = var("KGVEC_QDRANT_URL") {
            self.qdrant.url = url;
        }
        if let Some(collection) = var("KGVEC_COLLECTION") {
            self.sync.collection_name = collection;
        }
        if let Some(model) = var("KGVEC_EMBEDDING_MODEL") {
            self.sync.embedding_model = model;
        }
        if let Some(url) = var("OLLAMA_URL") {
            self.ollama.base_url = url;
        }
    }
}
