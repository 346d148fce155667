//! The `status` command.

use anyhow::Result;
use colored::Colorize;

use kgvec_core::EmbeddingProvider;
use kgvec_embedding::{OllamaClient, QdrantStore, VectorStore};

use crate::config::AppConfig;
use crate::output::field;

pub async fn execute(config: &AppConfig) -> Result<()> {
    let sync = &config.sync;

    println!("{}", "kgvec status".bold());
    println!("{}", "─".repeat(50));

    field("Graph endpoint", &config.graph.endpoint);
    field("Named graphs", &config.graph.graphs.len().to_string());
    field("Qdrant", &config.qdrant.url);
    field("Collection", &sync.collection_name);
    field("Provider", sync.embedding_provider.as_str());
    field("Model", &sync.embedding_model);

    match sync.resolved_dimension() {
        Ok(dimension) => field("Dimension", &dimension.to_string()),
        Err(e) => field("Dimension", &e.to_string().red().to_string()),
    }

    field("Batch size", &sync.batch_size.to_string());
    field(
        "Max items",
        &sync.max_items.map_or_else(|| "all".to_string(), |n| n.to_string()),
    );

    match sync.embedding_provider {
        EmbeddingProvider::OpenAi => {
            let key = if config.openai.api_key.is_some() {
                "set".green()
            } else {
                "not set".yellow()
            };
            field("OpenAI key", &key.to_string());
        }
        EmbeddingProvider::Ollama => {
            field("Ollama", &config.ollama.base_url);
            let ollama = OllamaClient::new(&config.ollama, &sync.embedding_model)?;
            let model = if ollama.health_check().await? {
                "available".green()
            } else {
                "not pulled or unreachable".yellow()
            };
            field("Ollama model", &model.to_string());
        }
    }

    println!();
    let store = QdrantStore::new(&config.qdrant)?;
    match store.count(&sync.collection_name).await {
        Ok(count) => field("Points", &count.to_string().cyan().to_string()),
        Err(e) => field("Points", &format!("unavailable ({:#})", e).red().to_string()),
    }

    Ok(())
}
