//! The `sync` command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use kgvec_core::{EmbeddingProvider, SyncConfig};
use kgvec_embedding::{Embedder, OllamaClient, OpenAiClient, QdrantStore};
use kgvec_graph::SparqlSource;
use kgvec_sync::{SyncEngine, SyncProgress};

use crate::config::AppConfig;
use crate::output;

#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Points per upsert request
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Only sync the first N entities
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Target collection name
    #[arg(long)]
    pub collection: Option<String>,

    /// Embedding model
    #[arg(long)]
    pub model: Option<String>,

    /// Embedding provider (openai or ollama)
    #[arg(long)]
    pub provider: Option<String>,

    /// Concurrent embedding requests
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    /// Apply command line overrides on top of the loaded settings.
    pub fn apply(&self, sync: &mut SyncConfig) -> Result<()> {
        if let Some(batch_size) = self.batch_size {
            sync.batch_size = batch_size;
        }
        if let Some(max_items) = self.max_items {
            sync.max_items = Some(max_items);
        }
        if let Some(collection) = &self.collection {
            sync.collection_name = collection.clone();
        }
        if let Some(model) = &self.model {
            sync.embedding_model = model.clone();
        }
        if let Some(provider) = &self.provider {
            sync.embedding_provider = EmbeddingProvider::from_str(provider)?;
        }
        if let Some(concurrency) = self.concurrency {
            sync.embed_concurrency = concurrency;
        }
        Ok(())
    }
}

/// Progress bar over the embedding stage.
struct BarProgress(ProgressBar);

impl SyncProgress for BarProgress {
    fn start(&mut self, total: usize) {
        self.0.set_length(total as u64);
        self.0.set_position(0);
    }

    fn advance(&mut self) {
        self.0.inc(1);
    }

    fn finish(&mut self) {
        self.0.finish_and_clear();
    }
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} Embedding [{bar:40}] {pos}/{len} ({eta})")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

pub(crate) fn build_embedder(config: &AppConfig) -> Result<Box<dyn Embedder>> {
    let model = config.sync.embedding_model.as_str();
    let embedder: Box<dyn Embedder> = match config.sync.embedding_provider {
        EmbeddingProvider::OpenAi => Box::new(OpenAiClient::new(&config.openai, model)?),
        EmbeddingProvider::Ollama => Box::new(OllamaClient::new(&config.ollama, model)?),
    };
    Ok(embedder)
}

pub async fn execute(args: SyncArgs, mut config: AppConfig) -> Result<()> {
    args.apply(&mut config.sync)?;

    let embedder = build_embedder(&config)?;
    let source = SparqlSource::from_config(&config.graph)?;
    let store = QdrantStore::new(&config.qdrant)?;
    let collection = config.sync.collection_name.clone();
    let model = embedder.model().to_string();

    let engine = SyncEngine::new(source, embedder, store, config.sync.clone())?;

    if !args.json {
        println!(
            "{} {} {} {}",
            "Syncing".bold(),
            config.graph.endpoint.cyan(),
            format!("-> {}", collection).dimmed(),
            format!("({})", model).dimmed()
        );
    }

    let result = if args.no_progress || args.json {
        engine.run().await
    } else {
        let mut progress = BarProgress(progress_bar());
        engine.run_with_progress(&mut progress).await
    };
    let report = result.context("Sync failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_report(&report, &collection, config.sync.scan_limit);
    }

    Ok(())
}
