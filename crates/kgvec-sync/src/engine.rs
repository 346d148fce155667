//! The incremental sync pipeline.
//!
//! graph snapshot -> canonical text -> classification against the stored
//! snapshot -> embedding of new/changed entities -> batched upserts.

use futures::StreamExt;
use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::{debug, error, info, warn};

use kgvec_core::{canonical_text, EntityRecord, KgvecError, KgvecResult, SyncConfig};
use kgvec_embedding::{CollectionStatus, Embedder, VectorStore};
use kgvec_graph::EntitySource;

use crate::differ::{self, ChangeKind};
use crate::gate::{EmbeddingGate, PendingEntity};
use crate::report::SyncReport;
use crate::writer::BatchWriter;

/// Progress hooks for the embedding stage.
pub trait SyncProgress {
    fn start(&mut self, _total: usize) {}
    fn advance(&mut self) {}
    fn finish(&mut self) {}
}

impl SyncProgress for () {}

/// Runs one reconciliation pass of a graph snapshot into a collection.
pub struct SyncEngine<S, E, V> {
    source: S,
    embedder: E,
    store: V,
    config: SyncConfig,
    dimension: usize,
}

impl<S, E, V> SyncEngine<S, E, V>
where
    S: EntitySource,
    E: Embedder,
    V: VectorStore,
{
    /// Build an engine. Invalid configuration is rejected here, before any I/O.
    pub fn new(source: S, embedder: E, store: V, config: SyncConfig) -> KgvecResult<Self> {
        let dimension = config.validate()?;
        Ok(Self {
            source,
            embedder,
            store,
            config,
            dimension,
        })
    }

    pub async fn run(&self) -> KgvecResult<SyncReport> {
        self.run_with_progress(&mut ()).await
    }

    /// Run the pipeline, reporting embedding progress.
    ///
    /// Per-entity failures are counted in the report. Errors are returned only
    /// when the graph or the vector store cannot be used at all.
    pub async fn run_with_progress(&self, progress: &mut dyn SyncProgress) -> KgvecResult<SyncReport> {
        let collection = self.config.collection_name.as_str();
        let mut report = SyncReport::default();

        report.collection_created = self.prepare_collection(collection).await?;

        let fetched = self
            .source
            .fetch_entities()
            .await
            .map_err(|e| KgvecError::unavailable("graph", e))?;
        report.malformed = fetched.malformed;

        let mut entities = merge_by_uri(fetched.entities, &mut report);
        if let Some(max) = self.config.max_items {
            if entities.len() > max {
                info!(max, total = entities.len(), "Limiting indexing to the first items");
                entities.truncate(max);
            }
        }
        report.fetched = entities.len();

        if entities.is_empty() {
            info!(collection, "Graph snapshot is empty; nothing to sync");
            return Ok(report);
        }

        let candidates = self.normalize(entities, &mut report);

        let snapshot = differ::load_snapshot(&self.store, collection, self.config.scan_limit).await;
        report.prior_points = snapshot.len();
        report.snapshot = snapshot.mode();

        let mut pending = Vec::new();
        for (record, text) in candidates {
            match snapshot.classify(record.uri(), &text) {
                ChangeKind::Unchanged => report.unchanged += 1,
                change => pending.push(PendingEntity::new(&record, text, change)),
            }
        }

        info!(
            pending = pending.len(),
            unchanged = report.unchanged,
            snapshot = report.snapshot.as_str(),
            "Classified entities"
        );

        let gate = EmbeddingGate::new(&self.embedder, self.dimension, self.config.embed_concurrency);
        let mut writer = BatchWriter::new(&self.store, collection, self.config.batch_size);

        progress.start(pending.len());
        let mut results = std::pin::pin!(gate.embed_all(pending));

        while let Some((change, result)) = results.next().await {
            progress.advance();
            match result {
                Ok(point) => {
                    match change {
                        ChangeKind::New => report.new += 1,
                        ChangeKind::Changed => report.changed += 1,
                        ChangeKind::Unchanged => {}
                    }
                    if let Err(e) = writer.push(point).await {
                        progress.finish();
                        return Err(abort_write(e, &report, writer.stats().written));
                    }
                }
                Err(e) if e.is_per_entity() => {
                    report.failed += 1;
                    warn!(error = %e, "Skipping entity");
                }
                Err(e) => {
                    progress.finish();
                    return Err(e);
                }
            }
        }
        progress.finish();

        let written_before = writer.stats().written;
        let stats = match writer.finish().await {
            Ok(stats) => stats,
            Err(e) => return Err(abort_write(e, &report, written_before)),
        };
        report.flushes = stats.flushes;
        report.points_written = stats.written;

        info!(
            collection,
            updated = report.updated(),
            new = report.new,
            changed = report.changed,
            unchanged = report.unchanged,
            skipped_empty = report.skipped_empty,
            failed = report.failed,
            flushes = report.flushes,
            "Data indexing complete"
        );

        Ok(report)
    }

    /// Create the collection if needed. Returns true when it was created.
    async fn prepare_collection(&self, collection: &str) -> KgvecResult<bool> {
        let status = self
            .store
            .ensure_collection(collection, self.dimension)
            .await
            .map_err(|e| KgvecError::unavailable("vector store", e))?;

        match status {
            CollectionStatus::Created => {
                info!(collection, dimension = self.dimension, "Created collection");
                Ok(true)
            }
            CollectionStatus::Existing { dimension: Some(existing) }
                if existing != self.dimension as u64 =>
            {
                Err(KgvecError::config(format!(
                    "collection '{}' stores {}-dimensional vectors but model '{}' produces {}",
                    collection, existing, self.config.embedding_model, self.dimension
                )))
            }
            CollectionStatus::Existing { .. } => {
                info!(collection, "Using existing collection");
                Ok(false)
            }
        }
    }

    /// Keep entities that have text to embed.
    fn normalize(&self, entities: Vec<EntityRecord>, report: &mut SyncReport) -> Vec<(EntityRecord, String)> {
        let mut candidates = Vec::with_capacity(entities.len());
        for record in entities {
            match canonical_text(&record) {
                Some(text) => candidates.push((record, text)),
                None => report.skipped_empty += 1,
            }
        }
        candidates
    }
}

/// Fold records that share a URI into one, keeping first-seen order.
///
/// Sources may hand back the same IRI more than once (punning across OWL
/// types); each URI must produce exactly one canonical text per run.
fn merge_by_uri(entities: Vec<EntityRecord>, report: &mut SyncReport) -> Vec<EntityRecord> {
    let mut merged: IndexMap<String, EntityRecord> = IndexMap::with_capacity(entities.len());

    for record in entities {
        match merged.entry(record.uri().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                match existing.merge(record) {
                    Ok(()) => {
                        report.duplicates += 1;
                        debug!(
                            uri = existing.uri(),
                            values = existing.value_count(),
                            "Merged duplicate entity record"
                        );
                    }
                    Err(e) => warn!(error = %e, "Dropping entity record that could not be merged"),
                }
            }
        }
    }

    merged.into_values().collect()
}

fn abort_write(err: KgvecError, report: &SyncReport, written: usize) -> KgvecError {
    error!(
        error = %err,
        written,
        new = report.new,
        changed = report.changed,
        failed = report.failed,
        "Vector store write failed; aborting run"
    );
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_by_uri_keeps_first_seen_order() {
        let records = vec![
            EntityRecord::new("http://acme.com/ontology#A")
                .unwrap()
                .with_entity_type("Class")
                .with_value("label", "a"),
            EntityRecord::new("http://acme.com/ontology#B")
                .unwrap()
                .with_value("label", "b"),
            EntityRecord::new("http://acme.com/ontology#A")
                .unwrap()
                .with_entity_type("NamedIndividual")
                .with_value("comment", "individual a"),
        ];
        let mut report = SyncReport::default();

        let merged = merge_by_uri(records, &mut report);

        assert_eq!(report.duplicates, 1);
        let uris: Vec<&str> = merged.iter().map(|r| r.uri()).collect();
        assert_eq!(uris, vec!["http://acme.com/ontology#A", "http://acme.com/ontology#B"]);
        assert_eq!(merged[0].sorted_entity_types(), vec!["Class", "NamedIndividual"]);
        assert_eq!(
            canonical_text(&merged[0]).as_deref(),
            Some("[COMMENT]: individual a\n[LABEL]: a")
        );
    }
}
