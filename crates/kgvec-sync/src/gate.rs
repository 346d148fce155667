//! Embedding of new and changed entities.
//!
//! Requests run with bounded concurrency, but results come back in submission
//! order so batching stays deterministic.

use chrono::Utc;
use futures::stream::{self, Stream, StreamExt};
use tracing::debug;

use kgvec_core::{point_id, EntityRecord, KgvecError, KgvecResult};
use kgvec_embedding::{Embedder, PointPayload, StoredPoint};

use crate::differ::ChangeKind;

/// An entity that needs a (new) vector.
#[derive(Debug, Clone)]
pub struct PendingEntity {
    pub id: String,
    pub uri: String,
    pub text: String,
    pub entity_types: Vec<String>,
    pub change: ChangeKind,
}

impl PendingEntity {
    pub fn new(record: &EntityRecord, text: String, change: ChangeKind) -> Self {
        Self {
            id: point_id(record.uri()),
            uri: record.uri().to_string(),
            text,
            entity_types: record.sorted_entity_types(),
            change,
        }
    }
}

/// Result of embedding one pending entity.
pub type GateResult = (ChangeKind, KgvecResult<StoredPoint>);

/// Calls the embedder once per pending entity.
pub struct EmbeddingGate<'a, E: ?Sized> {
    embedder: &'a E,
    dimension: usize,
    concurrency: usize,
}

impl<'a, E> EmbeddingGate<'a, E>
where
    E: Embedder + ?Sized,
{
    pub fn new(embedder: &'a E, dimension: usize, concurrency: usize) -> Self {
        Self {
            embedder,
            dimension,
            concurrency: concurrency.max(1),
        }
    }

    /// Embed every pending entity, yielding results in input order.
    pub fn embed_all(&self, pending: Vec<PendingEntity>) -> impl Stream<Item = GateResult> + 'a {
        let embedder = self.embedder;
        let dimension = self.dimension;
        stream::iter(pending)
            .map(move |entity| embed_entity(embedder, dimension, entity))
            .buffered(self.concurrency)
    }
}

/// Any provider failure, including a vector of the wrong size, becomes a
/// per-entity `Embedding` error.
async fn embed_entity<E>(embedder: &E, dimension: usize, pending: PendingEntity) -> GateResult
where
    E: Embedder + ?Sized,
{
    let change = pending.change;
    let embedded = embedder.embed(&pending.text).await;

    let result = match embedded {
        Ok(vector) if vector.len() == dimension => {
            debug!(uri = %pending.uri, change = change.as_str(), "Embedded entity");
            Ok(StoredPoint {
                id: pending.id,
                vector,
                payload: PointPayload {
                    uri: pending.uri,
                    text: pending.text,
                    entity_type: pending.entity_types,
                    last_updated: Utc::now().to_rfc3339(),
                },
            })
        }
        Ok(vector) => Err(KgvecError::Embedding {
            uri: pending.uri,
            message: format!("expected {} dimensions, got {}", dimension, vector.len()),
        }),
        Err(e) => Err(KgvecError::Embedding {
            uri: pending.uri,
            message: format!("{:#}", e),
        }),
    };

    (change, result)
}
