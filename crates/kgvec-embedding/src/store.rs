//! Vector store seam and the point layout shared with it.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Payload stored next to every vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointPayload {
    pub uri: String,
    /// Canonical text the vector was computed from.
    pub text: String,
    pub entity_type: Vec<String>,
    /// RFC 3339 timestamp of the write. Informational only.
    pub last_updated: String,
}

/// One point ready to be upserted.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: PointPayload,
}

/// `uri -> text` pairs already present in a collection.
#[derive(Debug, Clone, Default)]
pub struct ExistingTexts {
    pub texts: HashMap<String, String>,
    /// The scan stopped at its limit while more points remained.
    pub truncated: bool,
    /// Points whose payload had no string `uri`.
    pub skipped: usize,
}

/// Outcome of [`VectorStore::ensure_collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    Created,
    /// Already present. `dimension` is `None` when the store could not report it.
    Existing { dimension: Option<u64> },
}

/// Key-value vector store used by the sync engine.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection (cosine distance) if it does not exist.
    async fn ensure_collection(&self, collection: &str, dimension: usize) -> Result<CollectionStatus>;

    /// Read up to `limit` payloads in a single scan, without vectors.
    async fn bulk_read_existing(&self, collection: &str, limit: u32) -> Result<ExistingTexts>;

    /// Idempotent upsert keyed by point id. Returns once the write is acknowledged.
    async fn upsert(&self, collection: &str, points: Vec<StoredPoint>) -> Result<()>;

    async fn count(&self, collection: &str) -> Result<u64>;
}
