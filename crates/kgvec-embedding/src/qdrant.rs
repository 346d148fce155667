//! Qdrant vector store client.
//!
//! Manages the collection, reads stored payloads for change detection and
//! upserts points via the qdrant-client gRPC library.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use qdrant_client::qdrant::{
    value::Kind, vectors_config::Config, CreateCollectionBuilder, Distance, ListValue,
    PointStruct, ScrollPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use serde::Deserialize;
use tracing::{debug, info};

use crate::store::{CollectionStatus, ExistingTexts, StoredPoint, VectorStore};

/// Default Qdrant gRPC URL.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Connection settings for Qdrant.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_QDRANT_URL.to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl std::fmt::Debug for QdrantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Qdrant vector store client for kgvec.
#[derive(Clone)]
pub struct QdrantStore {
    client: Qdrant,
}

impl QdrantStore {
    /// Create a new QdrantStore client.
    pub fn new(config: &QdrantConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.url)
            .api_key(config.api_key.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create Qdrant client")?;

        Ok(Self { client })
    }

    /// Vector size of an existing collection, if it has a single unnamed vector.
    async fn collection_dimension(&self, collection: &str) -> Result<Option<u64>> {
        let info = self.client
            .collection_info(collection)
            .await
            .context("Failed to get collection info")?;

        Ok(info
            .result
            .and_then(|r| r.config)
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|v| v.config)
            .and_then(|config| match config {
                Config::Params(params) => Some(params.size),
                Config::ParamsMap(_) => None,
            }))
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn ensure_collection(&self, collection: &str, dimension: usize) -> Result<CollectionStatus> {
        let exists = self.client
            .collection_exists(collection)
            .await
            .context("Failed to check collection")?;

        if exists {
            let existing = self.collection_dimension(collection).await?;
            debug!(collection, dimension = ?existing, "Collection already exists");
            return Ok(CollectionStatus::Existing { dimension: existing });
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection)
                    .vectors_config(VectorParamsBuilder::new(
                        dimension as u64,
                        Distance::Cosine,
                    )),
            )
            .await
            .context("Failed to create collection")?;

        info!(collection, dimension, "Created Qdrant collection");
        Ok(CollectionStatus::Created)
    }

    async fn bulk_read_existing(&self, collection: &str, limit: u32) -> Result<ExistingTexts> {
        let response = self.client
            .scroll(
                ScrollPointsBuilder::new(collection)
                    .limit(limit)
                    .with_payload(true)
                    .with_vectors(false),
            )
            .await
            .context("Failed to scroll points")?;

        let mut existing = ExistingTexts {
            truncated: response.next_page_offset.is_some(),
            ..Default::default()
        };

        for point in &response.result {
            match read_uri_text(&point.payload) {
                Some((uri, text)) => {
                    existing.texts.insert(uri, text);
                }
                None => existing.skipped += 1,
            }
        }

        debug!(
            collection,
            points = existing.texts.len(),
            skipped = existing.skipped,
            truncated = existing.truncated,
            "Read existing payloads"
        );
        Ok(existing)
    }

    async fn upsert(&self, collection: &str, points: Vec<StoredPoint>) -> Result<()> {
        let count = points.len();
        let mut structs = Vec::with_capacity(count);
        for point in points {
            let payload = serde_json::to_value(&point.payload)
                .context("Failed to serialize point payload")?;
            structs.push(PointStruct::new(point.id, point.vector, json_to_payload(&payload)));
        }

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, structs).wait(true))
            .await
            .context("Failed to upsert points")?;

        debug!(collection, count, "Upserted batch");
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        let info = self.client
            .collection_info(collection)
            .await
            .context("Failed to get collection info")?;

        Ok(info.result
            .map(|r| r.points_count.unwrap_or(0))
            .unwrap_or(0))
    }
}

/// Pull `uri` and `text` out of a stored payload. A missing `text` reads as empty.
fn read_uri_text(payload: &HashMap<String, Value>) -> Option<(String, String)> {
    let uri = payload.get("uri").and_then(string_value)?;
    let text = payload.get("text").and_then(string_value).unwrap_or("");
    Some((uri.to_string(), text.to_string()))
}

fn string_value(value: &Value) -> Option<&str> {
    match &value.kind {
        Some(Kind::StringValue(s)) => Some(s.as_str()),
        _ => None,
    }
}

/// Convert a serde_json::Value to Qdrant payload (HashMap<String, Value>).
fn json_to_payload(json: &serde_json::Value) -> HashMap<String, Value> {
    let mut payload = HashMap::new();

    if let serde_json::Value::Object(map) = json {
        for (key, val) in map {
            if let Some(qdrant_val) = json_value_to_qdrant(val) {
                payload.insert(key.clone(), qdrant_val);
            }
        }
    }

    payload
}

/// Convert a serde_json value to a Qdrant Value. Nulls and objects are dropped.
fn json_value_to_qdrant(val: &serde_json::Value) -> Option<Value> {
    let kind = match val {
        serde_json::Value::String(s) => Kind::StringValue(s.clone()),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Kind::IntegerValue(i)
            } else {
                Kind::DoubleValue(n.as_f64()?)
            }
        }
        serde_json::Value::Bool(b) => Kind::BoolValue(*b),
        serde_json::Value::Array(items) => Kind::ListValue(ListValue {
            values: items.iter().filter_map(json_value_to_qdrant).collect(),
        }),
        _ => return None,
    };

    Some(Value { kind: Some(kind) })
}
