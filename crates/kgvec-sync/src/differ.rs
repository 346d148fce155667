//! Change detection against the stored snapshot.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use kgvec_embedding::{ExistingTexts, VectorStore};

use crate::report::SnapshotMode;

/// Classification of an entity relative to the stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    New,
    Changed,
    Unchanged,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }
}

/// `uri -> text` of the points stored before this run.
#[derive(Debug, Clone, Default)]
pub struct PriorSnapshot {
    texts: HashMap<String, String>,
    mode: SnapshotMode,
}

impl PriorSnapshot {
    pub fn from_existing(existing: ExistingTexts) -> Self {
        let mode = if existing.truncated {
            SnapshotMode::Truncated
        } else {
            SnapshotMode::Complete
        };
        Self {
            texts: existing.texts,
            mode,
        }
    }

    /// Empty snapshot used when the stored state could not be read.
    pub fn degraded() -> Self {
        Self {
            texts: HashMap::new(),
            mode: SnapshotMode::Degraded,
        }
    }

    pub fn mode(&self) -> SnapshotMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Compare canonical text with the stored text for the same URI.
    pub fn classify(&self, uri: &str, text: &str) -> ChangeKind {
        match self.texts.get(uri) {
            None => ChangeKind::New,
            Some(stored) if stored == text => ChangeKind::Unchanged,
            Some(_) => ChangeKind::Changed,
        }
    }
}

/// Read the stored snapshot in one bounded scan.
///
/// Never fails: an unreadable store yields a degraded, empty snapshot so the
/// run re-embeds everything instead of aborting.
pub async fn load_snapshot<V>(store: &V, collection: &str, limit: u32) -> PriorSnapshot
where
    V: VectorStore + ?Sized,
{
    match store.bulk_read_existing(collection, limit).await {
        Ok(existing) => {
            if existing.skipped > 0 {
                debug!(collection, skipped = existing.skipped, "Ignored stored points without uri");
            }
            if existing.truncated {
                warn!(
                    collection,
                    limit,
                    read = existing.texts.len(),
                    "Stored points exceed the scan limit; entities beyond it will be re-embedded"
                );
            }
            let snapshot = PriorSnapshot::from_existing(existing);
            if snapshot.is_empty() {
                info!(collection, "No existing points; every entity is new");
            } else {
                info!(collection, points = snapshot.len(), "Found existing points");
            }
            snapshot
        }
        Err(e) => {
            warn!(
                collection,
                error = %format!("{:#}", e),
                "Could not retrieve existing points; proceeding without change detection"
            );
            PriorSnapshot::degraded()
        }
    }
}
