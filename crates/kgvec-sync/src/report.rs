//! End-of-run summary.

use serde::Serialize;

/// How much of the stored state the change detection could see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotMode {
    /// Every stored point was read.
    #[default]
    Complete,
    /// The scan hit its limit; points beyond it were treated as new.
    Truncated,
    /// The scan failed; every entity was treated as new.
    Degraded,
}

impl SnapshotMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Truncated => "truncated",
            Self::Degraded => "degraded",
        }
    }
}

/// Counts for one sync run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    /// Distinct entities considered after the `max_items` limit.
    pub fetched: usize,
    /// Graph rows dropped at ingestion.
    pub malformed: usize,
    /// Extra records for a URI already seen, folded into the first one.
    pub duplicates: usize,
    /// Entities without any text to embed.
    pub skipped_empty: usize,
    pub new: usize,
    pub changed: usize,
    pub unchanged: usize,
    /// Entities dropped because embedding failed.
    pub failed: usize,
    pub flushes: usize,
    pub points_written: usize,
    /// Points found in the collection before the run.
    pub prior_points: usize,
    pub snapshot: SnapshotMode,
    pub collection_created: bool,
}

impl SyncReport {
    /// Entities that received a new vector.
    pub fn updated(&self) -> usize {
        self.new + self.changed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
