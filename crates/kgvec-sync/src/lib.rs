//! # kgvec Sync
//!
//! Incremental synchronization of a knowledge graph into a vector index.
//!
//! Every run reads the stored `uri -> text` pairs once, re-embeds only the
//! entities whose canonical text is new or different, and upserts them in
//! batches under ids derived from their URI. Running twice over an unchanged
//! graph writes nothing the second time.

pub mod differ;
pub mod engine;
pub mod gate;
pub mod report;
pub mod writer;

pub use differ::{ChangeKind, PriorSnapshot};
pub use engine::{SyncEngine, SyncProgress};
pub use report::{SnapshotMode, SyncReport};
pub use writer::{BatchWriter, WriteStats};
