//! Batched upserts into the vector store.

use tracing::debug;

use kgvec_core::{KgvecError, KgvecResult};
use kgvec_embedding::{StoredPoint, VectorStore};

/// Totals of a finished writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub flushes: usize,
    pub written: usize,
}

/// Buffers points and upserts them once `batch_size` is reached.
///
/// Each flush waits for the store to acknowledge the write. Call
/// [`BatchWriter::finish`] to flush the last partial batch.
pub struct BatchWriter<'a, V: ?Sized> {
    store: &'a V,
    collection: &'a str,
    batch_size: usize,
    buffer: Vec<StoredPoint>,
    stats: WriteStats,
}

impl<'a, V> BatchWriter<'a, V>
where
    V: VectorStore + ?Sized,
{
    pub fn new(store: &'a V, collection: &'a str, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            store,
            collection,
            batch_size,
            buffer: Vec::with_capacity(batch_size),
            stats: WriteStats::default(),
        }
    }

    /// Add a point, flushing first if the batch is full.
    pub async fn push(&mut self, point: StoredPoint) -> KgvecResult<()> {
        self.buffer.push(point);
        if self.buffer.len() >= self.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Upsert whatever is buffered. No-op when empty.
    pub async fn flush(&mut self) -> KgvecResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let batch = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.batch_size));
        let count = batch.len();

        self.store
            .upsert(self.collection, batch)
            .await
            .map_err(|e| KgvecError::unavailable("vector store", e))?;

        self.stats.flushes += 1;
        self.stats.written += count;
        debug!(
            collection = self.collection,
            count,
            flushes = self.stats.flushes,
            "Flushed batch"
        );
        Ok(())
    }

    /// Flush the remainder and return the totals.
    pub async fn finish(mut self) -> KgvecResult<WriteStats> {
        self.flush().await?;
        Ok(self.stats)
    }

    pub fn stats(&self) -> WriteStats {
        self.stats
    }
}
