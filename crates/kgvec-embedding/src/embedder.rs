//! Embedding provider seam.

use anyhow::Result;
use async_trait::async_trait;

/// Turns one text into one vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name, for logs and status output.
    fn model(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
impl<T: Embedder + ?Sized> Embedder for Box<T> {
    fn model(&self) -> &str {
        (**self).model()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text).await
    }
}
