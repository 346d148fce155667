//! # kgvec Embedding
//!
//! Vector embeddings via OpenAI or Ollama and vector storage via Qdrant.
//!
//! Both collaborators sit behind traits ([`Embedder`], [`VectorStore`]) so the
//! sync engine can be driven by in-memory fakes.

pub mod embedder;
pub mod ollama;
pub mod openai;
pub mod qdrant;
pub mod store;

pub use embedder::Embedder;
pub use ollama::{OllamaClient, OllamaConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use qdrant::{QdrantConfig, QdrantStore};
pub use store::{CollectionStatus, ExistingTexts, PointPayload, StoredPoint, VectorStore};
