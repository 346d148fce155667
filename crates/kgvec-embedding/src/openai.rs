//! OpenAI HTTP client for embedding generation.
//!
//! Calls `POST /v1/embeddings` with a single input per request.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use kgvec_core::{KgvecError, KgvecResult};

use crate::embedder::Embedder;

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Connection settings for OpenAI.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub base_url: String,
    /// Usually left unset in the file and taken from `OPENAI_API_KEY`.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// OpenAI embedding client.
#[derive(Clone)]
pub struct OpenAiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiClient {
    /// Create a client for a model. A missing API key is a configuration error.
    pub fn new(config: &OpenAiConfig, model: &str) -> KgvecResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| KgvecError::config("OPENAI_API_KEY environment variable not set"))?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KgvecError::config(format!("Failed to build OpenAI HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            input: text,
            model: &self.model,
        };

        let response = self.client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to OpenAI")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, body);
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        let embedding = result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|e| !e.is_empty())
            .context("OpenAI response contained no embedding")?;

        debug!(model = %self.model, dim = embedding.len(), "Generated embedding");

        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config(url: String) -> OpenAiConfig {
        OpenAiConfig {
            base_url: url,
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let config = OpenAiConfig::default();
        let err = OpenAiClient::new(&config, "text-embedding-3-small").err().unwrap();
        assert!(matches!(err, KgvecError::Config(_)));

        let blank = OpenAiConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(OpenAiClient::new(&blank, "text-embedding-3-small").is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", config("http://localhost".to_string()));
        assert!(!rendered.contains("sk-test"));
    }

    #[tokio::test]
    async fn test_embed_posts_with_bearer_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(serde_json::json!({
                "input": "[LABEL]: customer",
                "model": "text-embedding-3-small",
            })))
            .with_status(200)
            .with_body(r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.5,-0.5]}],"model":"text-embedding-3-small"}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(&config(server.url()), "text-embedding-3-small").unwrap();
        let vector = client.embed("[LABEL]: customer").await.unwrap();

        mock.assert_async().await;
        assert_eq!(vector, vec![0.5, -0.5]);
    }

    #[tokio::test]
    async fn test_rate_limit_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(&config(server.url()), "text-embedding-3-small").unwrap();
        let err = client.embed("text").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_empty_data_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(&config(server.url()), "text-embedding-3-small").unwrap();
        assert!(client.embed("text").await.is_err());
    }
}
