//! SPARQL endpoint connection client.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::ingest::SparqlResults;
use crate::query::DEFAULT_GRAPHS;

/// Default GraphDB repository endpoint.
pub const DEFAULT_GRAPH_ENDPOINT: &str = "http://localhost:7200/repositories/kg-llm";

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Configuration for connecting to the SPARQL endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub endpoint: String,
    /// Named graphs the snapshot query reads from.
    pub graphs: Vec<String>,
    /// Ask the store to include inferred triples. Off by default so the
    /// reasoner does not duplicate content.
    pub infer: bool,
    pub timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GRAPH_ENDPOINT.to_string(),
            graphs: DEFAULT_GRAPHS.iter().map(|g| g.to_string()).collect(),
            infer: false,
            timeout_secs: 120,
        }
    }
}

/// Client for SELECT queries against a SPARQL 1.1 endpoint.
#[derive(Clone)]
pub struct SparqlClient {
    endpoint: String,
    infer: bool,
    client: reqwest::Client,
}

impl SparqlClient {
    /// Create a new SparqlClient from config.
    pub fn new(config: &GraphConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build SPARQL HTTP client")?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            infer: config.infer,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute a SELECT query and return the JSON result set.
    pub async fn select(&self, query: &str) -> Result<SparqlResults> {
        let infer = if self.infer { "true" } else { "false" };

        debug!(endpoint = %self.endpoint, infer, "Running SPARQL query");

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query), ("infer", infer)])
            .send()
            .await
            .with_context(|| format!("Failed to connect to SPARQL endpoint {}", self.endpoint))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("SPARQL endpoint error ({}): {}", status, body);
        }

        let results: SparqlResults = response
            .json()
            .await
            .context("Failed to parse SPARQL JSON results")?;

        info!(
            bindings = results.results.bindings.len(),
            "Retrieved property-value pairs from graph"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config(endpoint: String) -> GraphConfig {
        GraphConfig {
            endpoint,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_select_posts_form_without_inference() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/repositories/kg-llm")
            .match_header("accept", SPARQL_RESULTS_JSON)
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("infer".into(), "false".into()),
                Matcher::UrlEncoded("query".into(), "SELECT * WHERE { ?s ?p ?o }".into()),
            ]))
            .with_status(200)
            .with_header("content-type", SPARQL_RESULTS_JSON)
            .with_body(r#"{"head":{"vars":["s"]},"results":{"bindings":[{"s":{"type":"uri","value":"http://a"}}]}}"#)
            .create_async()
            .await;

        let client = SparqlClient::new(&config(format!("{}/repositories/kg-llm", server.url()))).unwrap();
        let results = client.select("SELECT * WHERE { ?s ?p ?o }").await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.results.bindings.len(), 1);
        assert_eq!(results.results.bindings[0]["s"].value, "http://a");
    }

    #[tokio::test]
    async fn test_select_surfaces_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/repositories/missing")
            .with_status(404)
            .with_body("Unknown repository: missing")
            .create_async()
            .await;

        let client = SparqlClient::new(&config(format!("{}/repositories/missing", server.url()))).unwrap();
        let err = client.select("SELECT * WHERE { ?s ?p ?o }").await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
