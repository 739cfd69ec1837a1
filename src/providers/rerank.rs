use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::RagError;

const COHERE_API_BASE: &str = "https://api.cohere.com/v1";

#[async_trait]
pub trait RerankClient: Send + Sync {
    /// rank documents against the query, returning original-list indices,
    /// most relevant first, at most `top_n` entries
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<usize>, RagError>;
}

#[derive(Clone)]
pub struct CohereRerankClient {
    client: Client,
    api_key: String,
    model: String,
}

impl CohereRerankClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, RagError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RerankEntry>,
}

#[derive(Deserialize)]
struct RerankEntry {
    index: usize,
}

#[async_trait]
impl RerankClient for CohereRerankClient {
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<usize>, RagError> {
        let url = format!("{}/rerank", COHERE_API_BASE);
        let body = json!({
            "model": self.model,
            "query": query,
            "documents": documents,
            "top_n": top_n,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(RagError::Rerank(format!(
                "Cohere rerank error ({}): {}",
                status, text
            )));
        }

        let payload: RerankResponse = res.json().await?;
        Ok(payload.results.into_iter().map(|r| r.index).collect())
    }
}
