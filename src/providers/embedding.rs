use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::errors::RagError;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// embed a batch of texts, one vector per input, in input order
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError>;
}

/// OpenAI embeddings client. The same instance serves both index builds and
/// query-time embedding so the vector spaces always match.
#[derive(Clone)]
pub struct OpenAiEmbeddingClient {
    client: Client,
    api_key: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbeddingClient {
    pub fn new(
        api_key: String,
        model: String,
        dimension: usize,
        timeout: Duration,
    ) -> Result<Self, RagError> {
        if api_key.trim().is_empty() {
            return Err(RagError::Embedding("OPENAI_API_KEY is not set".to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            dimension,
        })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Deserialize)]
struct EmbeddingEntry {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl EmbeddingClient for OpenAiEmbeddingClient {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", OPENAI_API_BASE);
        let body = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };

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
            return Err(RagError::Embedding(format!(
                "OpenAI embeddings error ({}): {}",
                status, text
            )));
        }

        let mut payload: EmbeddingResponse = res.json().await?;
        payload.data.sort_by_key(|entry| entry.index);

        if payload.data.len() != inputs.len() {
            return Err(RagError::Embedding(format!(
                "OpenAI returned {} embeddings for {} inputs",
                payload.data.len(),
                inputs.len()
            )));
        }
        if let Some(first) = payload.data.first() {
            if first.embedding.len() != self.dimension {
                return Err(RagError::Embedding(format!(
                    "embedding dimension {} does not match expected {}",
                    first.embedding.len(),
                    self.dimension
                )));
            }
        }

        Ok(payload.data.into_iter().map(|e| e.embedding).collect())
    }
}
