use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::info;

use crate::core::config::AppConfig;
use crate::core::errors::RagError;

use super::store::{IndexStats, ScoredVerse, UpsertVector, VerseMetadata, VerseStore};

const CONTROL_PLANE: &str = "https://api.pinecone.io";

/// Pinecone-backed verse store. Control-plane calls manage the index itself;
/// data-plane calls go to the per-index host, resolved once and cached.
pub struct PineconeStore {
    client: Client,
    api_key: String,
    index_name: String,
    cloud: String,
    region: String,
    dimension: usize,
    host: OnceCell<String>,
}

impl PineconeStore {
    pub fn from_config(config: &AppConfig) -> Result<Self, RagError> {
        if config.pinecone_api_key.trim().is_empty() {
            return Err(RagError::Store("PINECONE_API_KEY is not set".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: config.pinecone_api_key.clone(),
            index_name: config.index_name.clone(),
            cloud: config.pinecone_cloud.clone(),
            region: config.pinecone_region.clone(),
            dimension: config.embed_dimension,
            host: OnceCell::new(),
        })
    }

    async fn describe_index(&self) -> Result<Option<IndexDescription>, RagError> {
        let url = format!("{}/indexes/{}", CONTROL_PLANE, self.index_name);
        let res = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .await?;

        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let res = expect_success(res, "describe index").await?;
        Ok(Some(res.json().await?))
    }

    async fn data_url(&self, path: &str) -> Result<String, RagError> {
        let host = self
            .host
            .get_or_try_init(|| async {
                match self.describe_index().await? {
                    Some(desc) => Ok(format!("https://{}", desc.host)),
                    None => Err(RagError::Store(format!(
                        "index '{}' does not exist; run the indexer first",
                        self.index_name
                    ))),
                }
            })
            .await?;
        Ok(format!("{}{}", host, path))
    }
}

async fn expect_success(res: Response, operation: &str) -> Result<Response, RagError> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    Err(RagError::Store(format!(
        "{} failed ({}): {}",
        operation, status, text
    )))
}

#[derive(Deserialize)]
struct IndexDescription {
    host: String,
    #[serde(default)]
    status: IndexStatus,
}

#[derive(Default, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<VerseMetadata>,
}

/// Fetch responses have carried the records under either key across store
/// API revisions; both are accepted here so callers never see the difference.
#[derive(Deserialize)]
struct FetchResponse {
    #[serde(default)]
    vectors: HashMap<String, FetchedRecord>,
    #[serde(default)]
    records: HashMap<String, FetchedRecord>,
}

#[derive(Deserialize)]
struct FetchedRecord {
    #[serde(default)]
    metadata: Option<VerseMetadata>,
}

impl FetchResponse {
    fn take_metadata(mut self, id: &str) -> Option<VerseMetadata> {
        self.vectors
            .remove(id)
            .or_else(|| self.records.remove(id))
            .and_then(|r| r.metadata)
    }
}

fn fetch_path(id: &str) -> String {
    format!("/vectors/fetch?ids={}", urlencoding::encode(id))
}

#[async_trait]
impl VerseStore for PineconeStore {
    async fn ensure_index(&self) -> Result<(), RagError> {
        if self.describe_index().await?.is_some() {
            return Ok(());
        }

        info!("creating index '{}'", self.index_name);
        let body = json!({
            "name": self.index_name,
            "dimension": self.dimension,
            "metric": "cosine",
            "spec": {"serverless": {"cloud": self.cloud, "region": self.region}},
        });
        let res = self
            .client
            .post(format!("{}/indexes", CONTROL_PLANE))
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        // CONFLICT means another run created it in the meantime
        if !res.status().is_success() && res.status() != StatusCode::CONFLICT {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(RagError::Store(format!(
                "index create failed ({}): {}",
                status, text
            )));
        }

        for _ in 0..30 {
            if let Some(desc) = self.describe_index().await? {
                if desc.status.ready {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
        Err(RagError::Store(format!(
            "index '{}' was created but never became ready",
            self.index_name
        )))
    }

    async fn upsert(&self, vectors: Vec<UpsertVector>) -> Result<(), RagError> {
        let url = self.data_url("/vectors/upsert").await?;
        let res = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&json!({ "vectors": vectors }))
            .send()
            .await?;
        expect_success(res, "upsert").await?;
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredVerse>, RagError> {
        let url = self.data_url("/query").await?;
        let body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });
        let res = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let res = expect_success(res, "query").await?;
        let payload: QueryResponse = res.json().await?;

        Ok(payload
            .matches
            .into_iter()
            .map(|m| ScoredVerse {
                id: m.id,
                score: m.score,
                metadata: m.metadata,
            })
            .collect())
    }

    async fn fetch(&self, id: &str) -> Result<Option<VerseMetadata>, RagError> {
        let url = self.data_url(&fetch_path(id)).await?;
        let res = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .await?;
        let res = expect_success(res, "fetch").await?;
        let payload: FetchResponse = res.json().await?;
        Ok(payload.take_metadata(id))
    }

    async fn describe_stats(&self) -> Result<IndexStats, RagError> {
        let url = self.data_url("/describe_index_stats").await?;
        let res = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&json!({}))
            .send()
            .await?;
        let res = expect_success(res, "describe stats").await?;
        Ok(res.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_path_encodes_the_verse_key() {
        assert_eq!(fetch_path("2:47"), "/vectors/fetch?ids=2%3A47");
    }

    #[test]
    fn fetch_response_with_vectors_container() {
        let payload: FetchResponse = serde_json::from_str(
            r#"{"vectors": {"2:47": {"metadata": {"eng_meaning": "You have a right."}}}}"#,
        )
        .unwrap();

        let md = payload.take_metadata("2:47").unwrap();
        assert_eq!(md.eng_meaning, "You have a right.");
        assert_eq!(md.chapter, "");
    }

    #[test]
    fn fetch_response_with_records_container() {
        let payload: FetchResponse = serde_json::from_str(
            r#"{"records": {"2:47": {"metadata": {"chapter": "2", "verse": "47"}}}}"#,
        )
        .unwrap();

        let md = payload.take_metadata("2:47").unwrap();
        assert_eq!(md.chapter, "2");
        assert_eq!(md.verse, "47");
    }

    #[test]
    fn fetch_response_without_the_key_is_a_miss() {
        let payload: FetchResponse =
            serde_json::from_str(r#"{"vectors": {"1:1": {"metadata": {"chapter": "1"}}}}"#)
                .unwrap();
        assert!(payload.take_metadata("2:47").is_none());

        let empty: FetchResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.take_metadata("2:47").is_none());
    }

    #[test]
    fn stats_parse_from_camel_case() {
        let stats: IndexStats =
            serde_json::from_str(r#"{"dimension": 3072, "totalVectorCount": 700}"#).unwrap();
        assert_eq!(stats.dimension, Some(3072));
        assert_eq!(stats.total_vector_count, Some(700));
    }
}
