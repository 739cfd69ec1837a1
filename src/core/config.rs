//! Application configuration.
//!
//! All tunables live in [`AppConfig`] with sensible defaults. Values are
//! layered: built-in defaults, then an optional YAML file
//! (`ARJUNA_CONFIG_PATH` or `./config.yml`), then environment variables.
//! Secrets (provider API keys) are only ever read from the environment.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Runtime configuration for the server, the indexer and the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Port the HTTP server binds on 127.0.0.1.
    pub port: u16,
    /// Origins allowed by the CORS layer.
    pub cors_allowed_origins: Vec<String>,
    /// Directory for rolling log files.
    pub log_dir: PathBuf,

    /// Pinecone API key. Environment only.
    #[serde(skip_serializing)]
    pub pinecone_api_key: String,
    /// Name of the vector index holding the verse embeddings.
    pub index_name: String,
    /// Serverless cloud for index creation.
    pub pinecone_cloud: String,
    /// Serverless region for index creation.
    pub pinecone_region: String,

    /// OpenAI API key. Environment only.
    #[serde(skip_serializing)]
    pub openai_api_key: String,
    /// Embedding model shared by indexing and query time.
    pub embed_model: String,
    /// Output dimensionality of the embedding model.
    pub embed_dimension: usize,
    /// Chat model used for answer composition.
    pub chat_model: String,

    /// Cohere API key; reranking is disabled when absent.
    #[serde(skip_serializing)]
    pub cohere_api_key: Option<String>,
    /// Rerank model name.
    pub rerank_model: String,

    /// Dense retrieval candidate count.
    pub top_k: usize,
    /// Candidate count surviving the rerank stage.
    pub top_n: usize,
    /// Minimum best-candidate score required to disclose verses.
    pub min_disclose_score: f32,
    /// Hard cap on generated answer length, in sentences.
    pub max_answer_sentences: usize,
    /// Maximum number of verses attached to an answer.
    pub disclose_max_verses: usize,

    /// Path to the corpus CSV consumed by the indexer.
    pub csv_path: PathBuf,
    /// Records embedded per provider round trip.
    pub embed_batch_size: usize,
    /// Token-bucket rate for index-build batches.
    pub index_batches_per_sec: u32,

    /// Timeout applied to every provider HTTP call.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            cors_allowed_origins: default_local_origins(),
            log_dir: PathBuf::from("logs"),
            pinecone_api_key: String::new(),
            index_name: "gita-rag".to_string(),
            pinecone_cloud: "aws".to_string(),
            pinecone_region: "us-east-1".to_string(),
            openai_api_key: String::new(),
            embed_model: "text-embedding-3-large".to_string(),
            embed_dimension: 3072,
            chat_model: "gpt-4o-mini".to_string(),
            cohere_api_key: None,
            rerank_model: "rerank-english-v3.0".to_string(),
            top_k: 24,
            top_n: 8,
            min_disclose_score: 0.30,
            max_answer_sentences: 4,
            disclose_max_verses: 3,
            csv_path: PathBuf::from("data/Bhagwad_Gita.csv"),
            embed_batch_size: 64,
            index_batches_per_sec: 2,
            request_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the YAML file (if any) and the environment.
    pub fn load() -> Self {
        let mut config = load_yaml_file(&config_path());
        config.apply_env_overrides(|name| env::var(name).ok());
        config
    }

    /// Applies environment overrides through a lookup function so tests can
    /// substitute a map instead of mutating the process environment.
    pub fn apply_env_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(port) = get("PORT").and_then(|v| v.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(key) = get("PINECONE_API_KEY") {
            self.pinecone_api_key = key;
        }
        if let Some(name) = get("PINECONE_INDEX") {
            self.index_name = name;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.openai_api_key = key;
        }
        if let Some(model) = get("OPENAI_CHAT_MODEL") {
            self.chat_model = model;
        }
        if let Some(key) = get("COHERE_API_KEY") {
            if !key.trim().is_empty() {
                self.cohere_api_key = Some(key);
            }
        }
        if let Some(path) = get("GITA_CSV") {
            self.csv_path = PathBuf::from(path);
        }
    }

    /// True when a rerank provider can be constructed.
    pub fn rerank_enabled(&self) -> bool {
        self.cohere_api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }
}

fn config_path() -> PathBuf {
    if let Ok(path) = env::var("ARJUNA_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    PathBuf::from("config.yml")
}

fn load_yaml_file(path: &Path) -> AppConfig {
    if !path.exists() {
        return AppConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<AppConfig>(&contents) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Ignoring malformed config file {}: {}", path.display(), err);
                AppConfig::default()
            }
        },
        Err(err) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), err);
            AppConfig::default()
        }
    }
}

fn default_local_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}
