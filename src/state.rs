use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::core::config::AppConfig;
use crate::index::{PineconeStore, VerseStore};
use crate::pipeline::QaPipeline;
use crate::providers::{
    CohereRerankClient, EmbeddingClient, GenerationClient, OpenAiChatClient,
    OpenAiEmbeddingClient, RerankClient,
};

/// Process-wide state shared across requests: the configuration and the
/// wired answer pipeline. Constructed once at startup.
pub struct AppState {
    pub config: AppConfig,
    pub pipeline: QaPipeline,
}

impl AppState {
    pub fn initialize() -> anyhow::Result<Arc<Self>> {
        let config = AppConfig::load();
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> anyhow::Result<Arc<Self>> {
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let store: Arc<dyn VerseStore> = Arc::new(PineconeStore::from_config(&config)?);
        let embedder: Arc<dyn EmbeddingClient> = Arc::new(OpenAiEmbeddingClient::new(
            config.openai_api_key.clone(),
            config.embed_model.clone(),
            config.embed_dimension,
            timeout,
        )?);
        let generator: Arc<dyn GenerationClient> = Arc::new(OpenAiChatClient::new(
            config.openai_api_key.clone(),
            config.chat_model.clone(),
            timeout,
        )?);

        let rerank: Option<Arc<dyn RerankClient>> = match config.cohere_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Some(Arc::new(CohereRerankClient::new(
                key.to_string(),
                config.rerank_model.clone(),
                timeout,
            )?)),
            _ => None,
        };
        if rerank.is_none() {
            info!("no rerank credential configured, dense-score ordering will be used");
        }

        let pipeline = QaPipeline::new(store, embedder, rerank, generator, &config);
        Ok(Arc::new(Self { config, pipeline }))
    }
}
