//! Offline index build: loads the corpus CSV, embeds every verse and
//! upserts the vectors into the store. Safe to rerun; unchanged data is
//! rewritten in place.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use arjuna_backend::core::config::AppConfig;
use arjuna_backend::corpus;
use arjuna_backend::index::{IndexBuilder, PineconeStore};
use arjuna_backend::logging;
use arjuna_backend::providers::OpenAiEmbeddingClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    logging::init(&config);

    let records = corpus::load_corpus(&config.csv_path)
        .with_context(|| format!("Failed to load corpus from {}", config.csv_path.display()))?;
    tracing::info!(
        "loaded {} verses from {}",
        records.len(),
        config.csv_path.display()
    );

    let store = Arc::new(PineconeStore::from_config(&config)?);
    let embedder = Arc::new(OpenAiEmbeddingClient::new(
        config.openai_api_key.clone(),
        config.embed_model.clone(),
        config.embed_dimension,
        Duration::from_secs(config.request_timeout_secs),
    )?);

    let builder = IndexBuilder::new(
        store,
        embedder,
        config.embed_batch_size,
        config.index_batches_per_sec,
    );
    builder.run(&records).await?;

    Ok(())
}
