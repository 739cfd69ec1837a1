use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::{info, warn};

use crate::core::errors::RagError;
use crate::corpus::VerseRecord;
use crate::providers::EmbeddingClient;

use super::store::{UpsertVector, VerseMetadata, VerseStore};

/// Offline batch job that embeds the corpus and upserts it into the store.
/// Rerunning on unchanged data rewrites identical vectors, so interrupted
/// runs are repaired by running again from the start.
pub struct IndexBuilder {
    store: Arc<dyn VerseStore>,
    embedder: Arc<dyn EmbeddingClient>,
    batch_size: usize,
    limiter: DefaultDirectRateLimiter,
}

impl IndexBuilder {
    pub fn new(
        store: Arc<dyn VerseStore>,
        embedder: Arc<dyn EmbeddingClient>,
        batch_size: usize,
        batches_per_sec: u32,
    ) -> Self {
        let rate = NonZeroU32::new(batches_per_sec).unwrap_or(NonZeroU32::MIN);
        Self {
            store,
            embedder,
            batch_size: batch_size.max(1),
            limiter: RateLimiter::direct(Quota::per_second(rate)),
        }
    }

    pub async fn run(&self, records: &[VerseRecord]) -> Result<(), RagError> {
        self.store.ensure_index().await?;

        let total = records.len();
        info!("indexing {} verses", total);

        let mut done = 0usize;
        for batch in records.chunks(self.batch_size) {
            self.limiter.until_ready().await;

            let inputs: Vec<String> = batch.iter().map(VerseRecord::embed_input_text).collect();
            let embeddings = self.embedder.embed(&inputs).await?;
            if embeddings.len() != batch.len() {
                return Err(RagError::Embedding(format!(
                    "provider returned {} vectors for {} inputs",
                    embeddings.len(),
                    batch.len()
                )));
            }

            let vectors: Vec<UpsertVector> = batch
                .iter()
                .zip(embeddings)
                .map(|(record, values)| UpsertVector {
                    id: record.key(),
                    values,
                    metadata: VerseMetadata::from_record(record),
                })
                .collect();
            self.store.upsert(vectors).await?;

            done += batch.len();
            info!("upserted {}/{}", done, total);
        }

        match self.store.describe_stats().await {
            Ok(stats) => info!(
                "index build complete, {} vectors stored",
                stats.total_vector_count.unwrap_or_default()
            ),
            Err(err) => warn!("indexed, but stats unavailable: {}", err),
        }
        Ok(())
    }
}
