use std::sync::Arc;

use tracing::debug;

use crate::core::config::AppConfig;
use crate::core::errors::RagError;
use crate::index::VerseStore;
use crate::providers::{EmbeddingClient, GenerationClient, RerankClient};

use super::composer::{AnswerComposer, AnswerResult, ComposerPolicy};
use super::reranker::Reranker;
use super::resolver::{ExactReferenceResolver, EXACT_MATCH_CONFIDENCE};
use super::retriever::DenseRetriever;

/// The full question-answering pipeline, wired once at startup and shared
/// across requests. Stage state is query-local; the handles are read-only.
pub struct QaPipeline {
    resolver: ExactReferenceResolver,
    retriever: DenseRetriever,
    reranker: Reranker,
    composer: AnswerComposer,
    default_top_k: usize,
    default_top_n: usize,
}

impl QaPipeline {
    pub fn new(
        store: Arc<dyn VerseStore>,
        embedder: Arc<dyn EmbeddingClient>,
        rerank_client: Option<Arc<dyn RerankClient>>,
        generator: Arc<dyn GenerationClient>,
        config: &AppConfig,
    ) -> Self {
        let policy = ComposerPolicy {
            min_disclose_score: config.min_disclose_score,
            max_sentences: config.max_answer_sentences,
            max_verses: config.disclose_max_verses,
        };
        Self {
            resolver: ExactReferenceResolver::new(store.clone()),
            retriever: DenseRetriever::new(store, embedder),
            reranker: Reranker::new(rerank_client),
            composer: AnswerComposer::new(generator, policy),
            default_top_k: config.top_k,
            default_top_n: config.top_n,
        }
    }

    /// Answers one question. A `chapter:verse` query that hits the index is
    /// served directly; everything else goes through retrieve, rerank and
    /// compose.
    pub async fn answer_question(
        &self,
        query: &str,
        top_k: Option<usize>,
        top_n: Option<usize>,
    ) -> Result<AnswerResult, RagError> {
        let top_k = top_k.unwrap_or(self.default_top_k).max(1);
        let top_n = top_n.unwrap_or(self.default_top_n).max(1);

        if let Some(verse) = self.resolver.resolve(query).await? {
            debug!("exact reference hit for {}", verse.id);
            return Ok(AnswerResult {
                answer: format!("Verse {} from the Bhagavad Gita:", verse.id),
                verses: vec![verse],
                confidence: EXACT_MATCH_CONFIDENCE,
                notes: "Exact-verse lookup.".to_string(),
            });
        }

        let candidates = self.retriever.retrieve(query, top_k).await?;
        debug!("retrieved {} candidates", candidates.len());
        let (top, rerank_note) = self.reranker.rerank(query, candidates, top_n).await;

        let notes = format!("Retrieved via embeddings, {}", rerank_note);
        self.composer.compose(query, &top, &notes).await
    }
}
