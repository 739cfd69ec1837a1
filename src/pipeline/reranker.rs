use std::sync::Arc;

use tracing::warn;

use crate::providers::RerankClient;

use super::retriever::RetrievedCandidate;

/// Second-pass relevance reordering. Every failure mode degrades to the
/// similarity-score ordering; this stage never fails the query.
pub struct Reranker {
    client: Option<Arc<dyn RerankClient>>,
}

impl Reranker {
    pub fn new(client: Option<Arc<dyn RerankClient>>) -> Self {
        Self { client }
    }

    /// Returns at most `top_n` candidates plus a note describing which
    /// ordering was used.
    pub async fn rerank(
        &self,
        query: &str,
        candidates: Vec<RetrievedCandidate>,
        top_n: usize,
    ) -> (Vec<RetrievedCandidate>, &'static str) {
        let Some(client) = self.client.as_ref() else {
            return (
                fallback_order(candidates, top_n),
                "rerank disabled, dense-score order.",
            );
        };
        if candidates.is_empty() {
            return (candidates, "rerank skipped, no candidates.");
        }

        let texts: Vec<String> = candidates.iter().map(|c| c.display_text.clone()).collect();
        match client.rerank(query, &texts, top_n).await {
            Ok(indices) => {
                let mut reordered = Vec::with_capacity(top_n.min(indices.len()));
                for idx in indices.into_iter().take(top_n) {
                    if let Some(candidate) = candidates.get(idx) {
                        reordered.push(candidate.clone());
                    }
                }
                (reordered, "reranked for relevance.")
            }
            Err(err) => {
                warn!("rerank failed, falling back to dense order: {}", err);
                (
                    fallback_order(candidates, top_n),
                    "rerank failed, dense-score order.",
                )
            }
        }
    }
}

/// Deterministic ordering used whenever reranking cannot run: similarity
/// descending, truncated to `top_n`.
pub(super) fn fallback_order(
    mut candidates: Vec<RetrievedCandidate>,
    top_n: usize,
) -> Vec<RetrievedCandidate> {
    candidates.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    candidates.truncate(top_n);
    candidates
}
