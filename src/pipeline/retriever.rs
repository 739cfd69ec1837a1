use std::sync::Arc;

use crate::core::errors::RagError;
use crate::index::{ScoredVerse, VerseStore};
use crate::providers::EmbeddingClient;

/// One candidate verse from dense retrieval, query-scoped. `display_text`
/// prefers the English meaning, then transliteration, and may be empty.
#[derive(Debug, Clone)]
pub struct RetrievedCandidate {
    pub id: String,
    pub similarity_score: f32,
    pub chapter: String,
    pub verse: String,
    pub display_text: String,
    pub shloka_sanskrit: String,
    pub transliteration: String,
}

impl RetrievedCandidate {
    fn from_match(m: ScoredVerse) -> Self {
        let md = m.metadata.unwrap_or_default();
        let display_text = md.display_text();
        Self {
            id: m.id,
            similarity_score: m.score,
            chapter: md.chapter,
            verse: md.verse,
            display_text,
            shloka_sanskrit: md.shloka_sanskrit,
            transliteration: md.transliteration,
        }
    }
}

pub struct DenseRetriever {
    store: Arc<dyn VerseStore>,
    embedder: Arc<dyn EmbeddingClient>,
}

impl DenseRetriever {
    pub fn new(store: Arc<dyn VerseStore>, embedder: Arc<dyn EmbeddingClient>) -> Self {
        Self { store, embedder }
    }

    /// Embeds the question and returns the store's top matches, best first.
    /// The question is embedded as typed; the indexing-side text synthesis
    /// applies only to stored verses.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedCandidate>, RagError> {
        let inputs = [query.to_string()];
        let mut vectors = self.embedder.embed(&inputs).await?;
        let vector = if vectors.is_empty() {
            return Err(RagError::Embedding(
                "no embedding returned for query".to_string(),
            ));
        } else {
            vectors.swap_remove(0)
        };

        let matches = self.store.query(&vector, top_k).await?;
        Ok(matches
            .into_iter()
            .map(RetrievedCandidate::from_match)
            .collect())
    }
}
