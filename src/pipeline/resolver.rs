use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::RagError;
use crate::index::VerseStore;

use super::composer::DisclosedVerse;

/// Confidence reported for a direct key hit; retrieval similarity never
/// applies on this path.
pub const EXACT_MATCH_CONFIDENCE: f32 = 0.95;

// chapter is 1-2 digits, verse 1-3, whitespace tolerated around the colon
static VERSE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,2})\s*:\s*(\d{1,3})\s*$").unwrap());

/// Detects `chapter:verse` queries and serves them by direct key lookup,
/// skipping retrieval, reranking and generation entirely.
pub struct ExactReferenceResolver {
    store: Arc<dyn VerseStore>,
}

impl ExactReferenceResolver {
    pub fn new(store: Arc<dyn VerseStore>) -> Self {
        Self { store }
    }

    /// `Ok(None)` covers both a non-reference query and a reference whose
    /// key is not in the index; the caller falls through to retrieval.
    pub async fn resolve(&self, query: &str) -> Result<Option<DisclosedVerse>, RagError> {
        let Some(caps) = VERSE_REF_RE.captures(query) else {
            return Ok(None);
        };
        // leading zeros normalize away: "02: 047" and "2:47" hit the same key
        let id = match (caps[1].parse::<u32>(), caps[2].parse::<u32>()) {
            (Ok(chapter), Ok(verse)) => format!("{}:{}", chapter, verse),
            _ => return Ok(None),
        };

        match self.store.fetch(&id).await? {
            Some(md) => {
                let text = md.display_text();
                Ok(Some(DisclosedVerse {
                    id,
                    chapter: md.chapter,
                    verse: md.verse,
                    text,
                    transliteration: md.transliteration,
                    sanskrit: md.shloka_sanskrit,
                }))
            }
            None => Ok(None),
        }
    }
}
