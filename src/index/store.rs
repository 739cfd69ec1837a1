use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::RagError;
use crate::corpus::VerseRecord;

/// Tag recorded on every vector so the provenance of stored metadata is
/// visible in the index itself.
pub const CORPUS_SOURCE: &str = "kaggle_bhagavad_gita_a2m2a2n2";

/// Per-verse metadata attached to each stored vector. All fields are strings
/// to match what the store persists; blank means the source cell was empty.
/// Reads tolerate records written with fewer fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerseMetadata {
    pub id_dataset: String,
    pub chapter: String,
    pub verse: String,
    pub shloka_sanskrit: String,
    pub transliteration: String,
    pub hin_meaning: String,
    pub eng_meaning: String,
    pub word_meaning: String,
    pub source: String,
}

impl VerseMetadata {
    pub fn from_record(record: &VerseRecord) -> Self {
        let part = |value: Option<u32>| value.map(|v| v.to_string()).unwrap_or_default();
        Self {
            id_dataset: record.dataset_id.clone(),
            chapter: part(record.chapter),
            verse: part(record.verse),
            shloka_sanskrit: record.shloka_sanskrit.clone(),
            transliteration: record.transliteration.clone(),
            hin_meaning: record.hindi_meaning.clone(),
            eng_meaning: record.english_meaning.clone(),
            word_meaning: record.word_meaning.clone(),
            source: CORPUS_SOURCE.to_string(),
        }
    }

    /// English meaning when present, transliteration otherwise, empty last.
    pub fn display_text(&self) -> String {
        if !self.eng_meaning.trim().is_empty() {
            self.eng_meaning.clone()
        } else {
            self.transliteration.clone()
        }
    }
}

/// One vector ready for upsert, in the store's wire shape.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertVector {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: VerseMetadata,
}

/// One nearest-neighbor match. Metadata can be absent when the stored vector
/// carries none.
#[derive(Debug, Clone)]
pub struct ScoredVerse {
    pub id: String,
    pub score: f32,
    pub metadata: Option<VerseMetadata>,
}

/// Aggregate index diagnostics; every field is best-effort.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub total_vector_count: Option<u64>,
}

#[async_trait]
pub trait VerseStore: Send + Sync {
    /// create the index if absent, with the fixed dimension and cosine metric
    async fn ensure_index(&self) -> Result<(), RagError>;

    /// write vectors keyed by verse id; existing ids are overwritten
    async fn upsert(&self, vectors: Vec<UpsertVector>) -> Result<(), RagError>;

    /// nearest-neighbor search with metadata attached, best match first
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredVerse>, RagError>;

    /// direct key lookup; an absent key is a normal miss, not an error
    async fn fetch(&self, id: &str) -> Result<Option<VerseMetadata>, RagError>;

    /// aggregate statistics, purely diagnostic
    async fn describe_stats(&self) -> Result<IndexStats, RagError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> VerseRecord {
        VerseRecord {
            dataset_id: "BG2.47".to_string(),
            chapter: Some(2),
            verse: Some(47),
            shloka_sanskrit: "कर्मण्येवाधिकारस्ते".to_string(),
            transliteration: "karmany evadhikaras te".to_string(),
            hindi_meaning: "कर्म पर अधिकार".to_string(),
            english_meaning: "You have a right to action alone.".to_string(),
            word_meaning: "karmani: in action".to_string(),
        }
    }

    #[test]
    fn metadata_mirrors_record_fields() {
        let md = VerseMetadata::from_record(&record());
        assert_eq!(md.id_dataset, "BG2.47");
        assert_eq!(md.chapter, "2");
        assert_eq!(md.verse, "47");
        assert_eq!(md.source, CORPUS_SOURCE);
    }

    #[test]
    fn blank_chapter_serializes_as_empty_string() {
        let mut r = record();
        r.chapter = None;
        let md = VerseMetadata::from_record(&r);
        assert_eq!(md.chapter, "");
    }

    #[test]
    fn display_text_prefers_english() {
        let md = VerseMetadata::from_record(&record());
        assert_eq!(md.display_text(), "You have a right to action alone.");

        let mut r = record();
        r.english_meaning = "  ".to_string();
        let md = VerseMetadata::from_record(&r);
        assert_eq!(md.display_text(), "karmany evadhikaras te");
    }
}
