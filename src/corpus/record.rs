use serde::{Deserialize, Serialize};

/// Canonical per-verse record, normalized from one source CSV row.
///
/// Created once at index-build time and immutable afterwards; re-indexing
/// overwrites by key. Text fields default to the empty string when the
/// source cell is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseRecord {
    pub dataset_id: String,
    pub chapter: Option<u32>,
    pub verse: Option<u32>,
    pub shloka_sanskrit: String,
    pub transliteration: String,
    pub hindi_meaning: String,
    pub english_meaning: String,
    pub word_meaning: String,
}

impl VerseRecord {
    /// Stable external key: `"{chapter}:{verse}"`, falling back to the
    /// dataset ID when either part is blank in the source data.
    pub fn key(&self) -> String {
        match (self.chapter, self.verse) {
            (Some(chapter), Some(verse)) => format!("{}:{}", chapter, verse),
            _ => self.dataset_id.clone(),
        }
    }

    /// Builds the text that gets embedded for this verse.
    ///
    /// Prefers the English meaning; when that is empty, falls back to
    /// transliteration plus word meaning, and always carries a
    /// chapter/verse prefix. Queries are embedded raw; this synthesis
    /// applies to indexed verses only.
    pub fn embed_input_text(&self) -> String {
        let english = self.english_meaning.trim();
        let body = if english.is_empty() {
            format!(
                "{} — {}",
                self.transliteration.trim(),
                self.word_meaning.trim()
            )
        } else {
            english.to_string()
        };
        format!(
            "Chapter {}, Verse {}: {}",
            display_part(self.chapter),
            display_part(self.verse),
            body
        )
    }
}

fn display_part(part: Option<u32>) -> String {
    part.map(|v| v.to_string()).unwrap_or_default()
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
            hindi_meaning: "".to_string(),
            english_meaning: "You have a right to perform your duty.".to_string(),
            word_meaning: "karmani—in work; eva—only".to_string(),
        }
    }

    #[test]
    fn key_uses_chapter_and_verse() {
        assert_eq!(record().key(), "2:47");
    }

    #[test]
    fn key_falls_back_to_dataset_id() {
        let mut r = record();
        r.verse = None;
        assert_eq!(r.key(), "BG2.47");
    }

    #[test]
    fn embed_text_prefers_english_meaning() {
        let text = record().embed_input_text();
        assert_eq!(
            text,
            "Chapter 2, Verse 47: You have a right to perform your duty."
        );
    }

    #[test]
    fn embed_text_falls_back_to_transliteration_and_word_meaning() {
        let mut r = record();
        r.english_meaning = "  ".to_string();
        let text = r.embed_input_text();
        assert_eq!(
            text,
            "Chapter 2, Verse 47: karmany evadhikaras te — karmani—in work; eva—only"
        );
    }

    #[test]
    fn embed_text_renders_blank_parts_as_empty() {
        let mut r = record();
        r.chapter = None;
        assert!(r.embed_input_text().starts_with("Chapter , Verse 47: "));
    }
}
