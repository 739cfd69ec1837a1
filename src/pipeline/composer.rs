use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::core::errors::RagError;
use crate::providers::GenerationClient;

use super::retriever::RetrievedCandidate;

const SYSTEM_PROMPT: &str = "You answer using the Bhagavad Gita only. \
First give a short, neutral 2–3 sentence answer. \
Then list 2–3 supporting verses with chapter:verse in bullets. \
Do not invent quotes. If unsure, say so.";

const NO_VERSES_PLACEHOLDER: &str = "(no relevant verses found)";

// a sentence ends at a run of terminal punctuation followed by whitespace
static SENTENCE_BOUNDARY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+\s+").unwrap());

/// Tunables for answer shaping and verse disclosure.
#[derive(Debug, Clone, Copy)]
pub struct ComposerPolicy {
    /// Best-candidate similarity required before any verse is shown.
    pub min_disclose_score: f32,
    /// Hard cap on generated answer length, in sentences.
    pub max_sentences: usize,
    /// Most verses ever attached to one answer.
    pub max_verses: usize,
}

impl Default for ComposerPolicy {
    fn default() -> Self {
        Self {
            min_disclose_score: 0.30,
            max_sentences: 4,
            max_verses: 3,
        }
    }
}

/// One verse attached to an answer, in the response wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisclosedVerse {
    pub id: String,
    pub chapter: String,
    pub verse: String,
    pub text: String,
    pub transliteration: String,
    pub sanskrit: String,
}

impl DisclosedVerse {
    fn from_candidate(candidate: &RetrievedCandidate) -> Self {
        Self {
            id: candidate.id.clone(),
            chapter: candidate.chapter.clone(),
            verse: candidate.verse.clone(),
            text: candidate.display_text.clone(),
            transliteration: candidate.transliteration.clone(),
            sanskrit: candidate.shloka_sanskrit.clone(),
        }
    }
}

/// The finished answer for one question.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
    pub answer: String,
    pub verses: Vec<DisclosedVerse>,
    pub confidence: f32,
    pub notes: String,
}

/// Turns the top candidates into a bounded natural-language answer.
///
/// The generated text is capped at `max_sentences`, and verses are disclosed
/// only when the best candidate clears `min_disclose_score`; below that the
/// answer stands alone. Confidence is the best similarity score as reported
/// by the store, 0.0 when nothing was retrieved.
pub struct AnswerComposer {
    generator: Arc<dyn GenerationClient>,
    policy: ComposerPolicy,
}

impl AnswerComposer {
    pub fn new(generator: Arc<dyn GenerationClient>, policy: ComposerPolicy) -> Self {
        Self { generator, policy }
    }

    pub async fn compose(
        &self,
        query: &str,
        candidates: &[RetrievedCandidate],
        notes: &str,
    ) -> Result<AnswerResult, RagError> {
        let context = build_context(candidates);
        let raw = self
            .generator
            .complete(SYSTEM_PROMPT, &user_prompt(query, &context))
            .await?;
        let answer = cap_sentences(&raw, self.policy.max_sentences);

        let best_score = candidates
            .iter()
            .map(|c| c.similarity_score)
            .max_by(|a, b| a.total_cmp(b))
            .unwrap_or(0.0);
        let verses = if best_score >= self.policy.min_disclose_score {
            candidates
                .iter()
                .take(self.policy.max_verses)
                .map(DisclosedVerse::from_candidate)
                .collect()
        } else {
            Vec::new()
        };

        Ok(AnswerResult {
            answer,
            verses,
            confidence: best_score,
            notes: notes.to_string(),
        })
    }
}

/// One line per candidate, or the placeholder when nothing was retrieved.
pub(super) fn build_context(candidates: &[RetrievedCandidate]) -> String {
    if candidates.is_empty() {
        return NO_VERSES_PLACEHOLDER.to_string();
    }
    candidates
        .iter()
        .map(|c| format!("- {}: {}", c.id, c.display_text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn user_prompt(query: &str, context: &str) -> String {
    format!(
        "Question: {}\nRelevant verses:\n{}\n\n\
         Write a concise answer in 2–3 sentences.\n\
         Then add 2–3 bullet points: 'Chapter X:Verse Y — <short excerpt>'. Keep quotes verbatim.",
        query, context
    )
}

/// Keeps the first `max_sentences` sentences, rejoined with single spaces.
/// Terminal punctuation stays with its sentence, so reapplying the cap
/// leaves the text unchanged.
pub(super) fn cap_sentences(text: &str, max_sentences: usize) -> String {
    if max_sentences == 0 {
        return String::new();
    }

    let mut fragments: Vec<&str> = Vec::new();
    let mut last = 0;
    for m in SENTENCE_BOUNDARY_RE.find_iter(text) {
        let punct_end = m.start() + m.as_str().trim_end().len();
        let fragment = text[last..punct_end].trim();
        if !fragment.is_empty() {
            fragments.push(fragment);
        }
        last = m.end();
        if fragments.len() == max_sentences {
            break;
        }
    }
    if fragments.len() < max_sentences {
        let tail = text[last..].trim();
        if !tail.is_empty() {
            fragments.push(tail);
        }
    }

    fragments.join(" ")
}
