//! Corpus ingestion and normalization.
//!
//! This module provides:
//! - `VerseRecord`: the canonical per-verse record built from one CSV row
//! - `load_corpus`: schema-checked CSV loading with cell normalization

mod loader;
mod record;

pub use loader::{load_corpus, load_corpus_from_reader, REQUIRED_COLUMNS};
pub use record::VerseRecord;
