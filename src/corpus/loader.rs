use std::io::Read;
use std::path::Path;

use crate::core::errors::RagError;

use super::record::VerseRecord;

/// Columns the source CSV must carry. Any missing column aborts the build.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "ID",
    "Chapter",
    "Verse",
    "Shloka",
    "Transliteration",
    "HinMeaning",
    "EngMeaning",
    "WordMeaning",
];

/// Loads and normalizes the verse corpus from a CSV file.
pub fn load_corpus(path: &Path) -> Result<Vec<VerseRecord>, RagError> {
    let reader = csv::Reader::from_path(path)?;
    load_records(reader)
}

/// Loads the corpus from any reader; used by tests with in-memory CSV.
pub fn load_corpus_from_reader<R: Read>(reader: R) -> Result<Vec<VerseRecord>, RagError> {
    load_records(csv::Reader::from_reader(reader))
}

fn load_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<VerseRecord>, RagError> {
    let headers = reader.headers()?.clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !headers.iter().any(|h| h == **name))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(RagError::Schema(format!(
            "CSV missing columns: {}",
            missing.join(", ")
        )));
    }

    let column = |name: &str| -> Result<usize, RagError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| RagError::Schema(format!("CSV missing columns: {}", name)))
    };
    let id_col = column("ID")?;
    let chapter_col = column("Chapter")?;
    let verse_col = column("Verse")?;
    let shloka_col = column("Shloka")?;
    let translit_col = column("Transliteration")?;
    let hindi_col = column("HinMeaning")?;
    let english_col = column("EngMeaning")?;
    let word_col = column("WordMeaning")?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cell = |idx: usize| row.get(idx).unwrap_or("").trim().to_string();

        records.push(VerseRecord {
            dataset_id: cell(id_col),
            chapter: parse_part(&cell(chapter_col)),
            verse: parse_part(&cell(verse_col)),
            shloka_sanskrit: cell(shloka_col),
            transliteration: cell(translit_col),
            hindi_meaning: cell(hindi_col),
            english_meaning: cell(english_col),
            word_meaning: cell(word_col),
        });
    }

    Ok(records)
}

fn parse_part(cell: &str) -> Option<u32> {
    if cell.is_empty() {
        return None;
    }
    cell.parse::<u32>().ok()
}
