//! Vector index: the store abstraction, the Pinecone adapter, and the
//! offline batch builder that populates the index from the corpus.

mod builder;
mod pinecone;
mod store;

pub use builder::IndexBuilder;
pub use pinecone::PineconeStore;
pub use store::{IndexStats, ScoredVerse, UpsertVector, VerseMetadata, VerseStore};
