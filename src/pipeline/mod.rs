//! Query-time answer pipeline.
//!
//! A question flows through four stages: exact-reference resolution (which
//! can short-circuit the rest), dense retrieval, relevance reranking with a
//! deterministic fallback, and answer composition.

mod composer;
mod engine;
mod reranker;
mod resolver;
mod retriever;


pub use composer::{AnswerComposer, AnswerResult, ComposerPolicy, DisclosedVerse};
pub use engine::QaPipeline;
pub use reranker::Reranker;
pub use resolver::{ExactReferenceResolver, EXACT_MATCH_CONFIDENCE};
pub use retriever::{DenseRetriever, RetrievedCandidate};
