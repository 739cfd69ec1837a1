//! Clients for the external model services: OpenAI embeddings and chat
//! completions, and Cohere relevance reranking. Each capability sits behind
//! a small trait so the pipeline can be exercised with test doubles.

mod embedding;
mod generation;
mod rerank;

pub use embedding::{EmbeddingClient, OpenAiEmbeddingClient};
pub use generation::{GenerationClient, OpenAiChatClient};
pub use rerank::{CohereRerankClient, RerankClient};
