//! Retrieval-augmented question answering over the Bhagavad Gita.
//!
//! The crate splits into an offline side and a query side. Offline, the
//! corpus loader and [`index::IndexBuilder`] embed every verse and upsert it
//! into the vector store under a stable `chapter:verse` key. At query time,
//! [`pipeline::QaPipeline`] resolves exact references, retrieves and reranks
//! candidates, and composes a bounded answer with a verse-disclosure
//! decision. The HTTP surface in [`server`] is a thin wrapper over the
//! pipeline.

pub mod core;
pub mod corpus;
pub mod index;
pub mod logging;
pub mod pipeline;
pub mod providers;
pub mod server;
pub mod state;
