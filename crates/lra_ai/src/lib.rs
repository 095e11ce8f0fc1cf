pub mod embeddings;
pub mod guardrails;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod ollama;
pub mod pipeline;
pub mod rerank;
pub mod search;

pub use pipeline::Assistant;
