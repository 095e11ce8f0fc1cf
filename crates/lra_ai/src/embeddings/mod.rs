use lra_core::error::AppError;

/// Embedding service capability. Only the dense index calls it; pipeline stages never do.
pub trait Embedder: Send + Sync {
    fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>, AppError>;
}

pub mod ollama_embed;
