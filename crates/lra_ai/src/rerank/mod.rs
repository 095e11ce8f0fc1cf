//! Cross-encoder reranking of retrieval candidates.

use std::sync::Arc;

use lra_core::domain::Passage;
use lra_core::error::AppError;
use tracing::{debug, warn};

#[cfg(feature = "reranker")]
pub mod fastembed_encoder;

/// Joint relevance scorer over `(query, document)` pairs. Higher is more relevant.
pub trait CrossEncoder: Send + Sync {
    /// One score per document, in input order.
    fn score(&self, query: &str, documents: &[&str]) -> Result<Vec<f32>, AppError>;
}

/// Reorders candidates by cross-encoder score.
///
/// Without a model, or when scoring fails, the input order is kept and simply truncated.
#[derive(Clone, Default)]
pub struct Reranker {
    model: Option<Arc<dyn CrossEncoder>>,
}

impl Reranker {
    pub fn new(model: Arc<dyn CrossEncoder>) -> Self {
        Self { model: Some(model) }
    }

    /// A reranker that never scores.
    pub fn passthrough() -> Self {
        Self { model: None }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn rerank(&self, query: &str, candidates: Vec<Passage>, top_k: usize) -> Vec<Passage> {
        if candidates.is_empty() {
            return candidates;
        }
        let Some(model) = &self.model else {
            warn!("reranker model unavailable; keeping retrieval order");
            return truncated(candidates, top_k);
        };

        let docs: Vec<&str> = candidates.iter().map(|p| p.content.as_str()).collect();
        let scores = match model.score(query, &docs) {
            Ok(s) if s.len() == candidates.len() => s,
            Ok(s) => {
                warn!(
                    expected = candidates.len(),
                    got = s.len(),
                    "reranker returned a mismatched score count; keeping retrieval order"
                );
                return truncated(candidates, top_k);
            }
            Err(e) => {
                warn!(error = %e, "reranker failed; keeping retrieval order");
                return truncated(candidates, top_k);
            }
        };

        let mut scored: Vec<(f32, Passage)> = scores.into_iter().zip(candidates).collect();
        // Stable: equal scores keep retrieval order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(top_k);
        debug!(kept = scored.len(), "reranked candidates");
        scored.into_iter().map(|(_, p)| p).collect()
    }
}

fn truncated(mut candidates: Vec<Passage>, top_k: usize) -> Vec<Passage> {
    candidates.truncate(top_k);
    candidates
}
