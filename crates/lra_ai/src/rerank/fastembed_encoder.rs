use std::sync::Mutex;

use fastembed::{RerankInitOptions, RerankerModel, TextRerank};
use lra_core::error::AppError;

use super::CrossEncoder;

/// Local multilingual cross-encoder (`BAAI/bge-reranker-v2-m3`) run through ONNX.
pub struct FastembedCrossEncoder {
    model: Mutex<TextRerank>,
}

impl FastembedCrossEncoder {
    /// Loads (and on first use downloads) the model weights.
    pub fn try_new() -> Result<Self, AppError> {
        let model = TextRerank::try_new(RerankInitOptions::new(RerankerModel::BGERerankerV2M3))
            .map_err(|e| {
                AppError::new("AI_RERANKER_UNAVAILABLE", "Failed to load reranker model")
                    .with_details(e.to_string())
            })?;
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl CrossEncoder for FastembedCrossEncoder {
    fn score(&self, query: &str, documents: &[&str]) -> Result<Vec<f32>, AppError> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| AppError::new("AI_RERANKER_FAILED", "Reranker session lock poisoned"))?;
        let results = model
            .rerank(query, documents.to_vec(), false, None)
            .map_err(|e| AppError::new("AI_RERANKER_FAILED", "Cross-encoder scoring failed").with_details(e.to_string()))?;

        // Results come back sorted by score; restore input order.
        let mut scores = vec![f32::NEG_INFINITY; documents.len()];
        for r in results {
            if let Some(slot) = scores.get_mut(r.index) {
                *slot = r.score;
            }
        }
        Ok(scores)
    }
}
