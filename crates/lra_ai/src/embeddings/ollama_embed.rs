use lra_core::error::AppError;
use serde::{Deserialize, Serialize};

use super::Embedder;
use crate::ollama::OllamaClient;

/// Passages are bounded by the segmenter; this caps pathological inputs such as long queries.
const MAX_EMBED_CHARS: usize = 8_000;

#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: OllamaClient,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>, AppError> {
        let prompt = truncate_chars(input, MAX_EMBED_CHARS);

        let url = format!("{}/api/embeddings", self.client.base_url());
        let req = EmbeddingsRequest { model, prompt };
        let resp = ureq::post(&url)
            .timeout(self.client.embed_timeout())
            .send_json(serde_json::to_value(req).map_err(|e| {
                AppError::new("AI_EMBEDDINGS_FAILED", "Failed to encode embeddings request")
                    .with_details(e.to_string())
            })?);

        match resp {
            Ok(r) if r.status() == 200 => {
                let v: EmbeddingsResponse = r.into_json().map_err(|e| {
                    AppError::new("AI_EMBEDDINGS_FAILED", "Failed to decode embeddings response")
                        .with_details(e.to_string())
                })?;
                if v.embedding.is_empty() {
                    return Err(AppError::new(
                        "AI_EMBEDDINGS_FAILED",
                        "Embeddings response was empty",
                    ));
                }
                Ok(v.embedding)
            }
            Ok(r) => Err(
                AppError::new("AI_EMBEDDINGS_FAILED", "Embeddings request failed")
                    .with_details(format!("status={}; model={model}", r.status())),
            ),
            Err(e) => Err(
                AppError::new("AI_EMBEDDINGS_FAILED", "Failed to call embeddings endpoint")
                    .with_details(e.to_string())
                    .with_retryable(true),
            ),
        }
    }
}
