use std::sync::Arc;

use lra_core::domain::{Passage, SplitMethod, SUMMARY_TAG};
use lra_core::error::AppError;
use lra_core::ingest::SourceDocument;
use tracing::{info, warn};

use super::prompts::{document_summary_prompt, overview_prompt};
use crate::index::{FileVectorStore, VectorStore, VectorStoreStatus};
use crate::llm::Llm;

/// Characters of each document handed to the summary prompt.
pub const SUMMARY_INPUT_CHARS: usize = 25_000;

pub const NO_SUMMARIES: &str = "No document summaries are indexed yet. Build the summary index first.";
pub const SUMMARIES_UNAVAILABLE: &str = "The document summaries could not be accessed.";

/// Answers overview questions from per-document summaries.
pub struct OverviewSynthesizer {
    llm: Arc<dyn Llm>,
    model: String,
    summaries: Option<Arc<dyn VectorStore>>,
    top_k: usize,
}

impl OverviewSynthesizer {
    pub fn new(
        llm: Arc<dyn Llm>,
        model: impl Into<String>,
        summaries: Option<Arc<dyn VectorStore>>,
        top_k: usize,
    ) -> Self {
        Self {
            llm,
            model: model.into(),
            summaries,
            top_k,
        }
    }

    /// Summary context for `question`, or a placeholder when summaries are missing or unreadable.
    pub fn summary_context(&self, question: &str) -> String {
        let Some(store) = &self.summaries else {
            warn!("summary store missing");
            return NO_SUMMARIES.to_string();
        };
        match store.similarity_search(question, self.top_k, None) {
            Ok(hits) if hits.is_empty() => NO_SUMMARIES.to_string(),
            Ok(hits) => {
                info!(summaries = hits.len(), "summaries retrieved");
                hits.iter()
                    .map(|p| format!("\n--- DOCUMENT: {} ---\n{}\n", p.source, p.body()))
                    .collect()
            }
            Err(e) => {
                warn!(error = %e, "summary search failed");
                SUMMARIES_UNAVAILABLE.to_string()
            }
        }
    }

    /// Completion failures propagate.
    pub fn summarize_answer(&self, question: &str) -> Result<String, AppError> {
        let context = self.summary_context(question);
        self.llm.generate(&self.model, &overview_prompt(question, &context))
    }
}

fn leading_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Write one generated summary per document into `store`.
///
/// A document whose summary fails is skipped with a warning; the build fails only when no
/// summary at all could be produced.
pub fn build_summary_index(
    docs: &[SourceDocument],
    llm: &dyn Llm,
    model: &str,
    store: &mut FileVectorStore,
    updated_at: &str,
) -> Result<VectorStoreStatus, AppError> {
    let mut summaries = Vec::with_capacity(docs.len());
    for doc in docs {
        let prompt = document_summary_prompt(&doc.source, leading_chars(&doc.text, SUMMARY_INPUT_CHARS));
        match llm.generate(model, &prompt) {
            Ok(text) => {
                info!(source = %doc.source, chars = text.len(), "summary generated");
                summaries.push(Passage::new(&doc.source, SUMMARY_TAG, text.trim(), SplitMethod::Summary));
            }
            Err(e) => warn!(source = %doc.source, error = %e, "summary generation failed; skipping"),
        }
    }
    if summaries.is_empty() {
        return Err(AppError::new(
            "INGEST_SUMMARIES_FAILED",
            "No document summary could be generated",
        )
        .with_details(format!("documents={}", docs.len())));
    }
    store.sync(&summaries, updated_at)
}
