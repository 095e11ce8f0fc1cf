use std::sync::Arc;

use lra_core::domain::AnalysisDecision;
use lra_core::error::AppError;
use serde_json::{json, Value};
use tracing::info;

use super::prompts::analyzer_prompt;
use crate::guardrails::resolve_target_source;
use crate::llm::structured::{decode, StructuredOutput};
use crate::llm::Llm;

impl StructuredOutput for AnalysisDecision {
    const NAME: &'static str = "AnalysisDecision";

    fn schema() -> Value {
        json!({
            "title": Self::NAME,
            "type": "object",
            "properties": {
                "strategy": {
                    "type": "string",
                    "enum": ["Point", "Broad"],
                    "description": "Point for precise lookups, Broad for exploratory questions"
                },
                "targetSource": {
                    "type": ["string", "null"],
                    "description": "Exact name of the referenced source document, or null"
                }
            },
            "required": ["strategy", "targetSource"]
        })
    }
}

/// Picks the retrieval strategy and an optional source focus for a detailed question.
pub struct QueryAnalyzer {
    llm: Arc<dyn Llm>,
    model: String,
}

impl QueryAnalyzer {
    pub fn new(llm: Arc<dyn Llm>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Failures are fatal for the request; there is no default strategy.
    pub fn analyze(&self, question: &str, available_sources: &[String]) -> Result<AnalysisDecision, AppError> {
        let prompt = analyzer_prompt(question, available_sources);
        let raw: AnalysisDecision = decode(self.llm.as_ref(), &self.model, &prompt)
            .map_err(|e| e.into_app_error("AI_ANALYSIS_FAILED", "Query analysis failed"))?;

        let target_source = resolve_target_source(raw.target_source.as_deref(), available_sources)?;
        let decision = AnalysisDecision {
            strategy: raw.strategy,
            target_source,
        };
        info!(
            strategy = decision.strategy.as_str(),
            target = decision.target_source.as_deref().unwrap_or("-"),
            "question analyzed"
        );
        Ok(decision)
    }
}
