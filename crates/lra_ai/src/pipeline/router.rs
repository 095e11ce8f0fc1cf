use std::sync::Arc;

use lra_core::domain::{Route, RouteDecision};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::prompts::router_prompt;
use crate::llm::structured::{decode, StructuredOutput};
use crate::llm::Llm;

impl StructuredOutput for RouteDecision {
    const NAME: &'static str = "RouteDecision";

    fn schema() -> Value {
        json!({
            "title": Self::NAME,
            "type": "object",
            "properties": {
                "route": {
                    "type": "string",
                    "enum": ["Overview", "DetailedAnalysis"]
                },
                "reasoning": { "type": "string" }
            },
            "required": ["route", "reasoning"]
        })
    }
}

/// First stage: overview versus detailed analysis.
pub struct QueryRouter {
    llm: Arc<dyn Llm>,
    model: String,
}

impl QueryRouter {
    pub fn new(llm: Arc<dyn Llm>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Never fails: any completion or decoding problem routes to `Overview`.
    pub fn route(&self, question: &str) -> RouteDecision {
        match decode::<RouteDecision>(self.llm.as_ref(), &self.model, &router_prompt(question)) {
            Ok(d) => {
                info!(route = d.route.as_str(), reasoning = %d.reasoning, "question routed");
                d
            }
            Err(e) => {
                warn!(error = %e, "routing failed; defaulting to overview");
                RouteDecision {
                    route: Route::Overview,
                    reasoning: format!("fallback after routing failure: {e}"),
                }
            }
        }
    }
}
