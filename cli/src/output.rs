use std::time::Duration;

use lra_core::domain::{AssistantResponse, Route, SearchStrategy};
use lra_core::error::AppError;
use serde::Serialize;

/// One answered turn as printed by `lra ask`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub response: String,
    pub route: Route,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<SearchStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_source: Option<String>,
    /// Seconds, rounded to milliseconds.
    pub elapsed_time: f64,
}

impl Reply {
    pub fn new(resp: AssistantResponse, elapsed: Duration) -> Self {
        Self {
            response: resp.answer_text,
            route: resp.route,
            strategy: resp.strategy,
            target_source: resp.target_source,
            elapsed_time: (elapsed.as_secs_f64() * 1000.0).round() / 1000.0,
        }
    }
}

pub fn format_human(reply: &Reply) -> String {
    let mut trail = vec![reply.route.as_str().to_string()];
    if let Some(s) = reply.strategy {
        trail.push(s.as_str().to_string());
    }
    if let Some(t) = &reply.target_source {
        trail.push(t.clone());
    }
    format!(
        "{}\n\n[{}; {:.2}s]",
        reply.response.trim_end(),
        trail.join(" / "),
        reply.elapsed_time
    )
}

/// `lra ask --json` failure body: the error's own fields, so scripts can branch on `code`.
pub fn error_json(err: &AppError) -> serde_json::Result<String> {
    serde_json::to_string_pretty(err)
}
