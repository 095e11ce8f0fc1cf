use serde::{Deserialize, Serialize};

/// Tag for segments that carry no article marker (preambles, annexes, fallback windows).
pub const INTRODUCTORY_TAG: &str = "Introductory/Other";

/// Separator between the rendered identity header and the passage body.
pub const HEADER_SEPARATOR: &str = "\n---\n";

/// Tag carried by summary passages in the summary store.
pub const SUMMARY_TAG: &str = "Summary";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    ArticleRegex,
    RecursiveFallback,
    /// Synthetic per-source summary written by the summary index builder.
    Summary,
}

/// Atomic retrievable unit produced by segmentation.
///
/// Notes:
/// - `content` always begins with `"{source} | {article_tag}"` so the dense embedding sees
///   document identity alongside the text.
/// - `content` is the identity key for deduplication; two passages with equal content are the
///   same passage regardless of metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passage {
    pub content: String,
    pub source: String,
    pub article_tag: String,
    pub split_method: SplitMethod,
}

impl Passage {
    /// Build a passage from an already-trimmed body, rendering the identity header.
    pub fn new(source: &str, article_tag: &str, body: &str, split_method: SplitMethod) -> Self {
        Self {
            content: format!("{}{}{}", render_header(source, article_tag), HEADER_SEPARATOR, body),
            source: source.to_string(),
            article_tag: article_tag.to_string(),
            split_method,
        }
    }

    /// Passage text without the rendered header.
    pub fn body(&self) -> &str {
        self.content
            .split_once(HEADER_SEPARATOR)
            .map(|(_, body)| body)
            .unwrap_or(self.content.as_str())
    }
}

pub fn render_header(source: &str, article_tag: &str) -> String {
    format!("{source} | {article_tag}")
}

/// Retrieval strategy chosen by the query analyzer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// Precision lookup: specific articles, definitions, exact figures.
    #[serde(alias = "Q1", alias = "point")]
    Point,
    /// Discovery across documents: procedures, obligations, scenarios, comparisons.
    #[serde(alias = "Q2", alias = "broad")]
    Broad,
}

impl SearchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStrategy::Point => "Point",
            SearchStrategy::Broad => "Broad",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDecision {
    pub strategy: SearchStrategy,
    #[serde(default, alias = "target_source")]
    pub target_source: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Route {
    #[serde(alias = "Q3", alias = "overview")]
    Overview,
    #[serde(alias = "RAG", alias = "detailed_analysis")]
    DetailedAnalysis,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Overview => "Overview",
            Route::DetailedAnalysis => "DetailedAnalysis",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteDecision {
    pub route: Route,
    /// Diagnostic only; never drives control flow.
    #[serde(default)]
    pub reasoning: String,
}

/// Terminal payload of the orchestrator, identical in shape for both routes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantResponse {
    pub answer_text: String,
    pub route: Route,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<SearchStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passage_renders_identity_header() {
        let p = Passage::new("KVKK_Kanunu.pdf", "MADDE 5", "body text", SplitMethod::ArticleRegex);
        assert_eq!(p.content, "KVKK_Kanunu.pdf | MADDE 5\n---\nbody text");
        assert_eq!(p.body(), "body text");
    }

    #[test]
    fn decisions_accept_legacy_labels() {
        let a: AnalysisDecision =
            serde_json::from_str(r#"{"strategy":"Q1","target_source":"KVKK.pdf"}"#).unwrap();
        assert_eq!(a.strategy, SearchStrategy::Point);
        assert_eq!(a.target_source.as_deref(), Some("KVKK.pdf"));

        let r: RouteDecision = serde_json::from_str(r#"{"route":"RAG"}"#).unwrap();
        assert_eq!(r.route, Route::DetailedAnalysis);
        assert!(r.reasoning.is_empty());
    }

    #[test]
    fn overview_response_omits_strategy_fields() {
        let resp = AssistantResponse {
            answer_text: "hi".to_string(),
            route: Route::Overview,
            strategy: None,
            target_source: None,
        };
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v, serde_json::json!({"answerText": "hi", "route": "Overview"}));
    }
}
