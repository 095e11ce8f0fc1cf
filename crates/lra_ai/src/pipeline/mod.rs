//! Question answering: route, then either summarize or analyze, search and respond.

use std::sync::Arc;

use lra_core::config::AppConfig;
use lra_core::domain::{AnalysisDecision, AssistantResponse, Route, RouteDecision};
use lra_core::error::AppError;
use tracing::{info, info_span, warn};

use crate::embeddings::ollama_embed::OllamaEmbedder;
use crate::embeddings::Embedder;
use crate::index::{DualIndex, FileVectorStore, VectorStore};
use crate::llm::ollama_llm::OllamaLlm;
use crate::llm::Llm;
use crate::ollama::OllamaClient;
use crate::rerank::Reranker;
use crate::search::{HybridSearchEngine, RetrievedContext, Retriever};

pub mod analyzer;
pub mod overview;
pub mod prompts;
pub mod router;

use analyzer::QueryAnalyzer;
use overview::OverviewSynthesizer;
use prompts::responder_prompt;
use router::QueryRouter;

/// Orchestrator progress for one question. Every transition moves forward; there are no loops.
#[derive(Debug)]
enum Stage {
    Start,
    Routed(RouteDecision),
    Analyzed(AnalysisDecision),
    Searched {
        decision: AnalysisDecision,
        context: RetrievedContext,
    },
    Done(AssistantResponse),
}

pub struct Assistant {
    router: QueryRouter,
    analyzer: QueryAnalyzer,
    overview: OverviewSynthesizer,
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn Llm>,
    chat_model: String,
}

impl Assistant {
    pub fn new(
        llm: Arc<dyn Llm>,
        chat_model: impl Into<String>,
        retriever: Arc<dyn Retriever>,
        summaries: Option<Arc<dyn VectorStore>>,
        overview_top_k: usize,
    ) -> Self {
        let chat_model = chat_model.into();
        Self {
            router: QueryRouter::new(llm.clone(), chat_model.clone()),
            analyzer: QueryAnalyzer::new(llm.clone(), chat_model.clone()),
            overview: OverviewSynthesizer::new(llm.clone(), chat_model.clone(), summaries, overview_top_k),
            retriever,
            llm,
            chat_model,
        }
    }

    /// Wire every component against a local Ollama server and the on-disk indexes.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, AppError> {
        let client = OllamaClient::from_config(&cfg.ollama)?;
        let llm: Arc<dyn Llm> = Arc::new(OllamaLlm::new(client.clone()));
        let embedder: Arc<dyn Embedder> = Arc::new(OllamaEmbedder::new(client));

        let passages: Arc<dyn VectorStore> = Arc::new(FileVectorStore::open(
            cfg.paths.passages_dir(),
            embedder.clone(),
            cfg.ollama.embed_model.clone(),
        ));
        let summaries: Arc<dyn VectorStore> = Arc::new(FileVectorStore::open(
            cfg.paths.summaries_dir(),
            embedder,
            cfg.ollama.embed_model.clone(),
        ));

        let index = Arc::new(DualIndex::new(passages, cfg.paths.lexical_artifact()));
        let engine = HybridSearchEngine::new(index, default_reranker(), cfg.retrieval.clone());

        Ok(Self::new(
            llm,
            cfg.ollama.chat_model.clone(),
            Arc::new(engine),
            Some(summaries),
            cfg.retrieval.overview_top_k,
        ))
    }

    pub fn handle(&self, question: &str) -> Result<AssistantResponse, AppError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::new("ASSISTANT_QUESTION_EMPTY", "Question must not be empty"));
        }
        let _span = info_span!("handle", chars = question.chars().count()).entered();

        let mut stage = Stage::Start;
        loop {
            stage = match stage {
                Stage::Start => Stage::Routed(self.router.route(question)),
                Stage::Routed(RouteDecision {
                    route: Route::Overview,
                    ..
                }) => Stage::Done(AssistantResponse {
                    answer_text: self.overview.summarize_answer(question)?,
                    route: Route::Overview,
                    strategy: None,
                    target_source: None,
                }),
                Stage::Routed(RouteDecision {
                    route: Route::DetailedAnalysis,
                    ..
                }) => {
                    let sources = self.retriever.available_sources();
                    Stage::Analyzed(self.analyzer.analyze(question, &sources)?)
                }
                Stage::Analyzed(decision) => {
                    let context = self.retriever.search(question, &decision);
                    if context.is_empty() {
                        warn!(sentinel = %context.text, "no evidence retrieved");
                    }
                    Stage::Searched { decision, context }
                }
                Stage::Searched { decision, context } => {
                    let prompt = responder_prompt(question, &context.text, decision.target_source.as_deref());
                    let answer_text = self.llm.generate(&self.chat_model, &prompt)?;
                    Stage::Done(AssistantResponse {
                        answer_text,
                        route: Route::DetailedAnalysis,
                        strategy: Some(decision.strategy),
                        target_source: decision.target_source,
                    })
                }
                Stage::Done(resp) => {
                    info!(route = resp.route.as_str(), "question answered");
                    return Ok(resp);
                }
            };
        }
    }
}

#[cfg(feature = "reranker")]
fn default_reranker() -> Reranker {
    match crate::rerank::fastembed_encoder::FastembedCrossEncoder::try_new() {
        Ok(model) => Reranker::new(Arc::new(model)),
        Err(e) => {
            warn!(error = %e, "reranker unavailable; results keep retrieval order");
            Reranker::passthrough()
        }
    }
}

#[cfg(not(feature = "reranker"))]
fn default_reranker() -> Reranker {
    Reranker::passthrough()
}
