//! Hybrid retrieval: dense and sparse candidates, merged, diversified and reranked.

use std::sync::Arc;

use lra_core::config::RetrievalConfig;
use lra_core::domain::{AnalysisDecision, Passage, SearchStrategy};
use tracing::info;

use crate::index::DualIndex;
use crate::rerank::Reranker;

pub mod format;
pub mod merge;

use format::{render_blocks, source_not_found, NO_RESULTS};
use merge::{dedup_by_content, round_robin_by_source};

/// Ranked evidence for one question plus its rendered prompt context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedContext {
    pub passages: Vec<Passage>,
    /// Numbered blocks, or a not-found sentinel when `passages` is empty.
    pub text: String,
}

impl RetrievedContext {
    fn not_found(text: impl Into<String>) -> Self {
        Self {
            passages: Vec::new(),
            text: text.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

/// Evidence retrieval as seen by the orchestrator.
pub trait Retriever: Send + Sync {
    fn available_sources(&self) -> Vec<String>;

    fn search(&self, question: &str, decision: &AnalysisDecision) -> RetrievedContext;
}

pub struct HybridSearchEngine {
    index: Arc<DualIndex>,
    reranker: Reranker,
    cfg: RetrievalConfig,
}

impl HybridSearchEngine {
    pub fn new(index: Arc<DualIndex>, reranker: Reranker, cfg: RetrievalConfig) -> Self {
        Self {
            index,
            reranker,
            cfg,
        }
    }

    /// Precision lookup, optionally confined to one source.
    pub fn point_search(&self, question: &str, target: Option<&str>) -> RetrievedContext {
        let (dense, sparse) = rayon::join(
            || self.index.dense_search(question, self.cfg.point_dense_k, target),
            || self.index.sparse_search(question, self.cfg.point_sparse_k, target),
        );
        let (dense_n, sparse_n) = (dense.len(), sparse.len());
        let merged = dedup_by_content(dense.into_iter().chain(sparse));
        info!(
            strategy = "point",
            target = target.unwrap_or("-"),
            dense = dense_n,
            sparse = sparse_n,
            merged = merged.len(),
            "candidates gathered"
        );

        if merged.is_empty() {
            return RetrievedContext::not_found(match target {
                Some(t) => source_not_found(t),
                None => NO_RESULTS.to_string(),
            });
        }

        let passages = self.reranker.rerank(question, merged, self.cfg.point_top_k);
        RetrievedContext {
            text: render_blocks("RESULT", &passages),
            passages,
        }
    }

    /// Discovery across documents with per-source fairness.
    pub fn broad_search(&self, question: &str) -> RetrievedContext {
        let cfg = &self.cfg;
        let (dense, sparse) = rayon::join(
            || {
                self.index.dense_diverse_search(
                    question,
                    cfg.broad_dense_k,
                    cfg.broad_fetch_k,
                    cfg.broad_diversity,
                )
            },
            || self.index.sparse_search(question, cfg.broad_sparse_k, None),
        );
        let (dense_n, sparse_n) = (dense.len(), sparse.len());
        let merged = dedup_by_content(dense.into_iter().chain(sparse));
        let balanced = round_robin_by_source(merged, cfg.broad_per_source);
        info!(
            strategy = "broad",
            dense = dense_n,
            sparse = sparse_n,
            balanced = balanced.len(),
            "candidates gathered"
        );

        if balanced.is_empty() {
            return RetrievedContext::not_found(NO_RESULTS);
        }

        let passages = self.reranker.rerank(question, balanced, cfg.broad_top_k);
        RetrievedContext {
            text: render_blocks("DOCUMENT", &passages),
            passages,
        }
    }
}

impl Retriever for HybridSearchEngine {
    fn available_sources(&self) -> Vec<String> {
        self.index.available_sources()
    }

    fn search(&self, question: &str, decision: &AnalysisDecision) -> RetrievedContext {
        match decision.strategy {
            SearchStrategy::Point => self.point_search(question, decision.target_source.as_deref()),
            SearchStrategy::Broad => self.broad_search(question),
        }
    }
}
