//! Offline index building: passages into the dense and lexical stores, summaries into their own.

use std::path::PathBuf;
use std::sync::Arc;

use lra_core::config::AppConfig;
use lra_core::domain::{Passage, SplitMethod};
use lra_core::error::AppError;
use lra_core::ingest::{read_corpus_dir, SourceDocument};
use lra_core::segment::segment_with;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

use crate::embeddings::Embedder;
use crate::index::{FileVectorStore, LexicalIndex, VectorStoreStatus};
use crate::llm::Llm;
use crate::pipeline::overview::build_summary_index;
use crate::search::merge::dedup_by_content;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub documents: usize,
    pub passages: usize,
    pub article_passages: usize,
    pub fallback_passages: usize,
    pub dense: VectorStoreStatus,
    pub lexical_path: PathBuf,
}

pub fn now_rfc3339() -> Result<String, AppError> {
    OffsetDateTime::now_utc().format(&Rfc3339).map_err(|e| {
        AppError::new("INTERNAL_TIME_FORMAT", "Failed to format timestamp").with_details(e.to_string())
    })
}

fn load_documents(cfg: &AppConfig) -> Result<Vec<SourceDocument>, AppError> {
    let docs = read_corpus_dir(&cfg.paths.data_dir)?;
    if docs.is_empty() {
        return Err(AppError::new("INGEST_NO_DOCUMENTS", "Corpus directory holds no text documents")
            .with_details(format!("data_dir={}", cfg.paths.data_dir.display())));
    }
    Ok(docs)
}

/// Segment every document, content-deduplicated, in corpus order.
pub fn segment_corpus(docs: &[SourceDocument], cfg: &AppConfig) -> Vec<Passage> {
    dedup_by_content(
        docs.iter()
            .flat_map(|d| segment_with(&d.text, &d.source, &cfg.segmenter)),
    )
}

/// Build both passage indexes from the corpus directory.
///
/// The dense store is synced once with the full passage set; unchanged passages are not
/// re-embedded. `reset` clears the dense store first. The lexical artifact is rebuilt each time.
pub fn ingest_corpus(cfg: &AppConfig, embedder: Arc<dyn Embedder>, reset: bool) -> Result<IngestReport, AppError> {
    let docs = load_documents(cfg)?;
    let passages = segment_corpus(&docs, cfg);
    let article_passages = passages
        .iter()
        .filter(|p| p.split_method == SplitMethod::ArticleRegex)
        .count();
    info!(
        documents = docs.len(),
        passages = passages.len(),
        article_passages,
        "corpus segmented"
    );

    let mut dense = FileVectorStore::open(cfg.paths.passages_dir(), embedder, cfg.ollama.embed_model.clone());
    if reset {
        dense.reset()?;
    }
    let status = dense.sync(&passages, &now_rfc3339()?)?;

    let lexical_path = cfg.paths.lexical_artifact();
    let count = passages.len();
    LexicalIndex::build(passages).save(&lexical_path)?;

    Ok(IngestReport {
        documents: docs.len(),
        passages: count,
        article_passages,
        fallback_passages: count - article_passages,
        dense: status,
        lexical_path,
    })
}

/// Generate and index one summary per corpus document.
pub fn summarize_corpus(
    cfg: &AppConfig,
    llm: &dyn Llm,
    embedder: Arc<dyn Embedder>,
    reset: bool,
) -> Result<VectorStoreStatus, AppError> {
    let docs = load_documents(cfg)?;
    let mut store = FileVectorStore::open(cfg.paths.summaries_dir(), embedder, cfg.ollama.embed_model.clone());
    if reset {
        store.reset()?;
    }
    build_summary_index(&docs, llm, &cfg.ollama.chat_model, &mut store, &now_rfc3339()?)
}
