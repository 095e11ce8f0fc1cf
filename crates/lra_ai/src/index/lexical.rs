//! BM25 keyword search over the frozen passage set.
//!
//! Scoring, tokenization, stemming and stop words come from the [`bm25`] crate with Turkish
//! language settings. The on-disk artifact holds only the passages; the engine is rebuilt once
//! when the artifact is loaded.

use std::collections::BTreeSet;
use std::path::Path;

use bm25::{DefaultTokenizer, Document, Language, SearchEngine, SearchEngineBuilder, Tokenizer};
use lra_core::domain::{render_header, Passage, HEADER_SEPARATOR};
use lra_core::error::AppError;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::vector::{read_json, write_json_atomic};

const ARTIFACT_VERSION: u32 = 1;

/// Fold every Turkish I variant to `i`.
///
/// Lowercasing alone maps `I` to `i` but leaves `ı` alone, so all-caps headings (`IŞIK`) would
/// never meet lowercase queries (`ışık`).
fn fold_dotted_i(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'I' | 'ı' | 'İ' => 'i',
            other => other,
        })
        .collect()
}

/// Search terms for `text`, as the lexical index sees them.
pub fn tokenize(text: &str) -> Vec<String> {
    DefaultTokenizer::new(Language::Turkish).tokenize(&fold_dotted_i(text))
}

#[derive(Debug, Serialize, Deserialize)]
struct LexicalArtifact {
    version: u32,
    passages: Vec<Passage>,
}

pub struct LexicalIndex {
    passages: Vec<Passage>,
    engine: SearchEngine<u32>,
}

impl LexicalIndex {
    pub fn build(passages: Vec<Passage>) -> Self {
        let documents: Vec<Document<u32>> = passages
            .iter()
            .enumerate()
            .map(|(i, p)| Document {
                id: i as u32,
                contents: fold_dotted_i(&p.content),
            })
            .collect();
        let engine =
            SearchEngineBuilder::<u32>::with_documents(Language::Turkish, documents).build();
        Self { passages, engine }
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn sources(&self) -> BTreeSet<String> {
        self.passages.iter().map(|p| p.source.clone()).collect()
    }

    /// Top-`k` passages by BM25 score. Passages sharing no term with the query are never returned.
    pub fn search(&self, query: &str, k: usize) -> Vec<Passage> {
        if k == 0 || self.passages.is_empty() {
            return Vec::new();
        }
        self.engine
            .search(&fold_dotted_i(query), k)
            .into_iter()
            .filter(|r| r.score > 0.0)
            .filter_map(|r| self.passages.get(r.document.id as usize).cloned())
            .collect()
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let artifact = LexicalArtifact {
            version: ARTIFACT_VERSION,
            passages: self.passages.clone(),
        };
        write_json_atomic(path, &artifact, "lexical index")?;
        info!(path = %path.display(), passages = self.passages.len(), "lexical index saved");
        Ok(())
    }

    /// Load and validate an artifact written by [`LexicalIndex::save`].
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let artifact: LexicalArtifact = read_json(path, "lexical index")?;
        if artifact.version != ARTIFACT_VERSION {
            return Err(AppError::new("INDEX_READ_FAILED", "Unsupported lexical index version")
                .with_details(format!(
                    "path={}; version={}; expected={ARTIFACT_VERSION}",
                    path.display(),
                    artifact.version
                )));
        }
        if let Some((i, _)) = artifact
            .passages
            .iter()
            .enumerate()
            .find(|(_, p)| !is_well_formed(p))
        {
            return Err(AppError::new("INDEX_READ_FAILED", "Lexical index holds a malformed passage")
                .with_details(format!("path={}; passage={i}", path.display())));
        }
        Ok(Self::build(artifact.passages))
    }
}

fn is_well_formed(p: &Passage) -> bool {
    let header = format!("{}{HEADER_SEPARATOR}", render_header(&p.source, &p.article_tag));
    !p.source.trim().is_empty() && p.content.starts_with(&header)
}
