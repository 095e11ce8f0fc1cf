use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use lra_core::domain::Passage;
use lra_core::error::AppError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::similarity::{cosine_similarity, l2_norm, mmr_select};
use crate::embeddings::Embedder;

/// Dense passage store: nearest-neighbour and diversity search over embedded passages.
pub trait VectorStore: Send + Sync {
    /// Cosine top-`k`, restricted to `source` when given.
    fn similarity_search(
        &self,
        query: &str,
        k: usize,
        source: Option<&str>,
    ) -> Result<Vec<Passage>, AppError>;

    /// MMR selection of `k` passages out of the `fetch_k` nearest neighbours.
    fn max_marginal_relevance_search(
        &self,
        query: &str,
        k: usize,
        fetch_k: usize,
        lambda: f32,
    ) -> Result<Vec<Passage>, AppError>;

    fn sources(&self) -> Result<Vec<String>, AppError>;

    fn len(&self) -> Result<usize, AppError>;

    fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorStoreStatus {
    pub ready: bool,
    pub model: Option<String>,
    pub dims: Option<u32>,
    pub record_count: u32,
    pub updated_at: Option<String>,
}

impl VectorStoreStatus {
    fn empty() -> Self {
        Self {
            ready: false,
            model: None,
            dims: None,
            record_count: 0,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    passage: Passage,
    embedding: Vec<f32>,
}

struct Entry {
    passage: Passage,
    embedding: Vec<f32>,
    norm: f32,
}

/// Content id: sha256 of the passage content.
pub fn passage_id(passage: &Passage) -> String {
    hex::encode(Sha256::digest(passage.content.as_bytes()))
}

/// JSON-on-disk vector store. Records are keyed by content hash and written with tmp->rename.
///
/// Records are read once on first search and kept for the lifetime of the handle.
pub struct FileVectorStore {
    root: PathBuf,
    embedder: Arc<dyn Embedder>,
    model: String,
    cache: OnceLock<Arc<Vec<Entry>>>,
}

impl FileVectorStore {
    pub fn open(root: impl Into<PathBuf>, embedder: Arc<dyn Embedder>, model: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            embedder,
            model: model.into(),
            cache: OnceLock::new(),
        }
    }

    fn records_path(&self) -> PathBuf {
        self.root.join("records.json")
    }

    fn status_path(&self) -> PathBuf {
        self.root.join("status.json")
    }

    pub fn exists(&self) -> bool {
        self.records_path().is_file()
    }

    fn ensure_dirs(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).map_err(|e| {
            AppError::io("INDEX_WRITE_FAILED", "Failed to create vector store directory", &self.root, e)
        })
    }

    pub fn status(&self) -> Result<VectorStoreStatus, AppError> {
        let path = self.status_path();
        if !path.exists() {
            return Ok(VectorStoreStatus::empty());
        }
        read_json(&path, "vector store status")
    }

    fn read_records(&self) -> Result<BTreeMap<String, StoredRecord>, AppError> {
        let path = self.records_path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        read_json(&path, "vector store records")
    }

    /// Make the store hold exactly `passages`, embedding only content it has not seen.
    ///
    /// Re-running with the same passages performs no embedding calls and leaves the store unchanged
    /// apart from `updated_at`. A model change re-embeds everything. Nothing is written unless
    /// every embedding succeeds.
    pub fn sync(&mut self, passages: &[Passage], updated_at: &str) -> Result<VectorStoreStatus, AppError> {
        self.ensure_dirs()?;

        let current = self.status()?;
        let compatible = current.ready && current.model.as_deref() == Some(self.model.as_str());
        let mut records = if compatible {
            self.read_records()?
        } else {
            BTreeMap::new()
        };

        let wanted: BTreeMap<String, &Passage> =
            passages.iter().map(|p| (passage_id(p), p)).collect();
        records.retain(|id, _| wanted.contains_key(id));

        let mut dims = if compatible { current.dims } else { None };
        let mut embedded = 0usize;
        for (id, passage) in &wanted {
            if records.contains_key(id) {
                continue;
            }
            let v = self.embedder.embed(&self.model, &passage.content).map_err(|e| {
                AppError::new("AI_EMBEDDINGS_FAILED", "Failed to compute embeddings")
                    .with_details(format!("source={}; tag={}; err={}", passage.source, passage.article_tag, e))
                    .with_retryable(e.retryable)
            })?;
            let this_dims = v.len() as u32;
            match dims {
                Some(d) if d != this_dims => {
                    return Err(AppError::new(
                        "INDEX_WRITE_FAILED",
                        "Embedding dimension mismatch across passages",
                    )
                    .with_details(format!("expected={d}; got={this_dims}; id={id}")));
                }
                Some(_) => {}
                None => dims = Some(this_dims),
            }
            records.insert(
                id.clone(),
                StoredRecord {
                    passage: (*passage).clone(),
                    embedding: v,
                },
            );
            embedded += 1;
        }

        write_json_atomic(&self.records_path(), &records, "vector store records")?;
        let status = VectorStoreStatus {
            ready: true,
            model: Some(self.model.clone()),
            dims,
            record_count: records.len() as u32,
            updated_at: Some(updated_at.to_string()),
        };
        write_json_atomic(&self.status_path(), &status, "vector store status")?;
        self.cache = OnceLock::new();

        info!(
            root = %self.root.display(),
            records = records.len(),
            embedded,
            "vector store synced"
        );
        Ok(status)
    }

    /// Delete every record and the status file.
    pub fn reset(&mut self) -> Result<(), AppError> {
        for path in [self.records_path(), self.status_path()] {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    AppError::io("INDEX_WRITE_FAILED", "Failed to remove vector store file", &path, e)
                })?;
            }
        }
        self.cache = OnceLock::new();
        Ok(())
    }

    fn entries(&self) -> Result<Arc<Vec<Entry>>, AppError> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached.clone());
        }
        let entries: Vec<Entry> = self
            .read_records()?
            .into_values()
            .map(|r| Entry {
                norm: l2_norm(&r.embedding),
                passage: r.passage,
                embedding: r.embedding,
            })
            .collect();
        debug!(root = %self.root.display(), records = entries.len(), "vector store loaded");
        // A concurrent loader may have won; either copy is equivalent.
        let _ = self.cache.set(Arc::new(entries));
        Ok(self.cache.get().cloned().unwrap_or_default())
    }

    fn embed_query(&self, query: &str, entries: &[Entry]) -> Result<Vec<f32>, AppError> {
        let v = self.embedder.embed(&self.model, query)?;
        if let Some(first) = entries.first() {
            if first.embedding.len() != v.len() {
                return Err(AppError::new(
                    "INDEX_READ_FAILED",
                    "Query embedding dimension does not match the store",
                )
                .with_details(format!("store={}; query={}", first.embedding.len(), v.len())));
            }
        }
        Ok(v)
    }

    /// Indices of the `k` entries closest to `query`, highest similarity first.
    fn nearest(&self, query: &[f32], entries: &[Entry], k: usize, source: Option<&str>) -> Vec<usize> {
        let q_norm = l2_norm(query);
        let mut scored: Vec<(usize, f32)> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| source.map_or(true, |s| e.passage.source == s))
            .map(|(i, e)| (i, cosine_similarity(query, &e.embedding, q_norm, e.norm)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        scored.into_iter().map(|(i, _)| i).collect()
    }
}

impl VectorStore for FileVectorStore {
    fn similarity_search(
        &self,
        query: &str,
        k: usize,
        source: Option<&str>,
    ) -> Result<Vec<Passage>, AppError> {
        let entries = self.entries()?;
        if entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let q = self.embed_query(query, &entries)?;
        Ok(self
            .nearest(&q, &entries, k, source)
            .into_iter()
            .map(|i| entries[i].passage.clone())
            .collect())
    }

    fn max_marginal_relevance_search(
        &self,
        query: &str,
        k: usize,
        fetch_k: usize,
        lambda: f32,
    ) -> Result<Vec<Passage>, AppError> {
        let entries = self.entries()?;
        if entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let q = self.embed_query(query, &entries)?;
        let pool = self.nearest(&q, &entries, fetch_k.max(k), None);
        let vectors: Vec<&[f32]> = pool.iter().map(|&i| entries[i].embedding.as_slice()).collect();
        Ok(mmr_select(&q, &vectors, k, lambda)
            .into_iter()
            .map(|j| entries[pool[j]].passage.clone())
            .collect())
    }

    fn sources(&self) -> Result<Vec<String>, AppError> {
        let entries = self.entries()?;
        let set: BTreeSet<&str> = entries.iter().map(|e| e.passage.source.as_str()).collect();
        Ok(set.into_iter().map(str::to_string).collect())
    }

    fn len(&self) -> Result<usize, AppError> {
        Ok(self.entries()?.len())
    }
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T, AppError> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::io("INDEX_READ_FAILED", format!("Failed to read {what}"), path, e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::io("INDEX_READ_FAILED", format!("Failed to decode {what}"), path, e))
}

pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::io("INDEX_WRITE_FAILED", "Failed to create index directory", parent, e)
        })?;
    }
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_vec(value).map_err(|e| {
        AppError::new("INDEX_WRITE_FAILED", format!("Failed to encode {what}")).with_details(e.to_string())
    })?;
    fs::write(&tmp, &json)
        .map_err(|e| AppError::io("INDEX_WRITE_FAILED", format!("Failed to write {what}"), &tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        AppError::new("INDEX_WRITE_FAILED", format!("Failed to finalize {what} write"))
            .with_details(format!("tmp={}; dest={}; err={}", tmp.display(), path.display(), e))
    })
}
