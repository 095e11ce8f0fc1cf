use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use lra_core::domain::Passage;
use tracing::warn;

use super::lexical::LexicalIndex;
use super::vector::VectorStore;

/// Dense and sparse views over the same passage set.
///
/// Every search degrades to an empty result with a warning; store failures never reach callers.
pub struct DualIndex {
    dense: Arc<dyn VectorStore>,
    lexical_path: Option<PathBuf>,
    lexical: OnceLock<Arc<LexicalIndex>>,
}

impl DualIndex {
    /// The lexical artifact at `lexical_path` is loaded on first sparse search.
    pub fn new(dense: Arc<dyn VectorStore>, lexical_path: impl Into<PathBuf>) -> Self {
        Self {
            dense,
            lexical_path: Some(lexical_path.into()),
            lexical: OnceLock::new(),
        }
    }

    /// Use an already built lexical index.
    pub fn with_lexical(dense: Arc<dyn VectorStore>, lexical: LexicalIndex) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Arc::new(lexical));
        Self {
            dense,
            lexical_path: None,
            lexical: cell,
        }
    }

    /// Cached after the first successful load; a missing artifact is retried on the next call.
    fn lexical(&self) -> Option<Arc<LexicalIndex>> {
        if let Some(idx) = self.lexical.get() {
            return Some(idx.clone());
        }
        let path = self.lexical_path.as_ref()?;
        if !path.is_file() {
            warn!(path = %path.display(), "lexical index missing; sparse search disabled");
            return None;
        }
        match LexicalIndex::load(path) {
            Ok(idx) => {
                let _ = self.lexical.set(Arc::new(idx));
                self.lexical.get().cloned()
            }
            Err(e) => {
                warn!(error = %e, "lexical index unreadable; sparse search disabled");
                None
            }
        }
    }

    pub fn dense_search(&self, query: &str, k: usize, target: Option<&str>) -> Vec<Passage> {
        self.dense
            .similarity_search(query, k, target)
            .unwrap_or_else(|e| {
                warn!(error = %e, "dense search failed");
                Vec::new()
            })
    }

    pub fn dense_diverse_search(&self, query: &str, k: usize, fetch_k: usize, lambda: f32) -> Vec<Passage> {
        self.dense
            .max_marginal_relevance_search(query, k, fetch_k, lambda)
            .unwrap_or_else(|e| {
                warn!(error = %e, "dense diverse search failed");
                Vec::new()
            })
    }

    /// BM25 top-`k`, then the target filter; a filtered result may hold fewer than `k`.
    pub fn sparse_search(&self, query: &str, k: usize, target: Option<&str>) -> Vec<Passage> {
        let Some(idx) = self.lexical() else {
            return Vec::new();
        };
        let mut hits = idx.search(query, k);
        if let Some(t) = target {
            hits.retain(|p| p.source == t);
        }
        hits
    }

    /// Union of sources known to either store, sorted.
    pub fn available_sources(&self) -> Vec<String> {
        let mut set: BTreeSet<String> = self
            .dense
            .sources()
            .unwrap_or_else(|e| {
                warn!(error = %e, "dense store sources unavailable");
                Vec::new()
            })
            .into_iter()
            .collect();
        if let Some(idx) = self.lexical() {
            set.extend(idx.sources());
        }
        set.into_iter().collect()
    }
}
