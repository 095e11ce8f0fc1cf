//! Runtime configuration.
//!
//! Resolution order: built-in defaults, then an optional TOML file, then `LRA_*` environment
//! variables. Every section is `#[serde(default)]` so a partial file is valid.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const ENV_OLLAMA_URL: &str = "LRA_OLLAMA_URL";
pub const ENV_CHAT_MODEL: &str = "LRA_CHAT_MODEL";
pub const ENV_EMBED_MODEL: &str = "LRA_EMBED_MODEL";
pub const ENV_DATA_DIR: &str = "LRA_DATA_DIR";
pub const ENV_INDEX_DIR: &str = "LRA_INDEX_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub ollama: OllamaConfig,
    pub paths: PathsConfig,
    pub retrieval: RetrievalConfig,
    pub segmenter: SegmenterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    pub chat_model: String,
    pub embed_model: String,
    /// Upper bound for a single completion call.
    pub completion_timeout_secs: u64,
    /// Upper bound for a single embedding call.
    pub embed_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".to_string(),
            chat_model: "gemma3:12b".to_string(),
            embed_model: "paraphrase-multilingual".to_string(),
            completion_timeout_secs: 60,
            embed_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Extracted plain-text documents (`*.txt`), one per source.
    pub data_dir: PathBuf,
    /// Root for the passage store, the summary store and the lexical artifact.
    pub index_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            index_dir: PathBuf::from("./index"),
        }
    }
}

impl PathsConfig {
    pub fn passages_dir(&self) -> PathBuf {
        self.index_dir.join("passages")
    }

    pub fn summaries_dir(&self) -> PathBuf {
        self.index_dir.join("summaries")
    }

    pub fn lexical_artifact(&self) -> PathBuf {
        self.index_dir.join("lexical_index.json")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    pub point_dense_k: usize,
    pub point_sparse_k: usize,
    pub point_top_k: usize,
    pub broad_dense_k: usize,
    pub broad_fetch_k: usize,
    pub broad_diversity: f32,
    pub broad_sparse_k: usize,
    pub broad_per_source: usize,
    pub broad_top_k: usize,
    pub overview_top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            point_dense_k: 10,
            point_sparse_k: 10,
            point_top_k: 3,
            broad_dense_k: 20,
            broad_fetch_k: 30,
            broad_diversity: 0.5,
            broad_sparse_k: 10,
            broad_per_source: 3,
            broad_top_k: 6,
            overview_top_k: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmenterConfig {
    pub window_chars: usize,
    pub overlap_chars: usize,
    /// Trimmed segments shorter than this are page numbers or stray headers.
    pub min_segment_chars: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            window_chars: 1000,
            overlap_chars: 100,
            min_segment_chars: 20,
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, optional TOML file, environment overrides, validation.
    ///
    /// A missing file at an explicitly given path is an error; `None` means defaults only.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut cfg = match path {
            Some(p) => Self::from_toml_file(p)?,
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::io("CONFIG_READ_FAILED", "Failed to read config file", path, e)
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, AppError> {
        toml::from_str(raw).map_err(|e| {
            AppError::new("CONFIG_INVALID", "Failed to parse config TOML").with_details(e.to_string())
        })
    }

    /// Apply `LRA_*` overrides using `lookup` (injected so tests need not touch process env).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup(ENV_OLLAMA_URL) {
            self.ollama.base_url = v;
        }
        if let Some(v) = lookup(ENV_CHAT_MODEL) {
            self.ollama.chat_model = v;
        }
        if let Some(v) = lookup(ENV_EMBED_MODEL) {
            self.ollama.embed_model = v;
        }
        if let Some(v) = lookup(ENV_DATA_DIR) {
            self.paths.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_INDEX_DIR) {
            self.paths.index_dir = PathBuf::from(v);
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.ollama.chat_model.trim().is_empty() || self.ollama.embed_model.trim().is_empty() {
            return Err(AppError::new("CONFIG_INVALID", "Model names must not be empty"));
        }
        if self.ollama.completion_timeout_secs == 0 || self.ollama.embed_timeout_secs == 0 {
            return Err(AppError::new("CONFIG_INVALID", "Timeouts must be positive"));
        }

        let r = &self.retrieval;
        if r.point_top_k == 0 || r.broad_top_k == 0 || r.broad_per_source == 0 {
            return Err(AppError::new("CONFIG_INVALID", "Top-k values must be positive"));
        }
        if r.broad_fetch_k < r.broad_dense_k {
            return Err(AppError::new(
                "CONFIG_INVALID",
                "broad_fetch_k must be at least broad_dense_k",
            )
            .with_details(format!(
                "broad_fetch_k={}; broad_dense_k={}",
                r.broad_fetch_k, r.broad_dense_k
            )));
        }
        if !(0.0..=1.0).contains(&r.broad_diversity) {
            return Err(AppError::new("CONFIG_INVALID", "broad_diversity must be within [0, 1]")
                .with_details(format!("broad_diversity={}", r.broad_diversity)));
        }

        let s = &self.segmenter;
        if s.window_chars == 0 || s.overlap_chars >= s.window_chars {
            return Err(AppError::new(
                "CONFIG_INVALID",
                "Segment overlap must be smaller than the window",
            )
            .with_details(format!(
                "window_chars={}; overlap_chars={}",
                s.window_chars, s.overlap_chars
            )));
        }
        Ok(())
    }
}
