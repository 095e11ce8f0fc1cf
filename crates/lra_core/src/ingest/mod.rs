use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;

/// Extension of extracted-text files in the corpus directory.
pub const TEXT_EXTENSION: &str = "txt";

/// Plain text of one source document, as produced by the external PDF extraction step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceDocument {
    /// Document identifier used in passage headers and source filters, e.g. `KVKK_Kanunu.pdf`.
    pub source: String,
    pub text: String,
}

impl SourceDocument {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Source name for a corpus file: the file name without its `.txt` suffix.
///
/// `KVKK_Kanunu.pdf.txt` becomes `KVKK_Kanunu.pdf`, so extracted text keeps the original
/// document name the analyzer will be asked to echo.
pub fn source_name_for(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(&format!(".{TEXT_EXTENSION}"))?;
    if stem.trim().is_empty() {
        return None;
    }
    Some(stem.to_string())
}

/// Read every `*.txt` document in `data_dir`, sorted by source name.
///
/// Unreadable or empty files are skipped with a warning; a missing directory is an error.
pub fn read_corpus_dir(data_dir: &Path) -> Result<Vec<SourceDocument>, AppError> {
    let entries = fs::read_dir(data_dir).map_err(|e| {
        AppError::io("INGEST_DATA_DIR_MISSING", "Failed to read corpus directory", data_dir, e)
    })?;

    let mut docs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(source) = source_name_for(&path) else {
            continue;
        };
        match fs::read_to_string(&path) {
            Ok(text) if !text.trim().is_empty() => docs.push(SourceDocument::new(source, text)),
            Ok(_) => warn!(path = %path.display(), "skipping empty corpus document"),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable corpus document"),
        }
    }
    docs.sort_by(|a, b| a.source.cmp(&b.source));

    info!(dir = %data_dir.display(), documents = docs.len(), "corpus loaded");
    Ok(docs)
}
