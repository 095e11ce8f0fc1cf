use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(p) = stack.pop() {
        let Ok(entries) = fs::read_dir(&p) else {
            continue;
        };
        for ent in entries.flatten() {
            let path = ent.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

fn src_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src")
}

#[test]
fn only_the_dense_store_calls_the_embedding_service() {
    let root = src_root();
    let files = collect_rs_files(&root);
    assert!(!files.is_empty());

    for f in files {
        let rel = f.strip_prefix(&root).unwrap();
        if rel.starts_with("embeddings") || rel.starts_with("index") {
            continue;
        }
        let text = fs::read_to_string(&f).unwrap_or_default();
        assert!(!text.contains(".embed("), "embedding call outside the index in {}", f.display());
    }
}

#[test]
fn retrieval_never_calls_the_completion_service() {
    let root = src_root();
    for dir in ["index", "search", "rerank"] {
        for f in collect_rs_files(&root.join(dir)) {
            let text = fs::read_to_string(&f).unwrap_or_default();
            assert!(!text.contains("crate::llm"), "completion dependency in {}", f.display());
        }
    }
}
