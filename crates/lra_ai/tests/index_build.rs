mod common;

use std::sync::Arc;

use lra_ai::index::{FileVectorStore, VectorStore};
use lra_core::segment::segment;

use common::*;

#[test]
fn sync_embeds_only_new_content() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(HashEmbedder::new());
    let mut store = FileVectorStore::open(dir.path(), embedder.clone(), "hash");

    let passages = corpus();
    let st = store.sync(&passages, "2026-01-01T00:00:00Z").unwrap();
    assert!(st.ready);
    assert_eq!(st.record_count as usize, passages.len());
    assert_eq!(st.dims, Some(64));
    assert_eq!(embedder.call_count(), passages.len());

    // Same passages again: nothing to embed.
    let st2 = store.sync(&passages, "2026-01-02T00:00:00Z").unwrap();
    assert_eq!(st2.record_count, st.record_count);
    assert_eq!(embedder.call_count(), passages.len());

    // One changed document: only its new passages are embedded, stale ones are dropped.
    let edited = KVKK_TEXT.replace("işlenemez", "işlenemez ve aktarılamaz");
    let mut changed = segment(&edited, KVKK);
    changed.extend(segment(YONETMELIK_TEXT, YONETMELIK));
    let st3 = store.sync(&changed, "2026-01-03T00:00:00Z").unwrap();
    assert_eq!(st3.record_count as usize, changed.len());
    assert_eq!(embedder.call_count(), passages.len() + 1);
    assert_eq!(store.len().unwrap(), changed.len());
}

#[test]
fn model_change_reembeds_everything() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(HashEmbedder::new());
    let passages = corpus();

    let mut a = FileVectorStore::open(dir.path(), embedder.clone(), "model-a");
    a.sync(&passages, "2026-01-01T00:00:00Z").unwrap();
    let mut b = FileVectorStore::open(dir.path(), embedder.clone(), "model-b");
    let st = b.sync(&passages, "2026-01-01T00:00:00Z").unwrap();

    assert_eq!(st.model.as_deref(), Some("model-b"));
    assert_eq!(embedder.call_count(), passages.len() * 2);
}

#[test]
fn reset_clears_records() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(HashEmbedder::new());
    let mut store = FileVectorStore::open(dir.path(), embedder, "hash");
    store.sync(&corpus(), "2026-01-01T00:00:00Z").unwrap();
    assert!(store.exists());

    store.reset().unwrap();
    assert!(!store.exists());
    assert!(store.is_empty().unwrap());
    assert!(!store.status().unwrap().ready);
}

#[test]
fn sources_and_filtered_search() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(HashEmbedder::new());
    let mut store = FileVectorStore::open(dir.path(), embedder, "hash");
    store.sync(&corpus(), "2026-01-01T00:00:00Z").unwrap();

    assert_eq!(store.sources().unwrap(), vec![KVKK.to_string(), YONETMELIK.to_string()]);
    let hits = store.similarity_search("imha süresi", 10, Some(YONETMELIK)).unwrap();
    assert_eq!(hits.len(), 4);
    assert!(hits.iter().all(|p| p.source == YONETMELIK));

    let diverse = store.max_marginal_relevance_search("kişisel veriler", 3, 8, 0.5).unwrap();
    assert_eq!(diverse.len(), 3);
}

#[test]
fn ingest_builds_dense_store_and_lexical_artifact() {
    use lra_ai::index::LexicalIndex;
    use lra_ai::ingest::ingest_corpus;
    use lra_core::config::AppConfig;

    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join(format!("{KVKK}.txt")), KVKK_TEXT).unwrap();
    std::fs::write(data.join(format!("{YONETMELIK}.txt")), YONETMELIK_TEXT).unwrap();

    let mut cfg = AppConfig::default();
    cfg.paths.data_dir = data;
    cfg.paths.index_dir = dir.path().join("index");

    let embedder = Arc::new(HashEmbedder::new());
    let report = ingest_corpus(&cfg, embedder.clone(), false).unwrap();
    assert_eq!(report.documents, 2);
    assert_eq!(report.passages, corpus().len());
    assert_eq!(report.fallback_passages, 0);
    assert_eq!(report.dense.record_count as usize, report.passages);

    let lexical = LexicalIndex::load(&cfg.paths.lexical_artifact()).unwrap();
    assert_eq!(lexical.len(), report.passages);

    // Re-ingesting unchanged text embeds nothing new.
    ingest_corpus(&cfg, embedder.clone(), false).unwrap();
    assert_eq!(embedder.call_count(), report.passages);

    // Reset forces a full rebuild.
    ingest_corpus(&cfg, embedder.clone(), true).unwrap();
    assert_eq!(embedder.call_count(), report.passages * 2);
}
