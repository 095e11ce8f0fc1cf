#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lra_ai::embeddings::Embedder;
use lra_ai::index::lexical::tokenize;
use lra_ai::index::{DualIndex, FileVectorStore, LexicalIndex, VectorStore};
use lra_ai::llm::Llm;
use lra_ai::rerank::CrossEncoder;
use lra_core::domain::Passage;
use lra_core::error::AppError;
use lra_core::segment::segment;
use serde_json::Value;

pub const KVKK: &str = "KVKK_Kanunu.pdf";
pub const YONETMELIK: &str = "Silme_Yonetmeligi.pdf";

pub const KVKK_TEXT: &str = "KİŞİSEL VERİLERİN KORUNMASI KANUNU
Birinci Bölüm - Amaç, Kapsam ve Tanımlar
MADDE 1 - (1) Bu Kanunun amacı, kişisel verilerin işlenmesinde başta özel hayatın gizliliği olmak üzere kişilerin temel hak ve özgürlüklerini korumaktır.
MADDE 2 - (1) Bu Kanun hükümleri, kişisel verileri işlenen gerçek kişiler hakkında uygulanır.
MADDE 5 - (1) Kişisel veriler ilgili kişinin açık rızası olmaksızın işlenemez.
";

pub const YONETMELIK_TEXT: &str = "KİŞİSEL VERİLERİN SİLİNMESİ HAKKINDA YÖNETMELİK
MADDE 7 - (1) Veri sorumlusu, kişisel verileri silme ve yok etme yükümlülüğünü yerine getirir.
MADDE 8 - (1) Kişisel verilerin anonim hale getirilmesi, başka verilerle eşleştirilse dahi kimliğin belirlenemeyeceği hale getirilmesidir.
MADDE 9 - (1) Veri sorumlusu periyodik imha süresini kayıt altına alır.
";

/// Bag-of-words embedding hashed into a fixed number of buckets.
pub struct HashEmbedder {
    calls: AtomicUsize,
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn bucket(token: &str) -> usize {
    // FNV-1a
    let mut h: u64 = 0xcbf29ce484222325;
    for b in token.bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    (h % 64) as usize
}

impl Embedder for HashEmbedder {
    fn embed(&self, _model: &str, input: &str) -> Result<Vec<f32>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut v = vec![0.0f32; 64];
        for t in tokenize(input) {
            v[bucket(&t)] += 1.0;
        }
        Ok(v)
    }
}

/// Scores a document by how many distinct query terms it contains.
pub struct OverlapEncoder;

impl CrossEncoder for OverlapEncoder {
    fn score(&self, query: &str, documents: &[&str]) -> Result<Vec<f32>, AppError> {
        let q: BTreeSet<String> = tokenize(query).into_iter().collect();
        Ok(documents
            .iter()
            .map(|d| {
                let terms: BTreeSet<String> = tokenize(d).into_iter().collect();
                q.intersection(&terms).count() as f32
            })
            .collect())
    }
}

/// Completion double: structured replies keyed by schema title, free text for everything else.
pub struct ScriptedLlm {
    pub route: Option<Value>,
    pub analysis: Option<Value>,
    pub answer: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(route: Option<Value>, analysis: Option<Value>, answer: &str) -> Self {
        Self {
            route,
            analysis,
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn record(&self, prompt: &str) {
        self.prompts.lock().unwrap().push(prompt.to_string());
    }
}

impl Llm for ScriptedLlm {
    fn generate(&self, _model: &str, prompt: &str) -> Result<String, AppError> {
        self.record(prompt);
        Ok(self.answer.clone())
    }

    fn generate_structured(&self, _model: &str, prompt: &str, schema: &Value) -> Result<Value, AppError> {
        self.record(prompt);
        let reply = match schema["title"].as_str() {
            Some("RouteDecision") => self.route.clone(),
            Some("AnalysisDecision") => self.analysis.clone(),
            _ => None,
        };
        reply.ok_or_else(|| AppError::new("AI_COMPLETION_FAILED", "scripted failure").with_retryable(true))
    }
}

pub fn corpus() -> Vec<Passage> {
    let mut out = segment(KVKK_TEXT, KVKK);
    out.extend(segment(YONETMELIK_TEXT, YONETMELIK));
    out
}

/// A dense store and lexical artifact under `root`, built from `passages`.
pub fn build_index(root: &Path, passages: &[Passage]) -> (Arc<DualIndex>, Arc<HashEmbedder>) {
    let embedder = Arc::new(HashEmbedder::new());
    let mut store = FileVectorStore::open(root.join("passages"), embedder.clone(), "hash");
    store.sync(passages, "2026-01-01T00:00:00Z").unwrap();

    let lexical_path = root.join("lexical_index.json");
    LexicalIndex::build(passages.to_vec()).save(&lexical_path).unwrap();

    let dense: Arc<dyn VectorStore> = Arc::new(store);
    (Arc::new(DualIndex::new(dense, lexical_path)), embedder)
}

pub fn tags(passages: &[Passage]) -> Vec<String> {
    passages
        .iter()
        .map(|p| format!("{}:{}", p.source, p.article_tag))
        .collect()
}
