use std::sync::Arc;

use lra_ai::rerank::{CrossEncoder, Reranker};
use lra_core::domain::{Passage, SplitMethod};
use lra_core::error::AppError;
use pretty_assertions::assert_eq;

struct FixedScores(Vec<f32>);

impl CrossEncoder for FixedScores {
    fn score(&self, _query: &str, _documents: &[&str]) -> Result<Vec<f32>, AppError> {
        Ok(self.0.clone())
    }
}

struct Failing;

impl CrossEncoder for Failing {
    fn score(&self, _query: &str, _documents: &[&str]) -> Result<Vec<f32>, AppError> {
        Err(AppError::new("AI_RERANKER_FAILED", "model crashed"))
    }
}

fn candidates(n: usize) -> Vec<Passage> {
    (1..=n)
        .map(|i| {
            Passage::new(
                "KVKK_Kanunu.pdf",
                &format!("MADDE {i}"),
                "madde gövdesi burada yer alır",
                SplitMethod::ArticleRegex,
            )
        })
        .collect()
}

fn tags(ps: &[Passage]) -> Vec<&str> {
    ps.iter().map(|p| p.article_tag.as_str()).collect()
}

#[test]
fn empty_input_yields_empty_output() {
    let r = Reranker::new(Arc::new(FixedScores(vec![])));
    assert!(r.rerank("q", Vec::new(), 3).is_empty());
    assert!(Reranker::passthrough().rerank("q", Vec::new(), 3).is_empty());
}

#[test]
fn sorts_by_score_and_keeps_input_order_on_ties() {
    let r = Reranker::new(Arc::new(FixedScores(vec![0.1, 0.9, 0.5, 0.9])));
    let out = r.rerank("q", candidates(4), 3);
    assert_eq!(tags(&out), vec!["MADDE 2", "MADDE 4", "MADDE 3"]);

    // Same input, same output.
    assert_eq!(r.rerank("q", candidates(4), 3), out);
}

#[test]
fn top_k_larger_than_input_returns_everything() {
    let r = Reranker::new(Arc::new(FixedScores(vec![0.2, 0.1])));
    assert_eq!(tags(&r.rerank("q", candidates(2), 6)), vec!["MADDE 1", "MADDE 2"]);
}

#[test]
fn falls_back_to_retrieval_order() {
    let expected = vec!["MADDE 1", "MADDE 2"];

    let missing = Reranker::passthrough();
    assert!(!missing.has_model());
    assert_eq!(tags(&missing.rerank("q", candidates(4), 2)), expected);

    let failing = Reranker::new(Arc::new(Failing));
    assert_eq!(tags(&failing.rerank("q", candidates(4), 2)), expected);

    let short = Reranker::new(Arc::new(FixedScores(vec![1.0])));
    assert_eq!(tags(&short.rerank("q", candidates(4), 2)), expected);
}
