pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity with precomputed norms. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32], a_norm: f32, b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (a_norm * b_norm)
}

/// Maximal marginal relevance selection.
///
/// Returns indices into `candidates`, at most `k`, in selection order. `lambda` weighs relevance
/// to the query (1.0) against dissimilarity to already selected items (0.0).
pub fn mmr_select(query: &[f32], candidates: &[&[f32]], k: usize, lambda: f32) -> Vec<usize> {
    if candidates.is_empty() || k == 0 {
        return Vec::new();
    }

    let q_norm = l2_norm(query);
    let norms: Vec<f32> = candidates.iter().map(|c| l2_norm(c)).collect();
    let relevance: Vec<f32> = candidates
        .iter()
        .zip(&norms)
        .map(|(c, n)| cosine_similarity(query, c, q_norm, *n))
        .collect();

    let mut selected: Vec<usize> = Vec::with_capacity(k.min(candidates.len()));
    // Highest similarity to any selected item, per candidate.
    let mut redundancy = vec![f32::NEG_INFINITY; candidates.len()];

    while selected.len() < k.min(candidates.len()) {
        let mut best: Option<(usize, f32)> = None;
        for i in 0..candidates.len() {
            if selected.contains(&i) {
                continue;
            }
            let penalty = if selected.is_empty() { 0.0 } else { redundancy[i] };
            let score = lambda * relevance[i] - (1.0 - lambda) * penalty;
            // Strict comparison keeps the earlier (more relevant) candidate on ties.
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        let Some((pick, _)) = best else { break };
        selected.push(pick);

        for i in 0..candidates.len() {
            let sim = cosine_similarity(candidates[i], candidates[pick], norms[i], norms[pick]);
            if sim > redundancy[i] {
                redundancy[i] = sim;
            }
        }
    }
    selected
}
