use std::collections::HashMap;

use lra_core::domain::Passage;

/// Deduplicate by exact content.
///
/// Order follows the first occurrence of each content; when a content repeats, the later
/// passage replaces the earlier one in that slot.
pub fn dedup_by_content(passages: impl IntoIterator<Item = Passage>) -> Vec<Passage> {
    let mut out: Vec<Passage> = Vec::new();
    let mut slot: HashMap<String, usize> = HashMap::new();
    for p in passages {
        match slot.get(&p.content) {
            Some(&i) => out[i] = p,
            None => {
                slot.insert(p.content.clone(), out.len());
                out.push(p);
            }
        }
    }
    out
}

/// Interleave passages across sources, taking at most `per_source` from each.
///
/// Sources are visited in order of first appearance; round `r` takes the `r`-th passage of every
/// source that still has one.
pub fn round_robin_by_source(passages: Vec<Passage>, per_source: usize) -> Vec<Passage> {
    let mut groups: Vec<(String, Vec<Passage>)> = Vec::new();
    for p in passages {
        match groups.iter_mut().find(|(s, _)| *s == p.source) {
            Some((_, g)) => g.push(p),
            None => groups.push((p.source.clone(), vec![p])),
        }
    }

    let mut iters: Vec<_> = groups
        .into_iter()
        .map(|(_, g)| g.into_iter().take(per_source))
        .collect();
    let mut out = Vec::new();
    loop {
        let before = out.len();
        for it in iters.iter_mut() {
            if let Some(p) = it.next() {
                out.push(p);
            }
        }
        if out.len() == before {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lra_core::domain::SplitMethod;
    use pretty_assertions::assert_eq;

    fn p(source: &str, tag: &str) -> Passage {
        Passage::new(source, tag, "body text long enough", SplitMethod::ArticleRegex)
    }

    fn tags(ps: &[Passage]) -> Vec<String> {
        ps.iter().map(|p| format!("{}:{}", p.source, p.article_tag)).collect()
    }

    #[test]
    fn dedup_keeps_first_order_and_last_value() {
        let mut later = p("a", "MADDE 1");
        later.split_method = SplitMethod::RecursiveFallback;
        let out = dedup_by_content(vec![p("a", "MADDE 1"), p("b", "MADDE 2"), later]);
        assert_eq!(tags(&out), vec!["a:MADDE 1", "b:MADDE 2"]);
        assert_eq!(out[0].split_method, SplitMethod::RecursiveFallback);
    }

    #[test]
    fn round_robin_interleaves_sources() {
        let input = vec![
            p("a", "1"),
            p("a", "2"),
            p("a", "3"),
            p("a", "4"),
            p("b", "1"),
            p("c", "1"),
            p("c", "2"),
        ];
        let out = round_robin_by_source(input, 3);
        assert_eq!(
            tags(&out),
            vec!["a:1", "b:1", "c:1", "a:2", "c:2", "a:3"]
        );
    }
}
