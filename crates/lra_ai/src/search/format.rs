use lra_core::domain::Passage;

pub const NO_RESULTS: &str = "No results found.";

pub fn source_not_found(source: &str) -> String {
    format!("No information was found in source '{source}'.")
}

/// Numbered context blocks, `label` being `RESULT` or `DOCUMENT`.
pub fn render_blocks(label: &str, passages: &[Passage]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "--- {label} {} (SOURCE: {} | {}) ---\n{}\n",
                i + 1,
                p.source,
                p.article_tag,
                p.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
