//! Document segmentation into retrievable passages.
//!
//! Legal texts are split on structural article markers (`MADDE 5`, `ARTICLE 12`) at line
//! starts, keeping each marker with the text that follows it. Documents with fewer than two
//! markers fall back to overlapping character windows.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::config::SegmenterConfig;
use crate::domain::{Passage, SplitMethod, INTRODUCTORY_TAG};

mod window;

pub use window::split_windows;

static ARTICLE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*((?:MADDE|ARTICLE)[ \t]+\d+)").unwrap()
});

/// Segment with the default window/overlap/noise settings.
pub fn segment(raw_text: &str, source: &str) -> Vec<Passage> {
    segment_with(raw_text, source, &SegmenterConfig::default())
}

pub fn segment_with(raw_text: &str, source: &str, cfg: &SegmenterConfig) -> Vec<Passage> {
    let text = normalize_newlines(raw_text);

    let marker_starts: Vec<usize> = ARTICLE_MARKER.find_iter(&text).map(|m| m.start()).collect();
    if marker_starts.len() < 2 {
        debug!(source, markers = marker_starts.len(), "no article structure, using windows");
        return split_windows(&text, cfg.window_chars, cfg.overlap_chars)
            .iter()
            .filter_map(|w| build_passage(source, w, SplitMethod::RecursiveFallback, cfg))
            .collect();
    }

    // Lookahead-style split: cut right before every marker, never drop the marker itself.
    let mut bounds = Vec::with_capacity(marker_starts.len() + 2);
    bounds.push(0);
    bounds.extend(marker_starts.into_iter().filter(|&s| s > 0));
    bounds.push(text.len());

    let passages: Vec<Passage> = bounds
        .windows(2)
        .filter_map(|w| build_passage(source, &text[w[0]..w[1]], SplitMethod::ArticleRegex, cfg))
        .collect();

    info!(source, passages = passages.len(), "segmented by article markers");
    passages
}

/// First structural marker inside `text`, e.g. `MADDE 5`.
pub fn first_article_marker(text: &str) -> Option<&str> {
    ARTICLE_MARKER
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn build_passage(
    source: &str,
    raw_segment: &str,
    split_method: SplitMethod,
    cfg: &SegmenterConfig,
) -> Option<Passage> {
    let body = raw_segment.trim();
    if body.chars().count() < cfg.min_segment_chars {
        return None;
    }
    let tag = first_article_marker(body).unwrap_or(INTRODUCTORY_TAG);
    Some(Passage::new(source, tag, body, split_method))
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
