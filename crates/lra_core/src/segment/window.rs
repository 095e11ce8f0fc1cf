use std::collections::VecDeque;

/// Coarse-to-fine cut points: paragraph, line, sentence, word.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Split `text` into windows of at most `window` characters, consecutive windows sharing up to
/// `overlap` characters. Cuts prefer paragraph, then line, then sentence, then word boundaries,
/// and only split inside a word when nothing else fits.
pub fn split_windows(text: &str, window: usize, overlap: usize) -> Vec<String> {
    if text.trim().is_empty() || window == 0 {
        return Vec::new();
    }
    let pieces = split_pieces(text, &SEPARATORS, window);
    merge_pieces(&pieces, window, overlap)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn split_pieces(text: &str, separators: &[&str], window: usize) -> Vec<String> {
    if char_len(text) <= window {
        return vec![text.to_string()];
    }
    let Some(pos) = separators.iter().position(|sep| text.contains(sep)) else {
        return hard_split(text, window);
    };
    let finer = &separators[pos + 1..];

    let mut out = Vec::new();
    // split_inclusive keeps the separator on each piece so concatenation restores the text.
    for part in text.split_inclusive(separators[pos]) {
        if char_len(part) <= window {
            out.push(part.to_string());
        } else {
            out.extend(split_pieces(part, finer, window));
        }
    }
    out
}

fn hard_split(text: &str, window: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(window).map(|c| c.iter().collect()).collect()
}

fn merge_pieces(pieces: &[String], window: usize, overlap: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: VecDeque<&str> = VecDeque::new();
    let mut current_len = 0usize;

    for piece in pieces {
        let piece_len = char_len(piece);
        if current_len + piece_len > window && !current.is_empty() {
            out.push(current.iter().copied().collect::<String>());
            // Keep a tail of at most `overlap` chars that still leaves room for the new piece.
            while current_len > overlap || (current_len > 0 && current_len + piece_len > window) {
                match current.pop_front() {
                    Some(front) => current_len -= char_len(front),
                    None => break,
                }
            }
        }
        current.push_back(piece);
        current_len += piece_len;
    }
    if !current.is_empty() {
        out.push(current.iter().copied().collect::<String>());
    }
    out
}
