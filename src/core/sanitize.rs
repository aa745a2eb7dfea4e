// src/core/sanitize.rs

/// Collapse runs of whitespace (including NBSP) into one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Comparison key for game titles: whitespace-normalized, ASCII case folded.
/// `"Quiniela  LEIDSA "` and `"quiniela leidsa"` share a key.
pub fn title_key(s: &str) -> String {
    normalize_ws(s).to_ascii_lowercase()
}
