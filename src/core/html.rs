// src/core/html.rs
// DOM helpers over `scraper`. Tree construction is the crate's job;
// these only turn nodes into the flat text the specs match against.

use scraper::{ElementRef, Html, Selector};

use super::sanitize::normalize_ws;

/// Compile a CSS selector, `None` on a bad pattern.
pub fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Whole-document text: one line per non-empty text node, each line
/// whitespace-normalized. `<script>`/`<style>` bodies are skipped.
pub fn page_text(doc: &Html) -> String {
    let mut lines: Vec<String> = Vec::new();
    for node in doc.root_element().descendants() {
        let Some(text) = node.value().as_text() else { continue };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element())
            .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"));
        if hidden {
            continue;
        }
        let line = normalize_ws(text);
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// Parse a raw body and flatten it in one go.
pub fn document_text(body: &str) -> String {
    page_text(&Html::parse_document(body))
}

/// Visible text of one element, whitespace-normalized.
pub fn element_text(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<Vec<_>>().join(" "))
}

/// Text of the first descendant matching `sel`, if any and non-empty.
pub fn first_text(el: ElementRef<'_>, sel: &Selector) -> Option<String> {
    el.select(sel).next().map(element_text).filter(|t| !t.is_empty())
}
