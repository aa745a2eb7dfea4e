// src/specs/anchor.rs
// Label-anchored token matching over flattened page text.
//
// The page is split on a literal label (a game's display name, or a phrase
// like "Winning Numbers for"); only the text right after the *first*
// occurrence is considered, bounded to a window so a miss can't wander into
// unrelated numeric content further down the page.

use crate::config::consts::{LABEL_WINDOW_CHARS, MIN_TOKENS};
use crate::core::fields::{extract_digit_tokens, TokenPattern};
use crate::error::ExtractError;

/// Text following the first occurrence of `label`, at most `window` chars.
/// Case-sensitive on purpose: labels are display names copied from the source.
pub fn segment_after<'a>(text: &'a str, label: &str, window: usize) -> Option<&'a str> {
    let (_, rest) = text.split_once(label)?;
    let end = rest.char_indices().nth(window).map(|(i, _)| i).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Rules for accepting a label match.
#[derive(Clone, Copy, Debug)]
pub struct TokenRule {
    pub pattern: TokenPattern,
    /// Fewer tokens than this and the match is rejected.
    pub min: usize,
    /// Known number count for the game; extra tokens are dropped.
    pub expected: Option<usize>,
    pub window: usize,
}

impl TokenRule {
    pub fn new(pattern: TokenPattern, expected: Option<usize>) -> Self {
        Self { pattern, min: MIN_TOKENS, expected, window: LABEL_WINDOW_CHARS }
    }
}

/// Apply `rule` to an already located segment.
pub fn accept_tokens(segment: &str, anchor: &str, rule: &TokenRule) -> Result<Vec<String>, ExtractError> {
    fit_tokens(extract_digit_tokens(segment, rule.pattern), anchor, rule)
}

/// Threshold and count check on tokens found by any means.
/// A known count is a floor as well as a cap: a short run is never accepted.
pub fn fit_tokens(mut tokens: Vec<String>, anchor: &str, rule: &TokenRule) -> Result<Vec<String>, ExtractError> {
    let min = rule.expected.map_or(rule.min, |n| n.max(rule.min));
    if tokens.len() < min {
        return Err(ExtractError::TooFewTokens { anchor: s!(anchor), found: tokens.len(), min });
    }
    if let Some(n) = rule.expected {
        tokens.truncate(n);
    }
    Ok(tokens)
}

/// Locate `label` in `text` and return the accepted digit tokens after it.
pub fn tokens_after_label(text: &str, label: &str, rule: &TokenRule) -> Result<Vec<String>, ExtractError> {
    let segment = segment_after(text, label, rule.window)
        .ok_or_else(|| ExtractError::missing(format!("label '{label}'")))?;
    accept_tokens(segment, label, rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(expected: Option<usize>) -> TokenRule {
        TokenRule::new(TokenPattern::TwoDigit, expected)
    }

    #[test]
    fn only_text_after_first_label_counts() {
        // Advert numbers before the label are never seen.
        let text = "Win 10 20 30 40 today!\nQuiniela Leidsa\n07 21 88\nQuiniela Leidsa\n99 99 99";
        let toks = tokens_after_label(text, "Quiniela Leidsa", &rule(Some(3))).unwrap();
        assert_eq!(toks, vec!["07", "21", "88"]);
    }

    #[test]
    fn truncates_to_expected_count() {
        let text = "Loto Real 01 02 03 04 05 06 07 08";
        let toks = tokens_after_label(text, "Loto Real", &rule(Some(6))).unwrap();
        assert_eq!(toks.len(), 6);
        assert_eq!(toks.last().map(String::as_str), Some("06"));
    }

    #[test]
    fn rejects_below_minimum() {
        let err = tokens_after_label("Pega 3 Más 11 22", "Pega 3 Más", &rule(None)).unwrap_err();
        assert!(matches!(err, ExtractError::TooFewTokens { found: 2, min: 3, .. }));
    }

    #[test]
    fn known_count_is_a_floor() {
        let err = tokens_after_label("Powerball 04 18 24 end", "Powerball", &rule(Some(6))).unwrap_err();
        assert!(matches!(err, ExtractError::TooFewTokens { found: 3, min: 6, .. }));

        // Below the global threshold the threshold still wins.
        let short = TokenRule::new(TokenPattern::OneOrTwo, Some(2));
        let err = tokens_after_label("Pale 1", "Pale", &short).unwrap_err();
        assert!(matches!(err, ExtractError::TooFewTokens { min: 3, .. }));
    }

    #[test]
    fn missing_label_is_a_shape_error() {
        let err = tokens_after_label("nothing here 11 22 33", "Super Palé", &rule(None)).unwrap_err();
        assert!(matches!(err, ExtractError::Missing(_)));
    }

    #[test]
    fn window_bounds_the_segment() {
        let mut text = s!("Label");
        text.push_str(&" ".repeat(200));
        text.push_str("11 22 33");
        assert!(tokens_after_label(&text, "Label", &rule(None)).is_err());
        assert_eq!(segment_after("Labelé abc", "Label", 2), Some("é "));
    }
}
