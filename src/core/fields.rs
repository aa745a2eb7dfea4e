// src/core/fields.rs
//! Field parsers: raw text fragment → typed value.
//!
//! All of these are total. They never panic and never return an error;
//! "nothing usable here" is `None` or an empty `Vec`, and callers decide
//! whether that is fatal for their source.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/* ---------------- money ---------------- */

static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$?\s*(\d[\d,]*(?:\.\d+)?)\s*(million|billion)?").expect("static money pattern")
});

/// `"$1.2 Billion"` → `1_200_000_000`, `"$86 Million"` → `86_000_000`,
/// `"$1,250,000"` → `1_250_000`, `"garbage"` → `None`.
///
/// Scaling is done on the decimal digits, not through a float, so
/// `"$1.2 Billion"` is exact. Fraction digits beyond the unit's precision
/// (and any fraction on a bare amount) are truncated.
pub fn parse_money_to_integer(text: &str) -> Option<u64> {
    let caps = MONEY_RE.captures(text.trim())?;
    let literal = caps[1].replace(',', "");

    let scale_digits: u32 = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(u) if u == "billion" => 9,
        Some(u) if u == "million" => 6,
        _ => 0,
    };

    let (whole, frac) = literal.split_once('.').unwrap_or((literal.as_str(), ""));
    let whole: u64 = whole.parse().ok()?;
    let mut amount = whole.checked_mul(10u64.pow(scale_digits))?;

    let frac: String = frac.chars().take(scale_digits as usize).collect();
    if !frac.is_empty() {
        let pad = scale_digits - frac.len() as u32;
        let f: u64 = frac.parse().ok()?;
        amount = amount.checked_add(f.checked_mul(10u64.pow(pad))?)?;
    }
    Some(amount)
}

/* ---------------- dates ---------------- */

/// `01/05/2026`
pub const US_NUMERIC: &str = "%m/%d/%Y";
/// `Mon, Jan 5, 2026` (chrono also accepts long weekday/month names here)
pub const WEEKDAY_MONTH_NAME: &str = "%a, %b %d, %Y";
/// `Jan 5, 2026`
pub const MONTH_NAME: &str = "%b %d, %Y";
/// `2026-01-05`, also with a trailing `T00:00:00`
pub const ISO: &str = "%Y-%m-%d";
/// `05-01-2026`
pub const DAY_FIRST_DASH: &str = "%d-%m-%Y";
/// `05/01/2026`
pub const DAY_FIRST_SLASH: &str = "%d/%m/%Y";

/// Try each format in order; first hit wins.
///
/// Abbreviation periods (`Jan.`) are dropped and whitespace is collapsed
/// before parsing. A remainder is only tolerated when it is a time part
/// (`T...`) or separated by whitespace.
pub fn parse_calendar_date(text: &str, formats: &[&str]) -> Option<NaiveDate> {
    let cleaned = clean_date_text(text);
    if cleaned.is_empty() {
        return None;
    }
    for fmt in formats {
        if let Ok(d) = NaiveDate::parse_from_str(&cleaned, fmt) {
            return Some(d);
        }
        if let Ok((d, rest)) = NaiveDate::parse_and_remainder(&cleaned, fmt) {
            if rest.starts_with('T') || rest.starts_with(' ') {
                return Some(d);
            }
        }
    }
    None
}

fn clean_date_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for ch in text.trim().chars() {
        if ch == '.' && prev.is_some_and(|p| p.is_ascii_alphabetic()) {
            continue;
        }
        if ch.is_whitespace() {
            if prev != Some(' ') {
                out.push(' ');
            }
            prev = Some(' ');
            continue;
        }
        out.push(ch);
        prev = Some(ch);
    }
    out.trim().to_string()
}

/* ---------------- number sequences ---------------- */

/// Fixed-width digit group used to pull draw numbers out of running text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenPattern {
    /// exactly one digit (`PICK` games)
    Single,
    /// exactly two digits (`04 18 24`)
    TwoDigit,
    /// one or two digits (`4 18 24`)
    OneOrTwo,
    /// exactly four digits
    FourDigit,
}

static SINGLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d\b").expect("static pattern"));
static TWO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{2}\b").expect("static pattern"));
static ONE_OR_TWO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{1,2}\b").expect("static pattern"));
static FOUR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{4}\b").expect("static pattern"));

impl TokenPattern {
    fn regex(self) -> &'static Regex {
        match self {
            TokenPattern::Single => &SINGLE_RE,
            TokenPattern::TwoDigit => &TWO_RE,
            TokenPattern::OneOrTwo => &ONE_OR_TWO_RE,
            TokenPattern::FourDigit => &FOUR_RE,
        }
    }
}

/// All non-overlapping matches, in order, as the digit strings found.
/// No dedup; callers truncate to the count they expect.
pub fn extract_digit_tokens(text: &str, pattern: TokenPattern) -> Vec<String> {
    pattern.regex().find_iter(text).map(|m| s!(m.as_str())).collect()
}

/// Same as [`extract_digit_tokens`], parsed: `"04 18"` → `[4, 18]`.
pub fn extract_integer_sequence(text: &str, pattern: TokenPattern) -> Vec<u32> {
    pattern
        .regex()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}
