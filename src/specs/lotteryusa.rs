// src/specs/lotteryusa.rs
//! Aggregator pages anchored on the phrase "Winning Numbers for".
//!
//! Flattened, the latest draw reads like
//! `Winning Numbers for Mon, Jan 5, 2026 04 18 24 51 56 14 ...`.
//! We take the segment after the first anchor, read a leading date if there
//! is one, then two-digit tokens *after* that date (so `2026` and `5` can't
//! leak in), keep at least three, and cut to main + special balls.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::fields::{parse_calendar_date, TokenPattern, MONTH_NAME, US_NUMERIC, WEEKDAY_MONTH_NAME};
use crate::core::{html, Fetch};
use crate::error::ExtractError;
use crate::model::{DrawResult, Jackpot, LotteryMeta, NATIONAL};

use super::anchor::{accept_tokens, segment_after, TokenRule};
use super::Extractor;

pub const ANCHOR: &str = "Winning Numbers for";
const DATE_FORMATS: [&str; 3] = [US_NUMERIC, WEEKDAY_MONTH_NAME, MONTH_NAME];

static LEADING_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{2}/\d{2}/\d{4}|(?:[A-Za-z]{3,9},?\s+)?[A-Za-z]{3,9}\.?\s+\d{1,2},\s*\d{4})")
        .expect("static date pattern")
});

/// One lottery on one aggregator page.
pub struct PhraseAnchored {
    meta: LotteryMeta,
    url: String,
    /// main balls + special ball(s)
    count: usize,
}

impl PhraseAnchored {
    pub fn new(meta: LotteryMeta, url: &str, count: usize) -> Self {
        Self { meta, url: s!(url), count }
    }

    pub fn powerball() -> Self {
        Self::new(super::powerball::META, "https://www.lotteryusa.com/powerball/", 6)
    }

    pub fn megamillions() -> Self {
        Self::new(super::megamillions::META, "https://www.lotteryusa.com/mega-millions/", 6)
    }

    pub fn cash4life() -> Self {
        let meta = LotteryMeta { id: "cash4life", country: "US", region: NATIONAL, name: "Cash4Life", currency: "USD" };
        Self::new(meta, "https://www.lotteryusa.com/cash4life/", 6)
    }

    pub fn lotto_america() -> Self {
        let meta = LotteryMeta { id: "lotto_america", country: "US", region: NATIONAL, name: "Lotto America", currency: "USD" };
        Self::new(meta, "https://www.lotteryusa.com/lotto-america/", 6)
    }

    pub fn count(&self) -> usize { self.count }
}

impl Extractor for PhraseAnchored {
    fn meta(&self) -> &LotteryMeta { &self.meta }
    fn source_url(&self) -> &str { &self.url }

    fn extract(&self, http: &dyn Fetch) -> Result<DrawResult, ExtractError> {
        let body = http.get_text(&self.url)?;
        let text = html::document_text(&body);
        parse_text(&text, &self.meta, self.count, &self.url)
    }
}

/// Split out for unit tests.
pub fn parse_text(text: &str, meta: &LotteryMeta, count: usize, source: &str) -> Result<DrawResult, ExtractError> {
    let rule = TokenRule::new(TokenPattern::TwoDigit, Some(count));
    let segment = segment_after(text, ANCHOR, rule.window)
        .ok_or_else(|| ExtractError::missing(format!("'{ANCHOR}'")))?;

    let (draw_date, numbers_text) = match LEADING_DATE_RE.captures(segment) {
        Some(caps) => {
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            (parse_calendar_date(&caps[1], &DATE_FORMATS), &segment[end..])
        }
        None => (None, segment),
    };

    let numbers = accept_tokens(numbers_text, ANCHOR, &rule)?
        .iter()
        .map(|t| t.parse::<u32>().map_err(|_| ExtractError::parse("ball", t.as_str())))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = DrawResult::new(meta, source);
    out.draw_date = draw_date;
    out.numbers = numbers;
    out.jackpot = Some(Jackpot { amount: None, currency: s!(meta.currency) });
    Ok(out)
}
