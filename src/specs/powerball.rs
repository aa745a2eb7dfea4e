// src/specs/powerball.rs
//! Powerball from the Texas Lottery past-results page.
//!
//! The page is a plain results table; flattened to text, a row reads
//! `01/05/2026 4 - 18 - 24 - 51 - 56 14 2 $86 Million Roll`:
//! draw date, five white balls, Powerball, Power Play, estimated jackpot.
//! Rows are newest-first, so the first full match is the latest draw.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::fields::{parse_calendar_date, parse_money_to_integer, US_NUMERIC};
use crate::core::{html, Fetch};
use crate::error::ExtractError;
use crate::model::{DrawResult, Jackpot, LotteryMeta, Scalar, NATIONAL};

use super::Extractor;

pub const SOURCE_URL: &str = "https://www.texaslottery.com/export/sites/lottery/Games/Powerball/index.html";

pub const META: LotteryMeta = LotteryMeta {
    id: "powerball",
    country: "US",
    region: NATIONAL,
    name: "Powerball",
    currency: "USD",
};

static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(\d{2}/\d{2}/\d{4})\b\s+",
        r"(\d{1,2})\s*-\s*(\d{1,2})\s*-\s*(\d{1,2})\s*-\s*(\d{1,2})\s*-\s*(\d{1,2})\s+",
        r"(\d{1,2})\s+",
        r"(\d{1,2})\s+",
        r"(\$[0-9][\d.,]*\s*(?:Million|Billion)?)",
    ))
    .expect("static powerball row pattern")
});

pub struct TexasPowerball {
    url: String,
}

impl TexasPowerball {
    pub fn new() -> Self { Self { url: s!(SOURCE_URL) } }
}

impl Default for TexasPowerball {
    fn default() -> Self { Self::new() }
}

impl Extractor for TexasPowerball {
    fn meta(&self) -> &LotteryMeta { &META }
    fn source_url(&self) -> &str { &self.url }

    fn extract(&self, http: &dyn Fetch) -> Result<DrawResult, ExtractError> {
        let body = http.get_text(&self.url)?;
        let t = std::time::Instant::now();
        let out = parse_doc(&body, &self.url);
        tracing::debug!("Powerball: parse in {:?}", t.elapsed());
        out
    }
}

/// Split out for unit tests.
pub fn parse_doc(body: &str, source: &str) -> Result<DrawResult, ExtractError> {
    parse_text(&html::document_text(body), source)
}

/// Same, over already flattened page text.
pub fn parse_text(text: &str, source: &str) -> Result<DrawResult, ExtractError> {
    let caps = ROW_RE
        .captures(text)
        .ok_or_else(|| ExtractError::missing("Powerball results row"))?;

    let date_raw = &caps[1];
    let draw_date = parse_calendar_date(date_raw, &[US_NUMERIC])
        .ok_or_else(|| ExtractError::parse("draw date", date_raw))?;

    // 5 white balls + Powerball; the pattern only admits 1-2 digit groups
    let mut numbers = Vec::with_capacity(6);
    for i in 2..=7 {
        let n: u32 = caps[i].parse().map_err(|_| ExtractError::parse("ball", &caps[i]))?;
        numbers.push(n);
    }

    let mut out = DrawResult::new(&META, source);
    out.draw_date = Some(draw_date);
    out.numbers = numbers;
    out.extra.insert(s!("powerplay"), Scalar::from(&caps[8]));
    out.jackpot = Some(Jackpot {
        amount: parse_money_to_integer(&caps[9]),
        currency: s!(META.currency),
    });
    Ok(out)
}
