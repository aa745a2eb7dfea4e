// src/specs/dominican.rs
//! Dominican Republic results from the loteriasdominicanas.com aggregator.
//!
//! Purpose:
//! - Every game on the home page is a `div.game-block` holding
//!   `.company-title` (or `.game-title`), `.session-date` and
//!   `.game-scores span.score`.
//! - Blocks with fewer than three scores are adverts or placeholders and are
//!   dropped.
//! - If the block layout is missing, fall back to label anchoring on the
//!   flattened page text (game title, then the numbers after it).
//!
//! The same page feeds the multi-tier dataset merge, see `dataset::collect_tokens`.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::config::consts::MIN_TOKENS;
use crate::core::fields::{parse_calendar_date, TokenPattern, DAY_FIRST_DASH, DAY_FIRST_SLASH};
use crate::core::html::{first_text, page_text, selector};
use crate::core::sanitize::title_key;
use crate::core::Fetch;
use crate::error::ExtractError;
use crate::model::{DrawResult, Jackpot, LotteryMeta, NATIONAL};

use super::anchor::{fit_tokens, tokens_after_label, TokenRule};
use super::Extractor;

pub const SOURCE_URL: &str = "https://loteriasdominicanas.com/";
const DATE_FORMATS: [&str; 2] = [DAY_FIRST_DASH, DAY_FIRST_SLASH];

static BLOCK: LazyLock<Selector> = LazyLock::new(|| sel("div.game-block"));
static GAME_TITLE: LazyLock<Selector> = LazyLock::new(|| sel(".game-title"));
static COMPANY_TITLE: LazyLock<Selector> = LazyLock::new(|| sel(".company-title"));
static SESSION_DATE: LazyLock<Selector> = LazyLock::new(|| sel(".session-date"));
static SCORE: LazyLock<Selector> = LazyLock::new(|| sel(".game-scores span.score"));

fn sel(css: &str) -> Selector {
    selector(css).expect("static selector")
}

/// One result block as it appears on the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameBlock {
    pub company: Option<String>,
    pub title: String,
    pub date_text: String,
    pub scores: Vec<String>,
}

/// All usable blocks, page order.
pub fn scan_blocks(doc: &Html) -> Vec<GameBlock> {
    let mut out = Vec::new();
    for block in doc.select(&BLOCK) {
        let company = first_text(block, &COMPANY_TITLE);
        let title = match first_text(block, &GAME_TITLE).or_else(|| company.clone()) {
            Some(t) => t,
            None => s!("Sin Nombre"),
        };
        let date_text = first_text(block, &SESSION_DATE).unwrap_or_default();
        let scores: Vec<String> = block
            .select(&SCORE)
            .map(crate::core::html::element_text)
            .filter(|s| !s.is_empty())
            .collect();

        if scores.len() < MIN_TOKENS {
            tracing::debug!("Dominican: skip block '{}' with {} scores", title, scores.len());
            continue;
        }
        out.push(GameBlock { company, title, date_text, scores });
    }
    out
}

/// One game (by display title) from the aggregator page.
pub struct DominicanGame {
    meta: LotteryMeta,
    title: &'static str,
    count: usize,
    url: String,
}

impl DominicanGame {
    pub fn new(meta: LotteryMeta, title: &'static str, count: usize) -> Self {
        Self { meta, title, count, url: s!(SOURCE_URL) }
    }

    pub fn quiniela_leidsa() -> Self {
        Self::new(dominican_meta("quiniela_leidsa", "Quiniela Leidsa"), "Quiniela Leidsa", 3)
    }

    pub fn quiniela_real() -> Self {
        Self::new(dominican_meta("quiniela_real", "Quiniela Real"), "Quiniela Real", 3)
    }

    pub fn quiniela_loteka() -> Self {
        Self::new(dominican_meta("quiniela_loteka", "Quiniela Loteka"), "Quiniela Loteka", 3)
    }
}

fn dominican_meta(id: &'static str, name: &'static str) -> LotteryMeta {
    LotteryMeta { id, country: "DO", region: NATIONAL, name, currency: "DOP" }
}

impl Extractor for DominicanGame {
    fn meta(&self) -> &LotteryMeta { &self.meta }
    fn source_url(&self) -> &str { &self.url }

    fn extract(&self, http: &dyn Fetch) -> Result<DrawResult, ExtractError> {
        let body = http.get_text(&self.url)?;
        parse_doc(&body, &self.meta, self.title, self.count, &self.url)
    }
}

/// Split out for unit tests.
pub fn parse_doc(
    body: &str,
    meta: &LotteryMeta,
    title: &str,
    count: usize,
    source: &str,
) -> Result<DrawResult, ExtractError> {
    let doc = Html::parse_document(body);
    let want = title_key(title);

    // 1) Block layout (preferred: scores are already split per ball).
    let (tokens, date_text) = match scan_blocks(&doc).into_iter().find(|b| title_key(&b.title) == want) {
        Some(block) => {
            let rule = TokenRule::new(TokenPattern::OneOrTwo, Some(count));
            (fit_tokens(block.scores, title, &rule)?, block.date_text)
        }
        // 2) Fallback: label anchoring over the flattened page.
        None => {
            tracing::debug!("Dominican: no block for '{}', falling back to page text", title);
            let rule = TokenRule::new(TokenPattern::OneOrTwo, Some(count));
            (tokens_after_label(&page_text(&doc), title, &rule)?, s!())
        }
    };

    let numbers = tokens
        .iter()
        .map(|t| t.parse::<u32>().map_err(|_| ExtractError::parse("score", t.as_str())))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = DrawResult::new(meta, source);
    out.numbers = numbers;
    out.draw_date = parse_calendar_date(&date_text, &DATE_FORMATS);
    out.jackpot = Some(Jackpot { amount: None, currency: s!(meta.currency) });
    Ok(out)
}
