// src/dataset.rs
//
// Long-lived multi-game dataset: games grouped by category, each game holding
// an ordered list of draw tiers (time-of-day slots). Loaded once per run,
// merged in place with freshly collected tokens, rewritten wholesale.
//
// Fields the pipeline does not know about are carried through untouched.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
    sync::LazyLock,
};

use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::fields::TokenPattern;
use crate::core::html::page_text;
use crate::core::sanitize::{normalize_ws, title_key};
use crate::error::StoreError;
use crate::file::{read_json, write_json_atomic};
use crate::specs::anchor::{fit_tokens, tokens_after_label, TokenRule};
use crate::specs::dominican::scan_blocks;

/* ---------------- model ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawTier {
    #[serde(default)]
    pub numbers: Vec<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl DrawTier {
    pub fn with_numbers(numbers: Vec<String>) -> Self {
        Self { numbers, rest: Map::new() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetGame {
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(rename = "draws", default)]
    pub tiers: Vec<DrawTier>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl DatasetGame {
    /// Known number count: first non-empty tier, else `PICK<n>` in the name.
    pub fn expected_count(&self) -> Option<usize> {
        static PICK_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"(?i)\bPICK\s*(\d+)").expect("static regex"));

        self.tiers
            .iter()
            .map(|t| t.numbers.len())
            .find(|&n| n > 0)
            .or_else(|| {
                PICK_RE
                    .captures(&self.name)
                    .and_then(|c| c[1].parse::<usize>().ok())
                    .filter(|&n| n > 0)
            })
    }
}

/// `{ "<category>": [game, ...], ... }`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    pub categories: BTreeMap<String, Vec<DatasetGame>>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        write_json_atomic(path, self)
    }

    pub fn games(&self) -> impl Iterator<Item = &DatasetGame> {
        self.categories.values().flatten()
    }

    pub fn games_mut(&mut self) -> impl Iterator<Item = &mut DatasetGame> {
        self.categories.values_mut().flatten()
    }

    pub fn game_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

/* ---------------- merge ---------------- */

/// Which tiers a fresh observation lands in, keyed by the game's tier count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Single nightly draw: the only tier.
    Verbatim,
    /// One observed draw stands in for every tier.
    Mirror,
    /// Only these slots are observed; the others keep whatever they had.
    Slots(&'static [usize]),
    /// Unknown layout: tier 0 only.
    First,
}

const STRATEGIES: [(usize, MergeStrategy); 3] = [
    (1, MergeStrategy::Verbatim),
    (3, MergeStrategy::Mirror),
    (6, MergeStrategy::Slots(&[0, 3])),
];

impl MergeStrategy {
    pub fn for_tier_count(n: usize) -> Self {
        STRATEGIES
            .iter()
            .find(|(k, _)| *k == n)
            .map(|(_, s)| *s)
            .unwrap_or(MergeStrategy::First)
    }

    /// Tier indices to overwrite for a game with `tier_count` tiers.
    pub fn targets(self, tier_count: usize) -> Vec<usize> {
        let all: Vec<usize> = match self {
            MergeStrategy::Verbatim | MergeStrategy::First => vec![0],
            MergeStrategy::Mirror => (0..tier_count).collect(),
            MergeStrategy::Slots(slots) => slots.to_vec(),
        };
        all.into_iter().filter(|&i| i < tier_count).collect()
    }
}

/// Outcome of one merge, for logging.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Games whose tiers were written.
    pub updated: Vec<String>,
    /// Dataset games with no extracted tokens; left as they were.
    pub untouched: Vec<String>,
    /// Extracted names matching no dataset game.
    pub unknown: Vec<String>,
}

/// Fold `extracted` (game name -> tokens) into `dataset`.
/// Games absent from `extracted` are not modified. Idempotent for equal input.
pub fn merge_into_dataset(dataset: &mut Dataset, extracted: &HashMap<String, Vec<String>>) -> MergeReport {
    let mut report = MergeReport::default();

    for game in dataset.games_mut() {
        let Some(tokens) = extracted.get(&game.name) else {
            report.untouched.push(game.name.clone());
            continue;
        };
        if game.tiers.is_empty() {
            game.tiers.push(DrawTier::default());
        }
        let strategy = MergeStrategy::for_tier_count(game.tiers.len());
        for i in strategy.targets(game.tiers.len()) {
            game.tiers[i].numbers = tokens.clone();
        }
        tracing::debug!("Dataset: {} <- {:?} ({:?})", game.name, tokens, strategy);
        report.updated.push(game.name.clone());
    }

    let known: Vec<&str> = dataset.games().map(|g| g.name.as_str()).collect();
    report.unknown = extracted
        .keys()
        .filter(|k| !known.contains(&k.as_str()))
        .cloned()
        .collect();
    report.unknown.sort();
    report
}

/* ---------------- token collection ---------------- */

/// Numbers for every dataset game found on the results page `body`.
/// A result block titled like the game wins; otherwise the game name is used
/// as an anchor label in the flattened page text.
pub fn collect_tokens(body: &str, dataset: &Dataset) -> HashMap<String, Vec<String>> {
    let doc = Html::parse_document(body);
    let blocks = scan_blocks(&doc);
    let text = page_text(&doc);

    let mut out = HashMap::new();
    for game in dataset.games() {
        if out.contains_key(&game.name) {
            continue;
        }
        let label = normalize_ws(&game.name);
        if label.is_empty() {
            continue;
        }
        let expected = game.expected_count();
        let key = title_key(&label);

        let rule = TokenRule::new(TokenPattern::OneOrTwo, expected);

        let found = match blocks.iter().find(|b| title_key(&b.title) == key) {
            Some(b) => fit_tokens(b.scores.clone(), &label, &rule),
            None => tokens_after_label(&text, &label, &rule),
        };
        match found {
            Ok(tokens) => {
                out.insert(game.name.clone(), tokens);
            }
            Err(e) => tracing::debug!("Dataset: no tokens for '{}': {e}", game.name),
        }
    }
    out
}
