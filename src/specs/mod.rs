// src/specs/mod.rs
//! # Source extraction "specs"
//!
//! One module per upstream source. Each spec encodes *where the ground truth
//! lives in that source's payload* and *how to pull it out robustly*, and
//! nothing else.
//!
//! ## What lives here
//! - The [`Extractor`] capability every source implements.
//! - **Per-source parsing**: tabular page text (`powerball`), a loosely
//!   structured JSON service (`megamillions`), phrase-anchored aggregator
//!   pages (`lotteryusa`), DOM blocks selected by class name (`dominican`).
//! - **Label anchoring** (`anchor`): find a game's numbers by its display
//!   name in flattened page text.
//! - **Source precedence** (`fallback`): several sources for one lottery,
//!   first success wins.
//! - The default [`Registry`] and its order.
//!
//! ## What does **not** live here
//! - Running extractors, worker pools, isolation of panics → `scrape`.
//! - Persisting anything → `store` / `dataset`.
//!
//! ## Conventions & invariants
//! - Every spec splits `fetch` from a pure `parse_*` function over the raw
//!   body, so it can be tested offline against inline fixtures.
//! - `extract` returns `Result`; the provided [`Extractor::fetch_and_extract`]
//!   is the boundary that turns any `Err` into a degraded record carrying the
//!   attempted source URL. No error crosses that line.
//! - Text-anchored matches need at least [`MIN_TOKENS`] numeric tokens and
//!   are truncated to the game's known count when one is known.
//!
//! [`MIN_TOKENS`]: crate::config::consts::MIN_TOKENS

pub mod anchor;
pub mod dominican;
pub mod fallback;
pub mod lotteryusa;
pub mod megamillions;
pub mod powerball;

use crate::core::Fetch;
use crate::error::{ExtractError, RegistryError};
use crate::model::{DrawResult, LotteryMeta};

pub use fallback::FirstSuccess;

pub trait Extractor: Send + Sync {
    /// Identity of the lottery this extractor reports.
    fn meta(&self) -> &LotteryMeta;

    /// Fixed upstream location; also what a degraded record reports as `source`.
    fn source_url(&self) -> &str;

    /// Fetch + locate + parse. May fail in any way an upstream can.
    fn extract(&self, http: &dyn Fetch) -> Result<DrawResult, ExtractError>;

    fn id(&self) -> &str {
        self.meta().id
    }

    /// Every upstream this extractor may touch, in precedence order.
    fn all_sources(&self) -> Vec<&str> {
        vec![self.source_url()]
    }

    /// Total version of [`Extractor::extract`]: always returns a record.
    fn fetch_and_extract(&self, http: &dyn Fetch) -> DrawResult {
        match self.extract(http) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(id = self.id(), source = self.source_url(), error = %e, "extraction degraded");
                DrawResult::degraded(self.meta(), self.source_url(), e)
            }
        }
    }
}

/// Ordered set of extractors. Order is the output order of a run.
#[derive(Default)]
pub struct Registry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    /// Ids are unique within a run; a second registration of an id is refused.
    /// Several sources for one lottery go through [`FirstSuccess`] instead.
    pub fn register(&mut self, ex: Box<dyn Extractor>) -> Result<(), RegistryError> {
        if self.extractors.iter().any(|e| e.id() == ex.id()) {
            return Err(RegistryError::DuplicateId(s!(ex.id())));
        }
        self.extractors.push(ex);
        Ok(())
    }

    /// Keep only `ids`, preserving registration order.
    pub fn retain_ids(&mut self, ids: &[String]) -> Result<(), RegistryError> {
        if let Some(unknown) = ids.iter().find(|id| !self.extractors.iter().any(|e| e.id() == id.as_str())) {
            return Err(RegistryError::UnknownId(unknown.clone()));
        }
        self.extractors.retain(|e| ids.iter().any(|id| id == e.id()));
        Ok(())
    }

    pub fn as_slice(&self) -> &[Box<dyn Extractor>] { &self.extractors }
    pub fn len(&self) -> usize { self.extractors.len() }
    pub fn is_empty(&self) -> bool { self.extractors.is_empty() }
}

/// Every source we know about, in output order.
pub fn default_registry() -> Registry {
    let mut reg = Registry::new();
    let all: Vec<Box<dyn Extractor>> = vec![
        Box::new(
            FirstSuccess::new(Box::new(powerball::TexasPowerball::new()))
                .or(Box::new(lotteryusa::PhraseAnchored::powerball())),
        ),
        Box::new(
            FirstSuccess::new(Box::new(megamillions::MegaMillionsService::new()))
                .or(Box::new(lotteryusa::PhraseAnchored::megamillions())),
        ),
        Box::new(lotteryusa::PhraseAnchored::cash4life()),
        Box::new(lotteryusa::PhraseAnchored::lotto_america()),
        Box::new(dominican::DominicanGame::quiniela_leidsa()),
        Box::new(dominican::DominicanGame::quiniela_real()),
        Box::new(dominican::DominicanGame::quiniela_loteka()),
    ];
    for ex in all {
        // ids above are distinct literals
        if let Err(e) = reg.register(ex) {
            tracing::error!(error = %e, "default registry");
        }
    }
    reg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_order_and_ids() {
        let reg = default_registry();
        let ids: Vec<&str> = reg.as_slice().iter().map(|e| e.id()).collect();
        assert_eq!(
            ids,
            vec![
                "powerball",
                "megamillions",
                "cash4life",
                "lotto_america",
                "quiniela_leidsa",
                "quiniela_real",
                "quiniela_loteka"
            ]
        );
    }

    #[test]
    fn duplicate_and_unknown_ids_are_refused() {
        let mut reg = Registry::new();
        reg.register(Box::new(lotteryusa::PhraseAnchored::cash4life())).unwrap();
        let dup = reg.register(Box::new(lotteryusa::PhraseAnchored::cash4life()));
        assert!(matches!(dup, Err(RegistryError::DuplicateId(id)) if id == "cash4life"));

        let mut reg = default_registry();
        assert!(matches!(reg.retain_ids(&[s!("nope")]), Err(RegistryError::UnknownId(_))));
        reg.retain_ids(&[s!("quiniela_real"), s!("powerball")]).unwrap();
        let ids: Vec<&str> = reg.as_slice().iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["powerball", "quiniela_real"]);
    }
}
