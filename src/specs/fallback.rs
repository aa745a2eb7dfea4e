// src/specs/fallback.rs
// Source precedence for one lottery: try each source in registration order,
// first successful record wins. Later sources are only fetched when every
// earlier one failed.

use crate::core::Fetch;
use crate::error::ExtractError;
use crate::model::{DrawResult, LotteryMeta};

use super::Extractor;

pub struct FirstSuccess {
    sources: Vec<Box<dyn Extractor>>,
}

impl FirstSuccess {
    pub fn new(primary: Box<dyn Extractor>) -> Self {
        Self { sources: vec![primary] }
    }

    /// Append a lower-precedence source for the same lottery id.
    pub fn or(mut self, next: Box<dyn Extractor>) -> Self {
        debug_assert_eq!(next.id(), self.sources[0].id(), "fallback must report the same lottery");
        self.sources.push(next);
        self
    }
}

impl Extractor for FirstSuccess {
    fn meta(&self) -> &LotteryMeta { self.sources[0].meta() }
    fn source_url(&self) -> &str { self.sources[0].source_url() }

    fn all_sources(&self) -> Vec<&str> {
        self.sources.iter().flat_map(|s| s.all_sources()).collect()
    }

    fn extract(&self, http: &dyn Fetch) -> Result<DrawResult, ExtractError> {
        let mut errors = Vec::with_capacity(self.sources.len());
        for (i, src) in self.sources.iter().enumerate() {
            match src.extract(http) {
                Ok(r) => {
                    if i > 0 {
                        tracing::info!(id = self.id(), source = src.source_url(), "used fallback source");
                    }
                    return Ok(r);
                }
                Err(e) => errors.push(format!("{}: {}", src.source_url(), e)),
            }
        }
        Err(ExtractError::Exhausted(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StaticFetch;
    use crate::specs::{lotteryusa::PhraseAnchored, powerball};

    fn chain() -> FirstSuccess {
        FirstSuccess::new(Box::new(powerball::TexasPowerball::new())).or(Box::new(PhraseAnchored::powerball()))
    }

    #[test]
    fn primary_wins_when_it_works() {
        let http = StaticFetch::new()
            .with(
                powerball::SOURCE_URL,
                "<table><tr><td>01/05/2026</td><td>4 - 18 - 24 - 51 - 56</td><td>14</td><td>2</td><td>$86 Million</td></tr></table>",
            )
            .with("https://www.lotteryusa.com/powerball/", "Winning Numbers for 01 02 03 04 05 06");
        let r = chain().fetch_and_extract(&http);
        assert_eq!(r.numbers, vec![4, 18, 24, 51, 56, 14]);
        assert_eq!(r.source, powerball::SOURCE_URL);
    }

    #[test]
    fn secondary_used_when_primary_fails() {
        let http = StaticFetch::new().with("https://www.lotteryusa.com/powerball/", "Winning Numbers for 01 02 03 04 05 06");
        let r = chain().fetch_and_extract(&http);
        assert_eq!(r.numbers, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(r.source, "https://www.lotteryusa.com/powerball/");
        assert!(r.is_ok());
    }

    #[test]
    fn all_failing_reports_every_source() {
        let ex = chain();
        assert_eq!(ex.all_sources().len(), 2);
        let r = ex.fetch_and_extract(&StaticFetch::new());
        let err = r.error.unwrap();
        assert!(err.contains("texaslottery.com"));
        assert!(err.contains("lotteryusa.com"));
        assert_eq!(r.source, powerball::SOURCE_URL);
        assert_eq!(r.id, "powerball");
    }
}
