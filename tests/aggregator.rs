// tests/aggregator.rs
use std::time::Duration;

use lotto_scrape::config::options::FetchOptions;
use lotto_scrape::core::{Fetch, StaticFetch};
use lotto_scrape::error::ExtractError;
use lotto_scrape::model::{DrawResult, LotteryMeta, NATIONAL};
use lotto_scrape::progress::{NullProgress, Progress};
use lotto_scrape::scrape::run_all;
use lotto_scrape::specs::Extractor;

enum Behaviour {
    Ok(Vec<u32>),
    Fail,
    Panic,
}

struct Fake {
    meta: LotteryMeta,
    url: String,
    behaviour: Behaviour,
}

fn fake(id: &'static str, host: &str, behaviour: Behaviour) -> Box<dyn Extractor> {
    Box::new(Fake {
        meta: LotteryMeta { id, country: "US", region: NATIONAL, name: id, currency: "USD" },
        url: format!("https://{host}/{id}"),
        behaviour,
    })
}

impl Extractor for Fake {
    fn meta(&self) -> &LotteryMeta { &self.meta }
    fn source_url(&self) -> &str { &self.url }

    fn extract(&self, _http: &dyn Fetch) -> Result<DrawResult, ExtractError> {
        match &self.behaviour {
            Behaviour::Ok(nums) => {
                let mut r = DrawResult::new(&self.meta, &self.url);
                r.numbers = nums.clone();
                Ok(r)
            }
            Behaviour::Fail => Err(ExtractError::missing("results table")),
            Behaviour::Panic => panic!("selector blew up"),
        }
    }
}

fn opts(workers: usize) -> FetchOptions {
    FetchOptions { max_workers: workers, pause: Duration::ZERO, ..FetchOptions::default() }
}

#[derive(Default)]
struct Counting {
    total: usize,
    seen: Vec<String>,
    finished: bool,
}

impl Progress for Counting {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn item_done(&mut self, record: &DrawResult) { self.seen.push(record.id.clone()); }
    fn finish(&mut self) { self.finished = true; }
}

#[test]
fn one_record_per_extractor_in_registration_order() {
    let exs = vec![
        fake("a", "one.test", Behaviour::Ok(vec![1, 2, 3])),
        fake("b", "two.test", Behaviour::Fail),
        fake("c", "three.test", Behaviour::Panic),
        fake("d", "one.test", Behaviour::Ok(vec![4, 5, 6])),
        fake("e", "two.test", Behaviour::Ok(vec![7, 8, 9])),
    ];
    let mut progress = Counting::default();
    let out = run_all(&exs, &StaticFetch::new(), &opts(4), Some(&mut progress));

    let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c", "d", "e"]);

    assert_eq!(out[0].numbers, vec![1, 2, 3]);
    assert!(out[0].error.is_none());

    // Contained failure: degraded record with the extractor's identity.
    assert!(out[1].error.is_some());
    assert_eq!(out[1].source, "https://two.test/b");
    assert!(out[1].numbers.is_empty());

    // Escaped failure: minimal record, run goes on.
    assert!(out[2].error.as_deref().is_some_and(|e| e.contains("selector blew up")));
    assert!(out[2].numbers.is_empty());

    assert_eq!(out[3].numbers, vec![4, 5, 6]);
    assert_eq!(out[4].numbers, vec![7, 8, 9]);

    assert_eq!(progress.total, 5);
    assert_eq!(progress.seen.len(), 5);
    assert!(progress.finished);
}

#[test]
fn single_worker_gives_the_same_records() {
    let exs = vec![
        fake("x", "h.test", Behaviour::Ok(vec![10])),
        fake("y", "h.test", Behaviour::Panic),
        fake("z", "h.test", Behaviour::Ok(vec![30])),
    ];
    let out = run_all(&exs, &StaticFetch::new(), &opts(1), Some(&mut NullProgress));
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].numbers, vec![10]);
    assert!(!out[1].is_ok());
    assert_eq!(out[2].numbers, vec![30]);
}

#[test]
fn empty_registry_is_an_empty_run() {
    let out = run_all(&[], &StaticFetch::new(), &opts(4), None);
    assert!(out.is_empty());
}

#[test]
fn every_record_is_stamped() {
    let exs = vec![fake("a", "h.test", Behaviour::Fail), fake("b", "h.test", Behaviour::Panic)];
    let out = run_all(&exs, &StaticFetch::new(), &opts(2), None);
    for r in &out {
        let json = serde_json::to_value(r).unwrap();
        let ts = json["updated_at"].as_str().unwrap();
        assert!(ts.ends_with('Z'), "{ts}");
    }
}
