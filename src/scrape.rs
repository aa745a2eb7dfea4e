// src/scrape.rs
//
// Aggregator: run every registered extractor, isolate failures, keep order.
//
// Two layers of isolation:
// - extractors convert their own errors into degraded records
//   (`Extractor::fetch_and_extract`);
// - anything that still escapes (a panic) is caught here and replaced by a
//   minimal error record carrying the extractor's declared id.
//
// Output length always equals input length, in registration order.

use std::{
    collections::HashSet,
    panic::{self, AssertUnwindSafe},
    sync::{ mpsc, atomic::{ AtomicUsize, Ordering }},
    thread,
};

use reqwest::Url;

use crate::{
    config::options::FetchOptions,
    core::Fetch,
    model::DrawResult,
    progress::Progress,
    specs::Extractor,
};

/// Pool size: one worker per distinct upstream host, capped by `max_workers`.
/// Never more workers than extractors, never fewer than one.
pub fn worker_count(extractors: &[Box<dyn Extractor>], max_workers: usize) -> usize {
    let hosts: HashSet<String> = extractors
        .iter()
        .map(|e| {
            Url::parse(e.source_url())
                .ok()
                .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
                .unwrap_or_else(|| s!(e.source_url()))
        })
        .collect();
    hosts.len().min(max_workers).min(extractors.len()).max(1)
}

/// Run one extractor behind a panic guard.
fn run_one(ex: &dyn Extractor, http: &dyn Fetch) -> DrawResult {
    let id = s!(ex.id());
    match panic::catch_unwind(AssertUnwindSafe(|| ex.fetch_and_extract(http))) {
        Ok(mut rec) => {
            if rec.id.is_empty() {
                rec.id = id;
            }
            rec
        }
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| s!("unknown panic"));
            tracing::error!(id = %id, "extractor panicked: {msg}");
            DrawResult::minimal_error(&id, format!("extractor panicked: {msg}"))
        }
    }
}

/// Invoke every extractor and assemble the run's records.
pub fn run_all(
    extractors: &[Box<dyn Extractor>],
    http: &dyn Fetch,
    opts: &FetchOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Vec<DrawResult> {
    let n = extractors.len();
    if let Some(p) = progress.as_deref_mut() {
        p.begin(n);
    }
    if n == 0 {
        if let Some(p) = progress.as_deref_mut() {
            p.log("No extractors to run.");
            p.finish();
        }
        return Vec::new();
    }

    let workers = worker_count(extractors, opts.max_workers);
    tracing::info!(extractors = n, workers, "Scrape: begin");

    let counter = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(usize, DrawResult)>();
    let mut slots: Vec<Option<DrawResult>> = (0..n).map(|_| None).collect();
    let pause = opts.pause;

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let counter = &counter;
            scope.spawn(move || {
                loop {
                    let i = counter.fetch_add(1, Ordering::Relaxed);
                    if i >= n {
                        break;
                    }
                    let rec = run_one(extractors[i].as_ref(), http);
                    if tx.send((i, rec)).is_err() {
                        break;
                    }
                    if !pause.is_zero() && counter.load(Ordering::Relaxed) < n {
                        thread::sleep(pause); // be polite
                    }
                }
            });
        }
        drop(tx); // collector is the sole receiver now

        for (i, rec) in rx {
            if let Some(p) = progress.as_deref_mut() {
                p.item_done(&rec);
            }
            slots[i] = Some(rec);
        }
    });

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    let out: Vec<DrawResult> = slots
        .into_iter()
        .zip(extractors)
        .map(|(slot, ex)| slot.unwrap_or_else(|| DrawResult::minimal_error(ex.id(), "extractor produced no result")))
        .collect();

    let failed = out.iter().filter(|r| !r.is_ok()).count();
    tracing::info!(ok = n - failed, failed, "Scrape: done");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::{dominican::DominicanGame, lotteryusa::PhraseAnchored, powerball::TexasPowerball};

    #[test]
    fn workers_follow_distinct_hosts() {
        let exs: Vec<Box<dyn Extractor>> = vec![
            Box::new(PhraseAnchored::cash4life()),
            Box::new(PhraseAnchored::lotto_america()),
            Box::new(DominicanGame::quiniela_real()),
            Box::new(TexasPowerball::new()),
        ];
        assert_eq!(worker_count(&exs, 8), 3);
        assert_eq!(worker_count(&exs, 2), 2);
        assert_eq!(worker_count(&exs[..1], 8), 1);
        assert_eq!(worker_count(&[], 8), 1);
    }
}
