// src/runner.rs
use std::path::PathBuf;

use crate::{
    config::options::AppOptions,
    core::Fetch,
    dataset::{collect_tokens, merge_into_dataset, Dataset, MergeReport},
    error::RunError,
    model::{now_utc, RunSnapshot},
    progress::Progress,
    scrape,
    specs::{self, dominican, Registry},
    store::SnapshotStore,
};

/// Summary of what was produced.
pub struct RunSummary {
    pub snapshot: RunSnapshot,
    pub files_written: Vec<PathBuf>,
    /// `None` when the dataset merge was skipped or had nothing to work with.
    pub merge: Option<MergeReport>,
}

/// Default registry narrowed by `--only`, registration order kept.
pub fn build_registry(opts: &AppOptions) -> Result<Registry, RunError> {
    let mut registry = specs::default_registry();
    if let Some(only) = &opts.only {
        registry.retain_ids(only)?;
    }
    Ok(registry)
}

/// One full run: extract every lottery, persist the snapshot, then fold the
/// results page into the dataset.
/// Per-source failures only degrade records; store failures fail the run.
pub fn run(
    opts: &AppOptions,
    http: &dyn Fetch,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, RunError> {
    let registry = build_registry(opts)?;
    let records = scrape::run_all(registry.as_slice(), http, &opts.fetch, progress);
    let snapshot = RunSnapshot::new(now_utc(), records);

    let store = SnapshotStore::new(&opts.store.out_dir);
    let written = store.write(&snapshot)?;
    let mut files_written: Vec<PathBuf> = written.paths().iter().map(|p| p.to_path_buf()).collect();

    let merge = if opts.dataset.skip {
        tracing::info!("Dataset: skipped");
        None
    } else {
        let (report, saved) = merge_dataset(opts, http)?;
        files_written.extend(saved);
        report
    };

    Ok(RunSummary { snapshot, files_written, merge })
}

/// Dataset merge on its own.
/// A missing dataset file or an unreachable results page is logged and
/// skipped; only failing to rewrite the dataset is an error.
pub fn merge_dataset(
    opts: &AppOptions,
    http: &dyn Fetch,
) -> Result<(Option<MergeReport>, Option<PathBuf>), RunError> {
    let path = &opts.dataset.path;
    if !path.exists() {
        tracing::warn!("Dataset: {} not found, skipping merge", path.display());
        return Ok((None, None));
    }
    let mut dataset = Dataset::load(path)?;

    let body = match http.get_text(dominican::SOURCE_URL) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("Dataset: results page unavailable: {e}");
            return Ok((None, None));
        }
    };

    let tokens = collect_tokens(&body, &dataset);
    let report = merge_into_dataset(&mut dataset, &tokens);
    tracing::info!(
        updated = report.updated.len(),
        untouched = report.untouched.len(),
        "Dataset: merged {} of {} games",
        report.updated.len(),
        dataset.game_count()
    );

    if report.updated.is_empty() {
        return Ok((Some(report), None));
    }
    dataset.save(path)?;
    Ok((Some(report), Some(path.clone())))
}

/// Regenerate the date index only.
pub fn rebuild_index(opts: &AppOptions) -> Result<(PathBuf, usize), RunError> {
    let store = SnapshotStore::new(&opts.store.out_dir);
    let dates = store.rebuild_index()?;
    Ok((store.index_path(), dates.len()))
}

/// `(id, sources)` for every extractor that would run, registration order.
pub fn list_extractors(opts: &AppOptions) -> Result<Vec<(String, Vec<String>)>, RunError> {
    let registry = build_registry(opts)?;
    Ok(registry
        .as_slice()
        .iter()
        .map(|e| (s!(e.id()), e.all_sources().into_iter().map(String::from).collect()))
        .collect())
}
