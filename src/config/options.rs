// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppOptions {
    pub fetch: FetchOptions,
    pub store: StoreOptions,
    pub dataset: DatasetOptions,
    /// Restrict the run to these extractor ids (registration order is kept).
    pub only: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    pub user_agent: String,
    pub timeout: Duration,
    /// Upper bound on the worker pool; the pool never exceeds the number of distinct hosts.
    pub max_workers: usize,
    pub pause: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: s!(USER_AGENT),
            timeout: Duration::from_secs(TIMEOUT_SECS),
            max_workers: WORKERS,
            pause: Duration::from_millis(REQUEST_PAUSE_MS),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    pub out_dir: PathBuf,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { out_dir: PathBuf::from(DEFAULT_OUT_DIR) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetOptions {
    pub path: PathBuf,
    /// Skip the dataset merge entirely.
    pub skip: bool,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self { path: PathBuf::from(DEFAULT_DATASET), skip: false }
    }
}
