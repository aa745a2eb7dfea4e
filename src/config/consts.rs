// src/config/consts.rs

// Net config
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const TIMEOUT_SECS: u64 = 30;

// Output
pub const DEFAULT_OUT_DIR: &str = "data/results";
pub const LATEST_FILE: &str = "latest.json";
pub const SEED_FILE: &str = "seed.json";
pub const INDEX_FILE: &str = "index.json";
pub const DEFAULT_DATASET: &str = "data/games.json";

// Extraction
pub const MIN_TOKENS: usize = 3;
pub const LABEL_WINDOW_CHARS: usize = 160;

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
