// src/error.rs
//
// Error taxonomy for the pipeline.
//
// - FetchError:   transport (unreachable host, timeout, non-success status)
// - ExtractError: everything an extractor can hit; always converted into a
//                 degraded record at the extractor boundary
// - StoreError:   output files; the only errors that fail a run
// - RunError:     what a whole run (or CLI command) can fail with

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Transport(#[from] FetchError),

    /// Expected fragment, label or field is missing from the payload.
    #[error("{0} not found")]
    Missing(String),

    /// Fragment found but carried fewer numeric tokens than the acceptance threshold.
    #[error("only {found} number tokens after '{anchor}' (need {min})")]
    TooFewTokens { anchor: String, found: usize, min: usize },

    /// A field parser could not interpret the text it was given.
    #[error("cannot parse {field} from '{text}'")]
    Parse { field: &'static str, text: String },

    /// Every source in a precedence chain failed.
    #[error("all sources failed: {}", .0.join("; "))]
    Exhausted(Vec<String>),
}

impl ExtractError {
    pub fn missing(what: impl Into<String>) -> Self {
        ExtractError::Missing(what.into())
    }

    pub fn parse(field: &'static str, text: impl Into<String>) -> Self {
        ExtractError::Parse { field, text: text.into() }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json { path: path.into(), source }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate extractor id: {0}")]
    DuplicateId(String),
    #[error("unknown extractor id: {0}")]
    UnknownId(String),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// HTTP client could not be built.
    #[error(transparent)]
    Client(#[from] FetchError),
}
