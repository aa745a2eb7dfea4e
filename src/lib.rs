// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod model;
pub mod specs;

pub mod dataset;
pub mod file;
pub mod progress;
pub mod runner;
pub mod scrape;
pub mod store;
