// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::consts::{DEFAULT_DATASET, DEFAULT_OUT_DIR, TIMEOUT_SECS, WORKERS};
use crate::config::options::AppOptions;
use crate::core::HttpClient;
use crate::error::RunError;
use crate::model::DrawResult;
use crate::progress::Progress;
use crate::runner;

#[derive(Parser, Debug)]
#[command(name = "lotto_scrape", version, about = "Scrape lottery draw results into dated JSON snapshots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Snapshot directory (dated files, latest.json, index.json)
    #[arg(long, global = true, env = "LOTTO_OUT_DIR", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Persistent multi-game dataset
    #[arg(long, global = true, env = "LOTTO_DATASET", default_value = DEFAULT_DATASET)]
    pub dataset: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "LOTTO_TIMEOUT_SECS", default_value_t = TIMEOUT_SECS)]
    pub timeout: u64,

    /// Worker cap; the pool never exceeds the number of distinct hosts
    #[arg(long, global = true, default_value_t = WORKERS)]
    pub workers: usize,

    /// Only run these extractor ids (comma separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Do not touch the dataset during `run`
    #[arg(long, global = true)]
    pub skip_dataset: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Warnings and errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Extract all lotteries, write the snapshot, merge the dataset (default)
    Run,
    /// List registered extractors and their sources
    List,
    /// Rebuild index.json from the dated files on disk
    Index,
    /// Merge the results page into the dataset only
    Merge,
}

impl Cli {
    pub fn options(&self) -> AppOptions {
        let mut opts = AppOptions::default();
        opts.fetch.timeout = Duration::from_secs(self.timeout);
        opts.fetch.max_workers = self.workers.max(1);
        opts.store.out_dir = self.out_dir.clone();
        opts.dataset.path = self.dataset.clone();
        opts.dataset.skip = self.skip_dataset;
        if !self.only.is_empty() {
            opts.only = Some(self.only.iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect());
        }
        opts
    }
}

/// Progress lines for a terminal run.
struct CliProgress {
    total: usize,
    done: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn log(&mut self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn item_done(&mut self, record: &DrawResult) {
        self.done += 1;
        match &record.error {
            None => tracing::info!("[{}/{}] {} {:?}", self.done, self.total, record.id, record.numbers),
            Some(e) => tracing::warn!("[{}/{}] {} degraded: {e}", self.done, self.total, record.id),
        }
    }
}

pub fn run() -> Result<(), RunError> {
    let cli = Cli::parse();
    crate::log::init(crate::log::level_for(cli.verbose, cli.quiet), cli.log_file.as_deref())?;
    execute(&cli)
}

pub fn execute(cli: &Cli) -> Result<(), RunError> {
    let opts = cli.options();

    match cli.command.unwrap_or(Command::Run) {
        Command::List => {
            for (id, sources) in runner::list_extractors(&opts)? {
                println!("{id}\t{}", sources.join(" | "));
            }
        }
        Command::Index => {
            let (path, n) = runner::rebuild_index(&opts)?;
            tracing::info!("Index: {n} dates");
            println!("OK -> {}", path.display());
        }
        Command::Merge => {
            let http = HttpClient::new(&opts.fetch)?;
            let (_, saved) = runner::merge_dataset(&opts, &http)?;
            if let Some(path) = saved {
                println!("OK -> {}", path.display());
            }
        }
        Command::Run => {
            let http = HttpClient::new(&opts.fetch)?;
            let mut progress = CliProgress { total: 0, done: 0 };
            let summary = runner::run(&opts, &http, Some(&mut progress))?;
            for path in &summary.files_written {
                println!("OK -> {}", path.display());
            }
            let failed = summary.snapshot.lotteries.iter().filter(|r| !r.is_ok()).count();
            if failed > 0 {
                tracing::warn!("{failed} of {} lotteries degraded", summary.snapshot.lotteries.len());
            }
        }
    }
    Ok(())
}
