// src/progress.rs
use crate::model::DrawResult;

/// Lightweight progress reporting for a run.
/// Frontends implement this to surface status; the aggregator only calls it
/// from the collecting thread, never from workers.
pub trait Progress {
    /// Called at the start with the number of extractors.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One extractor finished (successfully or degraded). Arrival order, not registration order.
    fn item_done(&mut self, _record: &DrawResult) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
