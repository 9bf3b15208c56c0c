use crate::{Workload, DEFAULT_BATCH_DELAY, DEFAULT_CONCURRENCY, DEFAULT_LOG_EVERY};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Immutable configuration for a single load-generation run.
///
/// `transactions` are issued in `batch_count()` batches of at most
/// `concurrency` concurrent transactions each, with `batch_delay` of quiet
/// time between consecutive batches.
#[derive(Clone, Debug, Serialize)]
pub struct RunConfig {
    pub transactions: usize,
    pub concurrency: NonZeroUsize,
    pub workload: Workload,
    pub batch_delay: Duration,
    pub log_every: u64,
}

impl RunConfig {
    pub fn new(transactions: usize, workload: Workload) -> Self {
        Self {
            transactions,
            concurrency: DEFAULT_CONCURRENCY,
            workload,
            batch_delay: DEFAULT_BATCH_DELAY,
            log_every: DEFAULT_LOG_EVERY,
        }
    }

    /// Number of transactions dispatched concurrently per batch.
    pub fn concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Quiet time between consecutive batches. Zero disables pacing.
    pub fn batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Log progress whenever the settled count crosses a multiple of `every`.
    /// Zero disables progress logging.
    pub fn log_every(mut self, every: u64) -> Self {
        self.log_every = every;
        self
    }

    /// Number of batches needed to issue every transaction.
    pub fn batch_count(&self) -> usize {
        self.transactions.div_ceil(self.concurrency.get())
    }

    /// Number of transactions dispatched in batch `batch` (zero-based).
    pub fn batch_size(&self, batch: usize) -> usize {
        let width = self.concurrency.get();
        let dispatched = batch.saturating_mul(width);
        width.min(self.transactions.saturating_sub(dispatched))
    }
}
