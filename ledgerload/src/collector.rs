use ledgerload_core::RunResults;
use metrics_util::AtomicBucket;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

/// Shared results aggregate written to by every in-flight transaction task.
///
/// Counters are atomics and latencies go through a lock-free bucket, so the
/// success path takes no lock; only the error tallies are mutex-guarded,
/// and only the failure path touches them.
pub(crate) struct Collector {
    success: Arc<AtomicU64>,
    failure: Arc<AtomicU64>,
    latency: Arc<AtomicBucket<Duration>>,
    errors: Arc<Mutex<HashMap<String, u64>>>,
}

impl Collector {
    pub fn new() -> Self {
        Self {
            success: Arc::new(AtomicU64::new(0)),
            failure: Arc::new(AtomicU64::new(0)),
            latency: Arc::new(AtomicBucket::new()),
            errors: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn task_data(&self) -> TaskData {
        TaskData {
            success: self.success.clone(),
            failure: self.failure.clone(),
            latency: self.latency.clone(),
            errors: self.errors.clone(),
        }
    }

    /// Drain everything into the final aggregate.
    ///
    /// Call only once every task has settled; latencies recorded afterwards
    /// would be lost.
    pub fn finalize(self, elapsed: Duration) -> RunResults {
        let mut latencies = vec![];
        self.latency.clear_with(|durs| latencies.extend_from_slice(durs));

        // A task that panicked mid-tally must not wedge finalization.
        let error_counts = std::mem::take(
            &mut *self
                .errors
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );

        RunResults {
            success_count: self.success.load(Ordering::Relaxed),
            failure_count: self.failure.load(Ordering::Relaxed),
            latencies,
            error_counts,
            elapsed,
        }
    }
}

#[derive(Clone)]
pub(crate) struct TaskData {
    success: Arc<AtomicU64>,
    failure: Arc<AtomicU64>,
    latency: Arc<AtomicBucket<Duration>>,
    errors: Arc<Mutex<HashMap<String, u64>>>,
}

impl TaskData {
    pub fn record_success(&self, elapsed: Duration) {
        self.success.fetch_add(1, Ordering::Relaxed);
        self.latency.push(elapsed);

        #[cfg(feature = "metrics")]
        {
            metrics::counter!("ledgerload.transactions.success").increment(1);
            metrics::histogram!("ledgerload.transaction.latency")
                .record(elapsed.as_secs_f64());
        }
    }

    pub fn record_failure(&self, message: String) {
        self.failure.fetch_add(1, Ordering::Relaxed);
        *self
            .errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(message)
            .or_insert(0) += 1;

        #[cfg(feature = "metrics")]
        {
            metrics::counter!("ledgerload.transactions.error").increment(1);
        }
    }
}
