use crate::collector::Collector;
use crate::executor::TransactionExecutor;
use crate::workload;
use ledgerload_core::{RunConfig, RunResults};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
#[allow(unused)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Drives a fixed volume of ledger transactions in concurrent batches.
///
/// Transactions are issued in batches of at most the configured concurrency.
/// Every task in a batch is joined before the next batch dispatches, and the
/// configured inter-batch delay suspends the whole driver between batches.
///
/// ```no_run
/// use ledgerload::prelude::*;
/// # async fn example(executor: impl TransactionExecutor + 'static) {
/// let config = RunConfig::new(1_000, Workload::Register);
/// let results = LoadGenerator::new(executor, config).run().await;
/// println!("{results}");
/// # }
/// ```
pub struct LoadGenerator<E> {
    executor: Arc<E>,
    config: RunConfig,
}

impl<E> LoadGenerator<E>
where
    E: TransactionExecutor + 'static,
{
    pub fn new(executor: E, config: RunConfig) -> Self {
        Self {
            executor: Arc::new(executor),
            config,
        }
    }

    /// Run every batch to completion and return the final aggregate.
    ///
    /// Individual transaction failures are recorded and never abort the run;
    /// every dispatched transaction settles exactly once, as a success or as
    /// a tallied failure.
    #[instrument(name = "run", skip_all, fields(workload = %self.config.workload, transactions = self.config.transactions))]
    pub async fn run(&self) -> RunResults {
        info!(
            concurrency = self.config.concurrency.get(),
            batch_delay = ?self.config.batch_delay,
            "Starting run",
        );

        let collector = Collector::new();
        let start = Instant::now();
        let batches = self.config.batch_count();
        let width = self.config.concurrency.get();
        let mut settled: u64 = 0;

        for batch in 0..batches {
            let size = self.config.batch_size(batch);
            let mut tasks: Vec<JoinHandle<()>> = Vec::with_capacity(size);

            for offset in 0..size {
                let index = (batch * width + offset) as u64;
                let executor = Arc::clone(&self.executor);
                let kind = self.config.workload;
                let data = collector.task_data();

                tasks.push(tokio::spawn(async move {
                    let dispatched = Instant::now();
                    let result = workload::execute(kind, &*executor, index).await;
                    let elapsed = dispatched.elapsed();
                    match result {
                        Ok(()) => data.record_success(elapsed),
                        Err(err) => {
                            trace!(index, %err, "transaction failed");
                            data.record_failure(err.to_string());
                        }
                    }
                }));
            }

            // Barrier: batch i+1 never dispatches before batch i fully settles.
            for task in tasks {
                if let Err(err) = task.await {
                    error!(%err, "transaction task panicked");
                    collector.task_data().record_failure("task panicked".to_string());
                }
            }

            let before = settled;
            settled += size as u64;
            if crossed_boundary(before, settled, self.config.log_every) {
                info!(
                    "{settled}/{} transactions settled ({}/{batches} batches)",
                    self.config.transactions,
                    batch + 1,
                );
            }

            if batch + 1 < batches && !self.config.batch_delay.is_zero() {
                trace!("Pausing {:?} before next batch", self.config.batch_delay);
                tokio::time::sleep(self.config.batch_delay).await;
            }
        }

        let results = collector.finalize(start.elapsed());
        info!(
            success = results.success_count,
            failed = results.failure_count,
            elapsed = ?results.elapsed,
            "Run complete",
        );
        results
    }
}

fn crossed_boundary(before: u64, after: u64, every: u64) -> bool {
    every != 0 && before / every != after / every
}
