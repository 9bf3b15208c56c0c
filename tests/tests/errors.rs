mod utils;
#[allow(unused)]
use utils::*;

use async_trait::async_trait;
use ledgerload::prelude::*;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Alternates between two failure kinds so the tally has distinct messages.
struct UnreachableGateway {
    attempts: AtomicU64,
}

#[async_trait]
impl TransactionExecutor for UnreachableGateway {
    async fn submit(
        &self,
        transaction: &str,
        _args: &[String],
    ) -> Result<Vec<u8>, TransactionError> {
        match self.attempts.fetch_add(1, Ordering::Relaxed) % 2 {
            0 => Err(TransactionError::Unavailable("gateway timeout".to_string())),
            _ => Err(TransactionError::Rejected {
                transaction: transaction.to_string(),
                reason: "no peers available".to_string(),
            }),
        }
    }

    async fn evaluate(
        &self,
        _transaction: &str,
        _args: &[String],
    ) -> Result<Vec<u8>, TransactionError> {
        Err(TransactionError::Unavailable("gateway timeout".to_string()))
    }
}

fn config(transactions: usize) -> RunConfig {
    RunConfig::new(transactions, Workload::Register)
        .concurrency(NonZeroUsize::new(4).unwrap())
        .batch_delay(Duration::ZERO)
        .log_every(0)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_messages_get_distinct_tallies() -> anyhow::Result<()> {
    init();

    let gateway = UnreachableGateway {
        attempts: AtomicU64::new(0),
    };
    let results = LoadGenerator::new(gateway, config(20)).run().await;

    assert_eq!(results.failure_count, 20);
    assert_eq!(results.success_count, 0);
    assert_eq!(results.error_counts.len(), 2);
    assert_eq!(
        results.error_counts["ledger unavailable: gateway timeout"],
        10
    );
    let tallied: u64 = results.error_counts.values().sum();
    assert_eq!(tallied, 20);
    assert!(results.latency_summary().is_none());
    Ok(())
}

#[tokio::test]
async fn failing_run_still_reports_elapsed_time() {
    init();

    let gateway = UnreachableGateway {
        attempts: AtomicU64::new(0),
    };
    let results = LoadGenerator::new(gateway, config(8)).run().await;

    assert!(results.elapsed > Duration::ZERO);
    assert_eq!(results.throughput(), 0.0);
    assert_eq!(results.error_rate(), 1.0);
}
