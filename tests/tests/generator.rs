mod utils;
#[allow(unused)]
use utils::*;

use ledgerload::prelude::*;
use ledgerload::workload::{register_args, update_args, READ_MEDICINE, REGISTER_MEDICINE};
use mock_ledger::{LedgerSettings, MockLedger};
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn config(transactions: usize, concurrency: usize, workload: Workload) -> RunConfig {
    RunConfig::new(transactions, workload)
        .concurrency(NonZeroUsize::new(concurrency).unwrap())
        .batch_delay(Duration::ZERO)
        .log_every(0)
}

fn instant_ledger() -> Arc<MockLedger> {
    Arc::new(MockLedger::connect(LedgerSettings::instant()).unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn flaky_ledger_settles_every_transaction() {
    init();

    let ledger = MockLedger::connect(LedgerSettings {
        failure_rate: 0.3,
        ..LedgerSettings::instant()
    })
    .unwrap();
    let results = LoadGenerator::new(ledger, config(120, 16, Workload::Register))
        .run()
        .await;

    assert_eq!(results.total(), 120);
    assert_eq!(results.latencies.len() as u64, results.success_count);
    let tallied: u64 = results.error_counts.values().sum();
    assert_eq!(tallied, results.failure_count);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn read_workload_registers_missing_records() {
    init();

    let ledger = instant_ledger();
    let results = LoadGenerator::new(ledger.clone(), config(40, 8, Workload::Read))
        .run()
        .await;

    // Every read hit an empty ledger, fell back to a registration, and
    // succeeded on the retry.
    assert_eq!(results.success_count, 40);
    assert_eq!(results.failure_count, 0);
    assert_eq!(ledger.record_count(), 40);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn update_workload_registers_then_updates() {
    init();

    let ledger = instant_ledger();
    let results = LoadGenerator::new(ledger.clone(), config(30, 10, Workload::Update))
        .run()
        .await;

    assert_eq!(results.success_count, 30);
    assert_eq!(ledger.record_count(), 30);

    let expected_owner = update_args(7)[1].clone();
    let bytes = ledger
        .evaluate(READ_MEDICINE, &["MED000007".to_string()])
        .await
        .unwrap();
    let record: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(record["owner"], expected_owner.as_str());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn read_all_workload_scans_the_collection() {
    init();

    let ledger = instant_ledger();
    for index in 0..5 {
        ledger
            .submit(REGISTER_MEDICINE, &register_args(index))
            .await
            .unwrap();
    }

    let results = LoadGenerator::new(ledger.clone(), config(25, 5, Workload::ReadAll))
        .run()
        .await;

    assert_eq!(results.success_count, 25);
    // A scan never creates records.
    assert_eq!(ledger.record_count(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn inter_batch_delay_is_honored() {
    init();

    // 3 batches => 2 pauses of 150ms each, on top of execution time.
    let delay = Duration::from_millis(150);
    let generator = LoadGenerator::new(
        instant_ledger(),
        config(30, 10, Workload::Register).batch_delay(delay),
    );

    let start = Instant::now();
    let results = generator.run().await;
    let elapsed = start.elapsed();

    assert_eq!(results.success_count, 30);
    assert!(
        elapsed >= delay * 2,
        "run finished in {elapsed:?}, pacing was skipped"
    );
}

#[tokio::test]
async fn setup_failure_aborts_before_any_batch() {
    init();

    let settings = LedgerSettings {
        failure_rate: 2.0,
        ..LedgerSettings::instant()
    };
    assert!(MockLedger::connect(settings).is_err());
}
