//! In-memory stand-in for a ledger gateway.
//!
//! Implements the medicine transactions against a `HashMap` world state,
//! with normal-distributed commit latency and random fault injection so the
//! generator has realistic timing and error distributions to measure.

use async_trait::async_trait;
use ledgerload::workload::{
    READ_ALL_MEDICINES, READ_MEDICINE, REGISTER_MEDICINE, UPDATE_MEDICINE_OWNER,
};
use ledgerload::{TransactionError, TransactionExecutor};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;
use tracing::debug;

/// Tuning knobs for the simulated ledger.
#[derive(Debug, Clone)]
pub struct LedgerSettings {
    /// Mean simulated commit latency.
    pub latency_mean: Duration,
    /// Standard deviation of the commit latency.
    pub latency_std: Duration,
    /// Fraction of transactions rejected at random, `0.0..=1.0`.
    pub failure_rate: f64,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            latency_mean: Duration::from_millis(5),
            latency_std: Duration::from_millis(2),
            failure_rate: 0.0,
        }
    }
}

impl LedgerSettings {
    /// Settings with no artificial latency and no fault injection.
    pub fn instant() -> Self {
        Self {
            latency_mean: Duration::ZERO,
            latency_std: Duration::ZERO,
            failure_rate: 0.0,
        }
    }
}

/// Failure to build the ledger. Maps to the fatal setup path of a run: no
/// batch is ever dispatched against a ledger that failed to connect.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("failure rate {0} is outside 0.0..=1.0")]
    InvalidFailureRate(f64),

    #[error("invalid latency distribution: {0}")]
    InvalidLatency(rand_distr::NormalError),
}

pub struct MockLedger {
    failure_rate: f64,
    latency: Normal<f64>,
    state: RwLock<HashMap<String, Value>>,
}

impl MockLedger {
    /// Build a ledger, validating settings the way a real gateway validates
    /// its connection profile.
    pub fn connect(settings: LedgerSettings) -> Result<Self, ConnectError> {
        if !(0.0..=1.0).contains(&settings.failure_rate) {
            return Err(ConnectError::InvalidFailureRate(settings.failure_rate));
        }
        let latency = Normal::new(
            settings.latency_mean.as_secs_f64() * 1e3,
            settings.latency_std.as_secs_f64() * 1e3,
        )
        .map_err(ConnectError::InvalidLatency)?;

        Ok(Self {
            failure_rate: settings.failure_rate,
            latency,
            state: RwLock::new(HashMap::new()),
        })
    }

    /// Number of records in the world state.
    pub fn record_count(&self) -> usize {
        self.read_state().len()
    }

    async fn simulate_commit(&self) {
        let ms = self.latency.sample(&mut rand::thread_rng()).max(0.0);
        if ms > 0.0 {
            tokio::time::sleep(Duration::from_secs_f64(ms / 1e3)).await;
        }
    }

    fn inject_fault(&self, transaction: &str) -> Result<(), TransactionError> {
        if self.failure_rate > 0.0 && rand::thread_rng().gen::<f64>() < self.failure_rate {
            debug!(transaction, "injecting endorsement failure");
            return Err(TransactionError::Rejected {
                transaction: transaction.to_string(),
                reason: "endorsement policy failure".to_string(),
            });
        }
        Ok(())
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Value>> {
        // Nothing panics while holding the lock.
        self.state.read().unwrap()
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Value>> {
        self.state.write().unwrap()
    }
}

#[async_trait]
impl TransactionExecutor for MockLedger {
    async fn submit(
        &self,
        transaction: &str,
        args: &[String],
    ) -> Result<Vec<u8>, TransactionError> {
        self.simulate_commit().await;
        self.inject_fault(transaction)?;

        match transaction {
            REGISTER_MEDICINE => {
                let [id, name, manufacturer, batch, manufactured, expiry] = args else {
                    return Err(invalid_args(transaction, 6, args.len()));
                };
                let record = json!({
                    "id": id,
                    "name": name,
                    "manufacturer": manufacturer,
                    "batch": batch,
                    "manufactured": manufactured,
                    "expiry": expiry,
                    "owner": "Manufacturer",
                });
                let bytes = record.to_string().into_bytes();
                self.write_state().insert(id.clone(), record);
                Ok(bytes)
            }
            UPDATE_MEDICINE_OWNER => {
                let [id, owner] = args else {
                    return Err(invalid_args(transaction, 2, args.len()));
                };
                let mut state = self.write_state();
                let Some(record) = state.get_mut(id) else {
                    return Err(TransactionError::NotFound(id.clone()));
                };
                record["owner"] = json!(owner);
                Ok(record.to_string().into_bytes())
            }
            other => Err(unknown_transaction(other)),
        }
    }

    async fn evaluate(
        &self,
        transaction: &str,
        args: &[String],
    ) -> Result<Vec<u8>, TransactionError> {
        self.simulate_commit().await;
        self.inject_fault(transaction)?;

        match transaction {
            READ_MEDICINE => {
                let [id] = args else {
                    return Err(invalid_args(transaction, 1, args.len()));
                };
                self.read_state()
                    .get(id)
                    .map(|record| record.to_string().into_bytes())
                    .ok_or_else(|| TransactionError::NotFound(id.clone()))
            }
            READ_ALL_MEDICINES => {
                let state = self.read_state();
                let mut records: Vec<(&String, &Value)> = state.iter().collect();
                records.sort_by(|a, b| a.0.cmp(b.0));
                let all: Vec<&Value> = records.into_iter().map(|(_, record)| record).collect();
                Ok(json!(all).to_string().into_bytes())
            }
            other => Err(unknown_transaction(other)),
        }
    }
}

fn invalid_args(transaction: &str, expected: usize, got: usize) -> TransactionError {
    TransactionError::InvalidArguments {
        transaction: transaction.to_string(),
        reason: format!("expected {expected} args, got {got}"),
    }
}

fn unknown_transaction(transaction: &str) -> TransactionError {
    TransactionError::Rejected {
        transaction: transaction.to_string(),
        reason: "unknown transaction".to_string(),
    }
}
