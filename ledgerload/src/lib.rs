//! Batched concurrent-transaction load generation against a ledger.
//!
//! A [`LoadGenerator`] drives a fixed volume of transactions against
//! anything implementing [`TransactionExecutor`], in fixed-width concurrent
//! batches with a join barrier between batches, and returns exact latency
//! and error statistics for the run.

pub mod executor;
pub mod generator;
pub mod workload;

pub(crate) mod collector;

pub use executor::{TransactionError, TransactionExecutor};
pub use generator::LoadGenerator;

pub mod prelude {
    pub use crate::executor::{TransactionError, TransactionExecutor};
    pub use crate::generator::LoadGenerator;
    pub use ledgerload_core::{LatencySummary, RunConfig, RunResults, Workload};
}
