use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Capability for executing named transactions against a ledger.
///
/// `submit` is state-changing, `evaluate` is read-only. Connection setup,
/// identity resolution and chaincode routing all live behind the
/// implementation; the generator only ever sees these two operations.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    /// Submit a state-changing transaction and return its serialized result.
    async fn submit(&self, transaction: &str, args: &[String])
        -> Result<Vec<u8>, TransactionError>;

    /// Evaluate a read-only transaction and return its serialized result.
    async fn evaluate(
        &self,
        transaction: &str,
        args: &[String],
    ) -> Result<Vec<u8>, TransactionError>;
}

#[async_trait]
impl<E> TransactionExecutor for Arc<E>
where
    E: TransactionExecutor + ?Sized,
{
    async fn submit(
        &self,
        transaction: &str,
        args: &[String],
    ) -> Result<Vec<u8>, TransactionError> {
        (**self).submit(transaction, args).await
    }

    async fn evaluate(
        &self,
        transaction: &str,
        args: &[String],
    ) -> Result<Vec<u8>, TransactionError> {
        (**self).evaluate(transaction, args).await
    }
}

/// Failure of a single `submit`/`evaluate` attempt.
///
/// The kind is decided at the executor boundary, where the underlying SDK
/// error is first caught; callers branch on the variant, never on message
/// contents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("`{0}` does not exist")]
    NotFound(String),

    #[error("transaction `{transaction}` rejected: {reason}")]
    Rejected { transaction: String, reason: String },

    #[error("invalid arguments for `{transaction}`: {reason}")]
    InvalidArguments { transaction: String, reason: String },

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}
