use std::num::NonZeroUsize;
use std::time::Duration;

/// Concurrency width used when a run does not specify one.
pub const DEFAULT_CONCURRENCY: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(10) };

/// Pause between batches used when a run does not specify one.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(100);

/// Progress is logged each time this many transactions have settled.
pub const DEFAULT_LOG_EVERY: u64 = 100;
