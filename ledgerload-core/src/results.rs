use crate::{LatencySummary, RunConfig, Workload};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Aggregate outcome of a single load-generation run.
///
/// Built once after every batch has settled. The raw latency sequence is
/// kept in full so derived statistics stay exact.
#[derive(Debug, Clone)]
pub struct RunResults {
    pub success_count: u64,
    pub failure_count: u64,
    /// One entry per successful transaction, dispatch to settlement.
    pub latencies: Vec<Duration>,
    /// Rendered error message to occurrence count.
    pub error_counts: HashMap<String, u64>,
    /// Wall time from the first dispatch to the last settlement.
    pub elapsed: Duration,
}

impl RunResults {
    pub fn total(&self) -> u64 {
        self.success_count + self.failure_count
    }

    pub fn error_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.failure_count as f64 / self.total() as f64
        }
    }

    /// Successful transactions per second of wall time.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.success_count as f64 / secs
        } else {
            0.0
        }
    }

    pub fn latency_summary(&self) -> Option<LatencySummary> {
        LatencySummary::from_latencies(&self.latencies)
    }
}

impl fmt::Display for RunResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ok, {} failed ({:.2}% errors) in {:.2}s ({:.2} tx/s)",
            self.success_count,
            self.failure_count,
            self.error_rate() * 100.0,
            self.elapsed.as_secs_f64(),
            self.throughput(),
        )?;
        match self.latency_summary() {
            Some(summary) => writeln!(f, "latency: {summary}")?,
            None => writeln!(f, "latency: no successful transactions")?,
        }
        if !self.error_counts.is_empty() {
            writeln!(f, "errors:")?;
            let mut tallies: Vec<_> = self.error_counts.iter().collect();
            tallies.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (message, count) in tallies {
                writeln!(f, "  {count:>6}x {message}")?;
            }
        }
        Ok(())
    }
}

/// Serializable report for a completed profile run, as written by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub profile: String,
    pub workload: Workload,
    pub transactions: usize,
    pub concurrency: usize,
    pub batch_delay_ms: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub error_rate: f64,
    pub elapsed_secs: f64,
    pub throughput_tps: f64,
    pub latency: Option<LatencySummary>,
    pub errors: HashMap<String, u64>,
}

impl RunReport {
    pub fn new(profile: &str, config: &RunConfig, results: &RunResults) -> Self {
        Self {
            profile: profile.to_string(),
            workload: config.workload,
            transactions: config.transactions,
            concurrency: config.concurrency.get(),
            batch_delay_ms: config.batch_delay.as_millis() as u64,
            success_count: results.success_count,
            failure_count: results.failure_count,
            error_rate: results.error_rate(),
            elapsed_secs: results.elapsed.as_secs_f64(),
            throughput_tps: results.throughput(),
            latency: results.latency_summary(),
            errors: results.error_counts.clone(),
        }
    }
}
