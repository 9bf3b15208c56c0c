use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Exact latency statistics over a completed run, in milliseconds.
///
/// Median is the mean of the two middle elements on even counts; p95 is the
/// nearest-rank quantile, `ceil(0.95 * n) - 1` into the ascending sort.
/// Exact values rather than a sketch, since the latency sequence of a run is
/// bounded and kept in full.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
}

impl LatencySummary {
    /// Returns `None` when no latency was observed.
    pub fn from_latencies(latencies: &[Duration]) -> Option<Self> {
        if latencies.is_empty() {
            return None;
        }

        // Via nanoseconds so integer-millisecond durations stay exact.
        let mut ms: Vec<f64> = latencies
            .iter()
            .map(|dur| dur.as_nanos() as f64 / 1e6)
            .collect();
        ms.sort_by(f64::total_cmp);

        Some(Self {
            mean_ms: statistical::mean(&ms),
            min_ms: ms[0],
            max_ms: ms[ms.len() - 1],
            median_ms: statistical::median(&ms),
            p95_ms: ms[nearest_rank(0.95, ms.len())],
        })
    }
}

impl fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean={:.2}ms min={:.2}ms max={:.2}ms p50={:.2}ms p95={:.2}ms",
            self.mean_ms, self.min_ms, self.max_ms, self.median_ms, self.p95_ms,
        )
    }
}

/// Zero-based nearest-rank index for `quantile` over `len` sorted samples.
fn nearest_rank(quantile: f64, len: usize) -> usize {
    let rank = (quantile * len as f64).ceil() as usize;
    rank.max(1) - 1
}
