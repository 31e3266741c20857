//! Activity reporter: aggregates the fetch log for `resonanze history`.

use std::collections::BTreeMap;

use crate::analytics::logger::FetchLogEntry;

/// Summary of logged fetch attempts.
#[derive(Debug, Default, PartialEq)]
pub struct FetchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub avg_latency_ms: u64,
    /// Failure count per kind, sorted by kind.
    pub failures_by_kind: BTreeMap<String, usize>,
}

impl FetchSummary {
    /// Success rate in percent, 0 when there are no entries.
    pub fn success_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total as f64 * 100.0
        }
    }
}

/// Aggregate a slice of log entries.
pub fn summarize(entries: &[FetchLogEntry]) -> FetchSummary {
    if entries.is_empty() {
        return FetchSummary::default();
    }

    let total = entries.len();
    let succeeded = entries.iter().filter(|e| e.is_success()).count();

    let mut failures_by_kind: BTreeMap<String, usize> = BTreeMap::new();
    for entry in entries.iter().filter(|e| !e.is_success()) {
        let kind = entry.error.clone().unwrap_or_else(|| "unknown".to_string());
        *failures_by_kind.entry(kind).or_default() += 1;
    }

    let latency_sum: u64 = entries.iter().map(|e| e.latency_ms).sum();

    FetchSummary {
        total,
        succeeded,
        failed: total - succeeded,
        avg_latency_ms: latency_sum / total as u64,
        failures_by_kind,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
