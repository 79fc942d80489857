//! Metrics collection module
//!
//! Tracks provider performance, error rates, and usage statistics.

use crate::search::ProviderOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Number of response times kept per provider
const RESPONSE_WINDOW: usize = 100;

#[derive(Debug, Default)]
struct ProviderCounters {
    searches: u64,
    successes: u64,
    failures: u64,
    timeouts: u64,
    response_times: VecDeque<u64>,
    last_failure: Option<DateTime<Utc>>,
}

/// In-process metrics collector
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total search count
    total_searches: AtomicU64,
    providers: RwLock<HashMap<String, ProviderCounters>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the terminal state of one provider call
    pub fn record_outcome(&self, outcome: &ProviderOutcome) {
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let counters = providers.entry(outcome.provider.clone()).or_default();

        counters.searches += 1;
        match &outcome.result {
            Ok(_) => counters.successes += 1,
            Err(e) => {
                counters.failures += 1;
                if e.is_timeout() {
                    counters.timeouts += 1;
                }
                counters.last_failure = Some(Utc::now());
            }
        }

        if counters.response_times.len() >= RESPONSE_WINDOW {
            counters.response_times.pop_front();
        }
        counters
            .response_times
            .push_back(outcome.elapsed.as_millis() as u64);
    }

    /// Get total searches
    pub fn total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Get statistics for one provider
    pub fn provider_stats(&self, provider: &str) -> Option<ProviderStats> {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        providers.get(provider).map(ProviderStats::from)
    }

    /// Get all provider statistics, sorted by provider key
    pub fn snapshot(&self) -> MetricsSnapshot {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        MetricsSnapshot {
            total_searches: self.total_searches(),
            providers: providers
                .iter()
                .map(|(name, counters)| (name.clone(), ProviderStats::from(counters)))
                .collect(),
        }
    }
}

/// Statistics for a single provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStats {
    pub searches: u64,
    pub successes: u64,
    pub failures: u64,
    pub timeouts: u64,
    pub avg_response_ms: Option<u64>,
    /// Percentage of calls that succeeded
    pub reliability: f64,
    pub last_failure: Option<DateTime<Utc>>,
}

impl From<&ProviderCounters> for ProviderStats {
    fn from(c: &ProviderCounters) -> Self {
        let avg_response_ms = if c.response_times.is_empty() {
            None
        } else {
            Some(c.response_times.iter().sum::<u64>() / c.response_times.len() as u64)
        };
        let reliability = if c.searches == 0 {
            100.0
        } else {
            (c.successes as f64 / c.searches as f64) * 100.0
        };

        Self {
            searches: c.searches,
            successes: c.successes,
            failures: c.failures,
            timeouts: c.timeouts,
            avg_response_ms,
            reliability,
            last_failure: c.last_failure,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub providers: BTreeMap<String, ProviderStats>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use crate::results::{ProviderProfile, Record};
    use std::sync::Arc;
    use std::time::Duration;

    fn outcome(ms: u64, result: Result<Vec<Record>, ProviderError>) -> ProviderOutcome {
        ProviderOutcome {
            provider: "forte".to_string(),
            profile: Arc::new(ProviderProfile::new("Forte")),
            result,
            elapsed: Duration::from_millis(ms),
        }
    }

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_search();
        metrics.record_outcome(&outcome(100, Ok(vec![Record::new("cal")])));
        metrics.record_outcome(&outcome(
            300,
            Err(ProviderError::Timeout {
                after: Duration::from_millis(300),
            }),
        ));

        assert_eq!(metrics.total_searches(), 1);
        let stats = metrics.provider_stats("forte").unwrap();
        assert_eq!(stats.searches, 2);
        assert_eq!(stats.timeouts, 1);
        assert_eq!(stats.avg_response_ms, Some(200));
        assert_eq!(stats.reliability, 50.0);
        assert!(stats.last_failure.is_some());
    }

    #[test]
    fn test_response_window_is_bounded() {
        let metrics = Metrics::new();
        for _ in 0..RESPONSE_WINDOW {
            metrics.record_outcome(&outcome(1_000, Ok(vec![])));
        }
        for _ in 0..RESPONSE_WINDOW {
            metrics.record_outcome(&outcome(10, Ok(vec![])));
        }

        let stats = metrics.provider_stats("forte").unwrap();
        assert_eq!(stats.avg_response_ms, Some(10));
        assert_eq!(metrics.snapshot().providers.len(), 1);
    }
}
