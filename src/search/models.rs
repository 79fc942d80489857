//! Search request and dispatch data models

use crate::providers::{Capability, ProviderEntry, ProviderError};
use crate::results::{ProviderProfile, Record, Timing};
use std::sync::Arc;
use std::time::Duration;

/// What the dispatcher runs for one provider
#[derive(Debug, Clone)]
pub struct ProviderCall {
    /// Provider key
    pub provider: String,
    pub capability: Capability,
    pub timeout: Duration,
    pub profile: Arc<ProviderProfile>,
}

impl ProviderCall {
    pub fn new(provider: impl Into<String>, capability: Capability, timeout: Duration) -> Self {
        let profile = Arc::new(capability.profile());
        Self {
            provider: provider.into(),
            capability,
            timeout,
            profile,
        }
    }

    /// Build a call from a registry entry, clamping its timeout to `max_timeout`
    pub fn from_entry(entry: &ProviderEntry, max_timeout: Duration) -> Self {
        Self {
            provider: entry.key.clone(),
            capability: entry.capability.clone(),
            timeout: entry.timeout.min(max_timeout),
            profile: Arc::clone(&entry.profile),
        }
    }
}

/// The terminal state of one provider call
#[derive(Debug)]
pub struct ProviderOutcome {
    /// Provider key
    pub provider: String,
    pub profile: Arc<ProviderProfile>,
    /// Records, or the reason there are none
    pub result: Result<Vec<Record>, ProviderError>,
    pub elapsed: Duration,
}

impl ProviderOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn result_count(&self) -> usize {
        self.result.as_ref().map(Vec::len).unwrap_or(0)
    }

    pub fn timing(&self) -> Timing {
        Timing {
            provider: self.provider.clone(),
            time_ms: self.elapsed.as_millis() as u64,
            result_count: self.result_count(),
        }
    }
}

/// A validated search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Trimmed, lowercased query text
    pub query: String,
    pub limit: usize,
}

impl SearchQuery {
    /// Normalize `raw`; an empty or short query is rejected by the caller
    pub fn new(raw: &str, limit: usize) -> Self {
        Self {
            query: raw.trim().to_lowercase(),
            limit,
        }
    }

    /// Check if query is empty
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// Length in characters, not bytes
    pub fn len(&self) -> usize {
        self.query.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_normalization() {
        let query = SearchQuery::new("  Cemento PORTLAND ", 10);
        assert_eq!(query.query, "cemento portland");
        assert_eq!(query.limit, 10);
        assert!(!query.is_empty());
    }

    #[test]
    fn test_blank_query_is_empty() {
        assert!(SearchQuery::new(" \t ", 10).is_empty());
    }

    #[test]
    fn test_len_counts_characters() {
        assert_eq!(SearchQuery::new("ñandú", 1).len(), 5);
    }
}
