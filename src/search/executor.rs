//! Search execution and orchestration

use super::dispatcher::{dispatch, execute};
use super::error::SearchError;
use super::models::{ProviderCall, ProviderOutcome, SearchQuery};
use crate::config::SearchSettings;
use crate::metrics::Metrics;
use crate::providers::{CityRouter, ProviderEntry, ProviderRegistry};
use crate::results::{self, Record, Timing};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

/// Search executor that coordinates searching across providers.
///
/// Holds only immutable configuration; every search is independent.
pub struct Search {
    /// Provider registry
    registry: Arc<ProviderRegistry>,
    /// City routing table
    cities: Arc<CityRouter>,
    metrics: Arc<Metrics>,
    /// Most records requested from one provider during a fan-out
    per_provider_limit: usize,
    min_query_length: usize,
    /// Upper bound applied to every provider timeout
    max_timeout: Duration,
}

impl Search {
    /// Create a new search executor
    pub fn new(registry: Arc<ProviderRegistry>, cities: Arc<CityRouter>) -> Self {
        Self {
            registry,
            cities,
            metrics: Arc::new(Metrics::new()),
            per_provider_limit: 7,
            min_query_length: 1,
            max_timeout: Duration::from_secs(crate::MAX_TIMEOUT),
        }
    }

    /// Create a search executor configured from settings
    pub fn from_settings(
        settings: &SearchSettings,
        registry: Arc<ProviderRegistry>,
        cities: Arc<CityRouter>,
    ) -> Self {
        Self::new(registry, cities)
            .with_per_provider_limit(settings.per_provider_limit)
            .with_min_query_length(settings.min_query_length)
            .with_max_timeout(Duration::from_secs_f64(settings.max_timeout.max(0.0)))
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_per_provider_limit(mut self, limit: usize) -> Self {
        self.per_provider_limit = limit;
        self
    }

    /// Queries shorter than this are rejected; never below one character
    pub fn with_min_query_length(mut self, len: usize) -> Self {
        self.min_query_length = len.max(1);
        self
    }

    /// Set maximum timeout
    pub fn with_max_timeout(mut self, timeout: Duration) -> Self {
        self.max_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn cities(&self) -> &CityRouter {
        &self.cities
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Search every registered provider.
    ///
    /// Precondition: `query` is non-empty after trimming, otherwise
    /// `InvalidQuery`. Provider failures only reduce the result.
    pub async fn search_all(&self, query: &str, limit: usize) -> Result<Vec<Record>, SearchError> {
        let query = self.validate(query, limit)?;
        let span = info_span!("search", request_id = %Uuid::new_v4(), mode = "all", query = %query.query);

        self.fan_out(self.registry.entries(), &query)
            .instrument(span)
            .await
    }

    /// Search a single provider directly.
    ///
    /// Fails with `UnknownProvider` before anything is fetched. The call still
    /// runs under the provider's own timeout; a failure yields an empty list.
    pub async fn search_provider(
        &self,
        provider: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Record>, SearchError> {
        let entry = self.registry.lookup(provider)?;
        let query = self.validate(query, limit)?;
        let span = info_span!(
            "search",
            request_id = %Uuid::new_v4(),
            mode = "provider",
            provider = %entry.key,
            query = %query.query
        );

        async {
            self.metrics.inc_search();
            let call = ProviderCall::from_entry(entry, self.max_timeout);
            let outcome = execute(call, &query.query, query.limit).await;

            Ok(self.aggregate(vec![outcome], query.limit, query.limit))
        }
        .instrument(span)
        .await
    }

    /// Search the providers configured for `city`.
    ///
    /// The limit caps the combined list, not each provider.
    pub async fn search_city(
        &self,
        city: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Record>, SearchError> {
        let keys = self.cities.providers_for(city)?;
        let query = self.validate(query, limit)?;
        let span = info_span!(
            "search",
            request_id = %Uuid::new_v4(),
            mode = "city",
            city = %city.trim().to_lowercase(),
            query = %query.query
        );

        let entries = keys.iter().filter_map(|key| self.registry.get(key));
        self.fan_out(entries, &query).instrument(span).await
    }

    fn validate(&self, raw: &str, limit: usize) -> Result<SearchQuery, SearchError> {
        let query = SearchQuery::new(raw, limit);
        if query.len() < self.min_query_length {
            return Err(SearchError::InvalidQuery {
                query: query.query,
                min_len: self.min_query_length,
            });
        }
        Ok(query)
    }

    async fn fan_out<'a>(
        &self,
        entries: impl Iterator<Item = &'a ProviderEntry>,
        query: &SearchQuery,
    ) -> Result<Vec<Record>, SearchError> {
        self.metrics.inc_search();

        let per_provider = query.limit.min(self.per_provider_limit);
        if per_provider == 0 {
            return Ok(Vec::new());
        }

        let calls: Vec<ProviderCall> = entries
            .map(|entry| ProviderCall::from_entry(entry, self.max_timeout))
            .collect();

        info!(
            "Executing search '{}' on {} providers",
            query.query,
            calls.len()
        );

        let outcomes = dispatch(calls, &query.query, per_provider).await;
        Ok(self.aggregate(outcomes, per_provider, query.limit))
    }

    /// Record metrics, then flatten and truncate
    fn aggregate(&self, outcomes: Vec<ProviderOutcome>, per_provider: usize, limit: usize) -> Vec<Record> {
        for outcome in &outcomes {
            self.metrics.record_outcome(outcome);
        }

        let responded = outcomes.iter().filter(|o| o.is_success()).count();
        let total = outcomes.len();
        let timings: Vec<Timing> = outcomes.iter().map(ProviderOutcome::timing).collect();

        let records = results::truncate(results::flatten(outcomes, per_provider), limit);

        debug!(
            ?timings,
            "{} of {} providers responded, returning {} records",
            responded,
            total,
            records.len()
        );

        records
    }
}
