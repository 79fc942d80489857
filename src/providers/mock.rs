//! Mock providers for testing.

use super::traits::{BlockingProvider, Capability, Provider, ProviderError};
use crate::results::{ProviderProfile, Record};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Succeed,
    Fail,
    Panic,
}

/// Configurable provider returning canned records after a delay
#[derive(Debug, Clone)]
pub struct MockProvider {
    name: String,
    records: Vec<Record>,
    delay: Duration,
    timeout: Option<f64>,
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
    last_limit: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            records: Vec::new(),
            delay: Duration::ZERO,
            timeout: None,
            behavior: Behavior::Succeed,
            calls: Arc::new(AtomicUsize::new(0)),
            last_limit: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Return `count` records named `<name>-<i>`
    pub fn returns(mut self, count: usize) -> Self {
        self.records = (0..count)
            .map(|i| Record::new(format!("{}-{}", self.name, i)))
            .collect();
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn timeout(mut self, secs: f64) -> Self {
        self.timeout = Some(secs);
        self
    }

    pub fn fails(mut self) -> Self {
        self.behavior = Behavior::Fail;
        self
    }

    pub fn panics(mut self) -> Self {
        self.behavior = Behavior::Panic;
        self
    }

    pub fn key(&self) -> &str {
        &self.name
    }

    /// Number of times fetch was entered
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Limit passed to the most recent fetch
    pub fn last_limit(&self) -> usize {
        self.last_limit.load(Ordering::SeqCst)
    }

    pub fn capability(&self) -> Capability {
        Capability::Suspending(Arc::new(self.clone()))
    }

    pub fn blocking(&self) -> Capability {
        Capability::Blocking(Arc::new(BlockingMock(self.clone())))
    }

    fn enter(&self, limit: usize) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);
    }

    fn finish(&self, limit: usize) -> Result<Vec<Record>, ProviderError> {
        match self.behavior {
            Behavior::Succeed => Ok(self.records.iter().take(limit).cloned().collect()),
            Behavior::Fail => Err(ProviderError::Status(503)),
            Behavior::Panic => panic!("mock provider {} panicked", self.name),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn profile(&self) -> ProviderProfile {
        ProviderProfile::new(self.name.to_uppercase())
    }

    fn timeout(&self) -> Option<f64> {
        self.timeout
    }

    async fn fetch(&self, _query: &str, limit: usize) -> Result<Vec<Record>, ProviderError> {
        self.enter(limit);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.finish(limit)
    }
}

/// The same mock, run on the blocking pool with a thread sleep
#[derive(Debug)]
pub struct BlockingMock(MockProvider);

impl BlockingProvider for BlockingMock {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn profile(&self) -> ProviderProfile {
        Provider::profile(&self.0)
    }

    fn timeout(&self) -> Option<f64> {
        self.0.timeout
    }

    fn fetch(&self, _query: &str, limit: usize) -> Result<Vec<Record>, ProviderError> {
        self.0.enter(limit);
        if !self.0.delay.is_zero() {
            std::thread::sleep(self.0.delay);
        }
        self.0.finish(limit)
    }
}

/// Names of `records`, for compact assertions
pub fn names(records: &[Record]) -> Vec<&str> {
    records.iter().filter_map(|r| r.name.as_deref()).collect()
}
