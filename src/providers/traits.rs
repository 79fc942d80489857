//! Provider traits and types

use crate::results::{ProviderProfile, Record};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Why a provider contributed nothing to a search
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("timed out after {after:?}")]
    Timeout { after: Duration },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("provider task failed: {0}")]
    Task(String),
}

impl ProviderError {
    pub fn parse(reason: impl fmt::Display) -> Self {
        Self::Parse(reason.to_string())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// A store whose fetch suspends on network I/O
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider key
    fn name(&self) -> &str;

    /// Display data attached to every record
    fn profile(&self) -> ProviderProfile;

    /// The store's own timeout in seconds, if it needs one
    fn timeout(&self) -> Option<f64> {
        None
    }

    /// Fetch up to `limit` products matching `query`
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Record>, ProviderError>;
}

/// A store whose fetch blocks the calling thread
pub trait BlockingProvider: Send + Sync {
    fn name(&self) -> &str;

    fn profile(&self) -> ProviderProfile;

    fn timeout(&self) -> Option<f64> {
        None
    }

    fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Record>, ProviderError>;
}

/// Kind of a capability, as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Blocking,
    Suspending,
}

/// A provider's fetch function, whatever its execution model
#[derive(Clone)]
pub enum Capability {
    Blocking(Arc<dyn BlockingProvider>),
    Suspending(Arc<dyn Provider>),
}

impl Capability {
    pub fn name(&self) -> &str {
        match self {
            Self::Blocking(p) => p.name(),
            Self::Suspending(p) => p.name(),
        }
    }

    pub fn profile(&self) -> ProviderProfile {
        match self {
            Self::Blocking(p) => p.profile(),
            Self::Suspending(p) => p.profile(),
        }
    }

    /// The provider's own timeout; `None` defers to configuration
    pub fn timeout(&self) -> Option<Duration> {
        let secs = match self {
            Self::Blocking(p) => p.timeout(),
            Self::Suspending(p) => p.timeout(),
        };
        secs.filter(|s| *s > 0.0).map(Duration::from_secs_f64)
    }

    pub fn kind(&self) -> CapabilityKind {
        match self {
            Self::Blocking(_) => CapabilityKind::Blocking,
            Self::Suspending(_) => CapabilityKind::Suspending,
        }
    }

    /// Start the fetch as its own task.
    ///
    /// Suspending providers run on the async scheduler, blocking ones on the
    /// blocking pool, so neither can starve the other. A panic inside the
    /// provider surfaces as a `JoinError` on the returned handle.
    pub fn invoke(
        &self,
        query: String,
        limit: usize,
    ) -> JoinHandle<Result<Vec<Record>, ProviderError>> {
        match self {
            Self::Suspending(provider) => {
                let provider = Arc::clone(provider);
                tokio::spawn(async move { provider.fetch(&query, limit).await })
            }
            Self::Blocking(provider) => {
                let provider = Arc::clone(provider);
                tokio::task::spawn_blocking(move || provider.fetch(&query, limit))
            }
        }
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}
