//! materials-search: concurrent product search across construction-material stores
//!
//! Fans a query out to every configured store, waits for each under its own
//! timeout and merges whatever arrived, in provider order.

pub mod config;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use providers::{BlockingProvider, Capability, Provider, ProviderLoader};
pub use results::Record;
pub use search::{Search, SearchError};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for provider requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 15;

/// Maximum timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;
