use thiserror::Error;

/// Errors surfaced to the caller of a search.
///
/// Provider failures never appear here; they are absorbed by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("provider '{0}' is not supported")]
    UnknownProvider(String),
    #[error("no providers are configured for city '{0}'")]
    UnknownCity(String),
    #[error("search query must have at least {min_len} characters")]
    InvalidQuery { query: String, min_len: usize },
}
