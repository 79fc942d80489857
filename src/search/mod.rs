//! Search orchestration module
//!
//! Fans a query out to providers, absorbs their failures, and
//! aggregates what came back.

pub mod dispatcher;
mod error;
mod executor;
mod models;

pub use dispatcher::{dispatch, with_timeout, TimedCapability};
pub use error::SearchError;
pub use executor::Search;
pub use models::*;
