//! Product records and their aggregation
//!
//! Defines the normalized record schema every provider maps into, and the
//! single flatten/truncate pipeline used by every search mode.

pub mod aggregator;
mod types;

pub use aggregator::{flatten, truncate};
pub use types::*;
