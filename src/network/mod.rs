//! HTTP networking module
//!
//! Provides the HTTP clients providers use to reach the stores.

mod client;
mod user_agent;

pub use client::{BlockingHttpClient, HttpClient};
pub use user_agent::generate_user_agent;
