//! Provider module
//!
//! Defines the provider contract and the registry and city routing built
//! on top of it, plus the store implementations.

mod cities;
mod loader;
#[cfg(test)]
pub(crate) mod mock;
mod parsing;
mod registry;
mod storefront;
mod traits;

// Store implementations
pub mod forte;
pub mod iqit;
pub mod neomat;
pub mod sagosa;

pub use cities::CityRouter;
pub use loader::ProviderLoader;
pub use parsing::parse_price;
pub use registry::{ProviderEntry, ProviderRegistry};
pub use storefront::Storefront;
pub use traits::*;
