//! Application state shared across handlers

use crate::config::{SearchSettings, Settings};
use crate::providers::{CityRouter, ProviderRegistry};
use crate::search::Search;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search executor
    pub search: Arc<Search>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, registry: ProviderRegistry, cities: CityRouter) -> Self {
        let search = Search::from_settings(&settings.search, Arc::new(registry), Arc::new(cities));
        Self::with_search(settings, search)
    }

    pub fn with_search(settings: Settings, search: Search) -> Self {
        Self {
            settings: Arc::new(settings),
            search: Arc::new(search),
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }

    pub fn limits(&self) -> &SearchSettings {
        &self.settings.search
    }
}
