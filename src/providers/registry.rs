//! Provider registry for managing available stores

use super::traits::{Capability, CapabilityKind};
use crate::results::ProviderProfile;
use crate::search::SearchError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// A registered provider
#[derive(Debug, Clone)]
pub struct ProviderEntry {
    /// Lowercase provider key
    pub key: String,
    pub capability: Capability,
    /// Timeout applied to every call of this provider
    pub timeout: Duration,
    /// Display data, shared with every dispatch outcome
    pub profile: Arc<ProviderProfile>,
}

impl ProviderEntry {
    pub fn kind(&self) -> CapabilityKind {
        self.capability.kind()
    }
}

/// Registry of all configured providers.
///
/// Built once at startup and read-only afterwards. Iteration follows
/// registration order so fan-out results are deterministic.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    entries: Vec<ProviderEntry>,
    /// Key -> position in `entries`
    index: HashMap<String, usize>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under `key`.
    ///
    /// Keys are case-insensitive. Registering an existing key replaces the
    /// earlier entry in place.
    pub fn register(&mut self, key: &str, capability: Capability, default_timeout: Duration) {
        let key = normalize_key(key);
        let entry = ProviderEntry {
            key: key.clone(),
            profile: Arc::new(capability.profile()),
            capability,
            timeout: default_timeout,
        };

        match self.index.get(&key) {
            Some(&pos) => self.entries[pos] = entry,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Get a provider by key
    pub fn lookup(&self, key: &str) -> Result<&ProviderEntry, SearchError> {
        self.get(key)
            .ok_or_else(|| SearchError::UnknownProvider(normalize_key(key)))
    }

    pub fn get(&self, key: &str) -> Option<&ProviderEntry> {
        self.index
            .get(&normalize_key(key))
            .map(|&pos| &self.entries[pos])
    }

    /// All provider keys, in registration order
    pub fn all_keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    /// All entries, in registration order
    pub fn entries(&self) -> impl Iterator<Item = &ProviderEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(&normalize_key(key))
    }

    /// Get number of registered providers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
