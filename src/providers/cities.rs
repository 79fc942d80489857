//! City to provider routing

use super::registry::{normalize_key, ProviderRegistry};
use crate::config::ConfigError;
use crate::search::SearchError;
use std::collections::BTreeMap;

/// Maps a city to the ordered providers that deliver there
#[derive(Debug, Clone, Default)]
pub struct CityRouter {
    cities: BTreeMap<String, Vec<String>>,
}

impl CityRouter {
    /// Build the router, checking every provider key against the registry
    pub fn new<I, K, V>(mapping: I, registry: &ProviderRegistry) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let mut cities = BTreeMap::new();

        for (city, providers) in mapping {
            let city = normalize_key(city.as_ref());
            let mut keys: Vec<String> = Vec::new();

            for provider in providers {
                let key = normalize_key(provider.as_ref());
                if !registry.contains(&key) {
                    return Err(ConfigError::UnknownCityProvider {
                        city,
                        provider: key,
                    });
                }
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }

            if keys.is_empty() {
                return Err(ConfigError::EmptyCity(city));
            }
            cities.insert(city, keys);
        }

        Ok(Self { cities })
    }

    /// Providers serving `city`, in configured order
    pub fn providers_for(&self, city: &str) -> Result<&[String], SearchError> {
        let city = normalize_key(city);
        self.cities
            .get(&city)
            .map(Vec::as_slice)
            .ok_or(SearchError::UnknownCity(city))
    }

    pub fn cities(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.cities.iter().map(|(c, p)| (c.as_str(), p.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
