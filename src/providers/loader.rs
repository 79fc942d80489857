//! Provider loader for initializing stores from configuration

use super::cities::CityRouter;
use super::forte::Forte;
use super::iqit::IqitStore;
use super::neomat::NeoMat;
use super::registry::{normalize_key, ProviderRegistry};
use super::sagosa::Sagosa;
use super::storefront::Storefront;
use super::traits::{BlockingProvider, Capability};
use crate::config::{ConfigError, ProviderConfig, SearchSettings, Settings};
use crate::network::{BlockingHttpClient, HttpClient};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Loader for initializing providers and cities from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Build the registry from enabled providers, then the city router over it
    pub fn load(settings: &Settings, client: &HttpClient) -> Result<(ProviderRegistry, CityRouter)> {
        let mut registry = ProviderRegistry::new();
        let blocking = Arc::new(BlockingHttpClient::with_settings(&settings.outgoing)?);

        for config in &settings.providers {
            if config.disabled {
                info!("Skipping disabled provider: {}", config.name);
                continue;
            }

            let capability = Self::create_provider(config, client, &blocking, &settings.search)
                .with_context(|| format!("failed to load provider {}", config.name))?;
            let timeout = Self::resolve_timeout(config, capability.timeout(), &settings.search);

            info!(
                "Loaded provider: {} ({}, {:?}, timeout {:?})",
                config.name,
                config.provider,
                capability.kind(),
                timeout
            );
            registry.register(&config.name, capability, timeout);
        }

        let cities = Self::enabled_cities(settings, &registry);
        let router = CityRouter::new(cities, &registry)?;

        info!("Loaded {} providers and {} cities", registry.len(), router.len());
        Ok((registry, router))
    }

    /// Create a provider instance by implementation name.
    ///
    /// Blocking stores bound their own requests, so they get the resolved
    /// timeout up front.
    fn create_provider(
        config: &ProviderConfig,
        client: &HttpClient,
        blocking: &Arc<BlockingHttpClient>,
        search: &SearchSettings,
    ) -> Result<Capability> {
        let capability = match config.provider.to_lowercase().as_str() {
            "sagosa" => {
                let site = Self::storefront(Sagosa::storefront(), config)?;
                Capability::Suspending(Arc::new(Sagosa::with_storefront(client.clone(), site)))
            }
            "neomat" => {
                let site = Self::storefront(NeoMat::storefront(), config)?;
                Capability::Suspending(Arc::new(NeoMat::with_storefront(client.clone(), site)))
            }
            "forte" => {
                let site = Self::storefront(Forte::storefront(), config)?;
                Capability::Suspending(Arc::new(Forte::with_storefront(client.clone(), site)))
            }
            "cfernandes" => {
                let site = Self::storefront(IqitStore::cfernandes_storefront(), config)?;
                let store = IqitStore::cfernandes(Arc::clone(blocking)).with_storefront(site);
                Self::bounded(store, config, search)
            }
            "perren" => {
                let site = Self::storefront(IqitStore::perren_storefront(), config)?;
                let store = IqitStore::perren(Arc::clone(blocking)).with_storefront(site);
                Self::bounded(store, config, search)
            }
            _ => {
                return Err(ConfigError::UnknownProviderType {
                    name: config.name.clone(),
                    provider: config.provider.clone(),
                }
                .into());
            }
        };

        Ok(capability)
    }

    /// Apply configured overrides to a store's defaults
    fn storefront(mut site: Storefront, config: &ProviderConfig) -> Result<Storefront> {
        if let Some(ref base_url) = config.base_url {
            Url::parse(base_url).with_context(|| format!("invalid base_url {base_url}"))?;
            site.base_url = base_url.clone();
        }
        if let Some(ref display_name) = config.display_name {
            site.display_name = display_name.clone();
        }
        Ok(site)
    }

    fn bounded(store: IqitStore, config: &ProviderConfig, search: &SearchSettings) -> Capability {
        let own = store.timeout().map(Duration::from_secs_f64);
        let timeout = Self::resolve_timeout(config, own, search);
        Capability::Blocking(Arc::new(store.with_timeout(timeout)))
    }

    /// Configured timeout, else the provider's own, else `default_timeout`;
    /// never above `max_timeout`
    fn resolve_timeout(
        config: &ProviderConfig,
        own: Option<Duration>,
        search: &SearchSettings,
    ) -> Duration {
        let timeout = config
            .timeout
            .filter(|secs| *secs > 0.0)
            .map(Duration::from_secs_f64)
            .or(own)
            .unwrap_or_else(|| Duration::from_secs_f64(search.default_timeout.max(0.0)));
        timeout.min(Duration::from_secs_f64(search.max_timeout.max(0.0)))
    }

    /// City lists without providers that are disabled in configuration
    fn enabled_cities(
        settings: &Settings,
        registry: &ProviderRegistry,
    ) -> BTreeMap<String, Vec<String>> {
        settings
            .cities
            .iter()
            .map(|(city, providers)| {
                let enabled = providers
                    .iter()
                    .filter(|name| {
                        let disabled = !registry.contains(name)
                            && settings.get_provider(name).is_some_and(|p| p.disabled);
                        if disabled {
                            warn!("City {} lists disabled provider {}", city, name);
                        }
                        !disabled
                    })
                    .map(|name| normalize_key(name))
                    .collect();
                (city.clone(), enabled)
            })
            .collect()
    }
}
