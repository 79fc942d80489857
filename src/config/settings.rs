//! Settings structures for materials-search configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub search: SearchSettings,
    pub providers: Vec<ProviderConfig>,
    /// City -> provider names, in search order
    pub cities: BTreeMap<String, Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            outgoing: OutgoingSettings::default(),
            search: SearchSettings::default(),
            providers: default_providers(),
            cities: default_cities(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (MATSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("MATSEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("MATSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("MATSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
    }

    /// Get provider config by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Get all enabled providers
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers.iter().filter(|p| !p.disabled).collect()
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "materials-search".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// HTTP client timeout in seconds, independent of provider timeouts
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 30.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Limit used by fan-out searches when the caller gives none
    pub default_limit: usize,
    /// Limit used by single-provider searches when the caller gives none
    pub default_provider_limit: usize,
    /// Largest limit a caller may request
    pub max_limit: usize,
    /// Records requested from each provider during a fan-out
    pub per_provider_limit: usize,
    pub min_query_length: usize,
    /// Provider timeout in seconds when neither config nor provider sets one
    pub default_timeout: f64,
    /// Upper bound for any provider timeout, in seconds
    pub max_timeout: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: 30,
            default_provider_limit: 20,
            max_limit: 100,
            per_provider_limit: 7,
            min_query_length: 1,
            default_timeout: crate::DEFAULT_TIMEOUT as f64,
            max_timeout: crate::MAX_TIMEOUT as f64,
        }
    }
}

/// Individual provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider key (unique identifier)
    pub name: String,
    /// Provider implementation to use
    pub provider: String,
    /// Whether provider is disabled
    pub disabled: bool,
    /// Custom timeout for this provider, in seconds
    pub timeout: Option<f64>,
    /// Override for the store root URL
    pub base_url: Option<String>,
    pub display_name: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            provider: String::new(),
            disabled: false,
            timeout: None,
            base_url: None,
            display_name: None,
        }
    }
}

impl ProviderConfig {
    pub fn new(name: &str, provider: &str) -> Self {
        Self {
            name: name.to_string(),
            provider: provider.to_string(),
            ..Default::default()
        }
    }

    fn with_timeout(mut self, secs: f64) -> Self {
        self.timeout = Some(secs);
        self
    }
}

/// Default provider configurations
fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new("sagosa", "sagosa").with_timeout(20.0),
        ProviderConfig::new("neomat", "neomat"),
        ProviderConfig::new("forte", "forte"),
        ProviderConfig::new("cfernandes", "cfernandes").with_timeout(20.0),
        ProviderConfig::new("perren", "perren").with_timeout(20.0),
    ]
}

fn default_cities() -> BTreeMap<String, Vec<String>> {
    fn city(providers: &[&str]) -> Vec<String> {
        providers.iter().map(|p| p.to_string()).collect()
    }

    BTreeMap::from([
        ("comodoro".to_string(), city(&["forte", "neomat", "sagosa"])),
        ("trelew".to_string(), city(&["sagosa", "cfernandes", "perren"])),
    ])
}
