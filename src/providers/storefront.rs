//! Per-store site data

use crate::results::ProviderProfile;

/// Where a store lives and how its records are labelled
#[derive(Debug, Clone, PartialEq)]
pub struct Storefront {
    /// Store root, e.g. `https://www.sagosa.com.ar/`
    pub base_url: String,
    pub display_name: String,
    pub placeholder_image: Option<String>,
    pub logo: Option<String>,
}

impl Storefront {
    pub fn new(display_name: &str, base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            display_name: display_name.to_string(),
            placeholder_image: None,
            logo: None,
        }
    }

    /// Use `url` both as the product placeholder and the store logo
    pub fn branded(mut self, url: &str) -> Self {
        self.placeholder_image = Some(url.to_string());
        self.logo = Some(url.to_string());
        self
    }

    /// Absolute URL for a path relative to the store root
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn profile(&self) -> ProviderProfile {
        let mut profile = ProviderProfile::new(&self.display_name).base_url(&self.base_url);
        profile.placeholder_image = self.placeholder_image.clone();
        profile.logo = self.logo.clone();
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_once() {
        let site = Storefront::new("Sagosa", "https://www.sagosa.com.ar/");
        assert_eq!(
            site.endpoint("/busqueda?s=cal"),
            "https://www.sagosa.com.ar/busqueda?s=cal"
        );
        let site = Storefront::new("Local", "http://127.0.0.1:9000");
        assert_eq!(site.endpoint("search/?q=x"), "http://127.0.0.1:9000/search/?q=x");
    }

    #[test]
    fn test_profile() {
        let profile = Storefront::new("Forte", "https://www.forteindustrial.com.ar/")
            .branded("https://cdn.example/logo.webp")
            .profile();
        assert_eq!(profile.display_name, "Forte");
        assert!(profile.base_url.is_some());
        assert_eq!(profile.logo.as_deref(), Some("https://cdn.example/logo.webp"));
        assert_eq!(
            profile.placeholder_image.as_deref(),
            Some("https://cdn.example/logo.webp")
        );
    }
}
