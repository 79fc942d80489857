//! Result type definitions

use serde::{Deserialize, Serialize};
use url::Url;

/// A single normalized product returned by a provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store-side product identifier
    #[serde(rename = "product_id")]
    pub id: Option<String>,
    /// Product name
    pub name: Option<String>,
    /// Price as displayed by the store
    pub price_short: Option<String>,
    /// Price as a number, in pesos
    pub price_number: Option<f64>,
    /// Product image, or the provider placeholder
    #[serde(default)]
    pub image_url: String,
    /// Absolute link to the product page
    pub link: Option<String>,
    /// Availability
    #[serde(default)]
    pub stock: Stock,
    /// Display name of the originating provider
    #[serde(default)]
    pub source: String,
    #[serde(rename = "brandName")]
    pub brand: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "discountPercentage")]
    pub discount_percentage: Option<f64>,
    /// Provider logo
    pub logo: Option<String>,
}

impl Record {
    /// Create a record carrying only its name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn with_stock(mut self, stock: Stock) -> Self {
        self.stock = stock;
        self
    }

    /// Fill in provider-level defaults and make the link absolute.
    ///
    /// Fields the provider already set are left alone, except for a relative
    /// link, which is resolved against the profile's base URL.
    pub fn normalize(mut self, profile: &ProviderProfile) -> Self {
        if self.source.trim().is_empty() {
            self.source = profile.display_name.clone();
        }
        if self.image_url.trim().is_empty() {
            if let Some(ref placeholder) = profile.placeholder_image {
                self.image_url = placeholder.clone();
            }
        }
        if self.logo.is_none() {
            self.logo = profile.logo.clone();
        }
        if let Some(link) = self.link.take() {
            self.link = absolutize(&link, profile.base_url.as_ref());
        }
        self
    }
}

fn absolutize(link: &str, base: Option<&Url>) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }
    match Url::parse(link) {
        Ok(url) => Some(url.to_string()),
        Err(_) => match base {
            Some(base) => base.join(link).ok().map(|u| u.to_string()),
            None => Some(link.to_string()),
        },
    }
}

/// Tri-state availability, serialized as `1`, `0` or `null`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u8>", into = "Option<u8>")]
pub enum Stock {
    InStock,
    OutOfStock,
    #[default]
    Unknown,
}

impl From<Option<u8>> for Stock {
    fn from(value: Option<u8>) -> Self {
        match value {
            Some(0) => Stock::OutOfStock,
            Some(_) => Stock::InStock,
            None => Stock::Unknown,
        }
    }
}

impl From<Stock> for Option<u8> {
    fn from(stock: Stock) -> Self {
        match stock {
            Stock::InStock => Some(1),
            Stock::OutOfStock => Some(0),
            Stock::Unknown => None,
        }
    }
}

impl From<bool> for Stock {
    fn from(in_stock: bool) -> Self {
        if in_stock {
            Stock::InStock
        } else {
            Stock::OutOfStock
        }
    }
}

/// Display data a provider contributes to its records
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProviderProfile {
    /// Human readable store name, used as the record source
    pub display_name: String,
    /// Store root, used to resolve relative links
    pub base_url: Option<Url>,
    /// Image used when a product has none
    pub placeholder_image: Option<String>,
    /// Store logo
    pub logo: Option<String>,
}

impl ProviderProfile {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    /// Set the base URL; an unparsable URL is ignored
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Url::parse(url).ok();
        self
    }

    pub fn placeholder_image(mut self, url: impl Into<String>) -> Self {
        self.placeholder_image = Some(url.into());
        self
    }

    pub fn logo(mut self, url: impl Into<String>) -> Self {
        self.logo = Some(url.into());
        self
    }
}

/// Provider response timing information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timing {
    /// Provider key
    pub provider: String,
    /// Response time in milliseconds
    pub time_ms: u64,
    /// Number of records returned
    pub result_count: usize,
}
