//! Stores running the PrestaShop iqitsearch module.
//!
//! Corralón Fernandes and Perren y Cía share the same markup, so one
//! blocking provider serves both through presets.

use super::parsing::{attr_of, encode_query, parse_price, selector, text_of};
use super::storefront::Storefront;
use super::traits::{BlockingProvider, ProviderError};
use crate::network::BlockingHttpClient;
use crate::results::{ProviderProfile, Record, Stock};
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How a store exposes availability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockRule {
    /// Listed products are always available
    Listed,
    /// A `span.badge-success` reading "Disponible" marks availability
    Badge,
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone)]
pub struct IqitStore {
    key: String,
    client: Arc<BlockingHttpClient>,
    site: Storefront,
    stock_rule: StockRule,
    timeout: Duration,
}

impl IqitStore {
    pub fn new(
        key: &str,
        client: Arc<BlockingHttpClient>,
        site: Storefront,
        stock_rule: StockRule,
    ) -> Self {
        Self {
            key: key.to_string(),
            client,
            site,
            stock_rule,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn cfernandes(client: Arc<BlockingHttpClient>) -> Self {
        Self::new(
            "cfernandes",
            client,
            Self::cfernandes_storefront(),
            StockRule::Listed,
        )
    }

    pub fn perren(client: Arc<BlockingHttpClient>) -> Self {
        Self::new("perren", client, Self::perren_storefront(), StockRule::Badge)
    }

    pub fn cfernandes_storefront() -> Storefront {
        Storefront::new("Corralón Fernandes", "https://www.corralon-fernandes.com/")
            .branded("https://www.corralon-fernandes.com/img/logo.png")
    }

    pub fn perren_storefront() -> Storefront {
        Storefront::new("Perren y Cía", "https://www.perrenycia.com.ar/")
            .branded("https://www.perrenycia.com.ar/img/logo.png")
    }

    pub fn with_storefront(mut self, site: Storefront) -> Self {
        self.site = site;
        self
    }

    /// Bound each page request to `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn search_url(&self, query: &str) -> String {
        self.site.endpoint(&format!(
            "module/iqitsearch/searchiqit?s={}",
            encode_query(query, "+")
        ))
    }
}

impl BlockingProvider for IqitStore {
    fn name(&self) -> &str {
        &self.key
    }

    fn profile(&self) -> ProviderProfile {
        self.site.profile()
    }

    fn timeout(&self) -> Option<f64> {
        Some(self.timeout.as_secs_f64())
    }

    fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Record>, ProviderError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let html = self.client.fetch_page(&self.search_url(query), self.timeout)?;
        parse_products(&html, limit, self.stock_rule)
    }
}

/// Parse the `div.js-product-miniature-wrapper` cards of a search page
pub fn parse_products(
    html: &str,
    limit: usize,
    stock_rule: StockRule,
) -> Result<Vec<Record>, ProviderError> {
    let card = selector("div.js-product-miniature-wrapper")?;
    let id_input = selector(r#"input[name="id_product"]"#)?;
    let title = selector("h2.product-title a")?;
    let category = selector("div.product-category-name")?;
    let brand = selector("div.product-brand a")?;
    let price = selector("span.product-price")?;
    let image = selector("img[data-src]")?;
    let badge = selector("span.badge-success")?;

    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for element in document.select(&card).take(limit) {
        let mut record = Record::default();
        record.id = attr_of(element, &id_input, "value")
            .or_else(|| element.value().attr("data-id-product").map(str::to_string));
        record.name = text_of(element, &title);
        record.link = attr_of(element, &title, "href");
        record.category = text_of(element, &category);
        record.brand = text_of(element, &brand);

        if let Some(short) = text_of(element, &price) {
            record.price_number = attr_of(element, &price, "content")
                .and_then(|c| c.parse().ok())
                .or_else(|| parse_price(&short));
            record.price_short = Some(short);
        }

        if let Some(src) = attr_of(element, &image, "data-src") {
            record.image_url = src;
        }

        record.stock = match stock_rule {
            StockRule::Listed => Stock::InStock,
            StockRule::Badge => Stock::from(
                text_of(element, &badge)
                    .map(|t| t.contains("Disponible"))
                    .unwrap_or(false),
            ),
        };

        records.push(record);
    }

    debug!("iqit: parsed {} products", records.len());
    Ok(records)
}
