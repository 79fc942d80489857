//! Forte Industrial store (Magento)
//!
//! Product cards carry only the image and link; names, prices and ids come
//! from the `ga4DataLayer` analytics payload embedded in the page. Both lists
//! are in page order and are joined pairwise.

use super::parsing::{attr_of, encode_query, first_srcset, selector};
use super::storefront::Storefront;
use super::traits::{Provider, ProviderError};
use crate::network::HttpClient;
use crate::results::{ProviderProfile, Record, Stock};
use async_trait::async_trait;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const LOGO: &str = "https://media.xcons.com.ar/media/logo/stores/137/new-logo-desktop.webp";

pub struct Forte {
    client: HttpClient,
    site: Storefront,
}

impl Forte {
    pub fn with_storefront(client: HttpClient, site: Storefront) -> Self {
        Self { client, site }
    }

    pub fn storefront() -> Storefront {
        Storefront::new("Forte", "https://www.forteindustrial.com.ar/").branded(LOGO)
    }
}

#[async_trait]
impl Provider for Forte {
    fn name(&self) -> &str {
        "forte"
    }

    fn profile(&self) -> ProviderProfile {
        self.site.profile()
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Record>, ProviderError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let url = self
            .site
            .endpoint(&format!("search/?q={}", encode_query(query, "%20")));
        let html = self.client.fetch_page(&url).await?;
        parse_products(&html, limit)
    }
}

#[derive(Debug, Deserialize)]
struct Ga4Item {
    item_id: Option<String>,
    item_name: Option<String>,
    price: Option<f64>,
    item_category_3: Option<String>,
}

/// Pull `["*"].ga4DataLayer.data[0].ecommerce.items` out of the payload
fn ga4_items(payload: &str) -> Result<Vec<Ga4Item>, ProviderError> {
    let parsed: Value = serde_json::from_str(payload.trim()).map_err(ProviderError::parse)?;
    let items = parsed
        .pointer("/*/ga4DataLayer/data/0/ecommerce/items")
        .cloned()
        .ok_or_else(|| ProviderError::parse("ga4DataLayer has no ecommerce items"))?;
    serde_json::from_value(items).map_err(ProviderError::parse)
}

/// Parse a search page: `ol.products li.product-item` joined with the
/// `ga4DataLayer` items.
///
/// A page without a product list, or without the analytics script, has no
/// results.
pub fn parse_products(html: &str, limit: usize) -> Result<Vec<Record>, ProviderError> {
    let list = selector("ol.products")?;
    let card = selector("li.product-item")?;
    let script = selector("script")?;
    let image = selector("img.product-image-photo")?;
    let link = selector("a[href]")?;

    let document = Html::parse_document(html);
    let Some(list) = document.select(&list).next() else {
        return Ok(Vec::new());
    };

    let Some(payload) = document
        .select(&script)
        .map(|s| s.text().collect::<String>())
        .find(|text| text.contains("ga4DataLayer"))
    else {
        debug!("forte: no ga4DataLayer script on page");
        return Ok(Vec::new());
    };
    let items = ga4_items(&payload)?;

    let records: Vec<Record> = list
        .select(&card)
        .zip(items)
        .take(limit)
        .map(|(element, item)| {
            let mut record = Record::default();
            record.brand = item
                .item_id
                .as_deref()
                .and_then(|id| id.split('-').next())
                .map(str::to_string);
            record.id = item.item_id;
            record.name = item.item_name;
            record.price_short = item.price.map(|p| p.to_string());
            record.price_number = item.price;
            record.category = item.item_category_3;
            record.stock = Stock::InStock;
            record.image_url = attr_of(element, &image, "srcset")
                .and_then(|srcset| first_srcset(&srcset))
                .unwrap_or_default();
            record.link = attr_of(element, &link, "href");
            record
        })
        .collect();

    debug!("forte: parsed {} products", records.len());
    Ok(records)
}
