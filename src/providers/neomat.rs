//! NeoMat store (Tiendanube)

use super::parsing::{attr_of, encode_query, first_srcset, selector, text_of};
use super::storefront::Storefront;
use super::traits::{Provider, ProviderError};
use crate::network::HttpClient;
use crate::results::{ProviderProfile, Record, Stock};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const LOGO: &str = "https://acdn-us.mitiendanube.com/stores/002/199/725/themes/common/logo-882666800-1659546188-17c7b31dcb7291c808ccb2d33fd16e0b1659546188-480-0.png?0";

pub struct NeoMat {
    client: HttpClient,
    site: Storefront,
}

impl NeoMat {
    pub fn with_storefront(client: HttpClient, site: Storefront) -> Self {
        Self { client, site }
    }

    pub fn storefront() -> Storefront {
        Storefront::new("NeoMat", "https://neomat.com.ar/").branded(LOGO)
    }
}

#[async_trait]
impl Provider for NeoMat {
    fn name(&self) -> &str {
        "neomat"
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
            .endpoint(&format!("search/?q={}", encode_query(query, "+")));
        let html = self.client.fetch_page(&url).await?;
        parse_products(&html, limit)
    }
}

/// First entry of a card's `data-variants` attribute
#[derive(Debug, Deserialize)]
struct Variant {
    product_id: Option<Value>,
    price_short: Option<String>,
    price_number: Option<f64>,
    stock: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct StructuredItem {
    #[serde(default)]
    brand: Option<Brand>,
}

#[derive(Debug, Deserialize)]
struct Brand {
    name: Option<String>,
}

struct Selectors {
    structured: Selector,
    container: Selector,
    name: Selector,
    image: Selector,
    link: Selector,
}

/// Parse the `div.js-item-product` cards of a search page.
///
/// Cards whose embedded JSON is missing or malformed are skipped.
pub fn parse_products(html: &str, limit: usize) -> Result<Vec<Record>, ProviderError> {
    let card = selector("div.js-item-product")?;
    let selectors = Selectors {
        structured: selector(
            r#"script[type="application/ld+json"][data-component="structured-data.item"]"#,
        )?,
        container: selector("div.js-product-container")?,
        name: selector("div.js-item-name")?,
        image: selector("img.js-product-item-image-private")?,
        link: selector("a.js-product-item-image-link-private")?,
    };

    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for element in document.select(&card).take(limit) {
        match parse_card(element, &selectors) {
            Ok(record) => records.push(record),
            Err(e) => debug!("neomat: skipping product card: {}", e),
        }
    }

    debug!("neomat: parsed {} products", records.len());
    Ok(records)
}

fn parse_card(element: ElementRef<'_>, s: &Selectors) -> Result<Record, ProviderError> {
    let structured = element
        .select(&s.structured)
        .next()
        .map(|script| script.text().collect::<String>())
        .ok_or_else(|| ProviderError::parse("missing structured data"))?;
    let variants = attr_of(element, &s.container, "data-variants")
        .ok_or_else(|| ProviderError::parse("missing data-variants"))?;

    let item: StructuredItem = serde_json::from_str(&structured).map_err(ProviderError::parse)?;
    let variants: Vec<Variant> = serde_json::from_str(&variants).map_err(ProviderError::parse)?;
    let variant = variants
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::parse("empty data-variants"))?;

    let mut record = Record::default();
    record.id = variant.product_id.map(|id| match id {
        Value::String(s) => s,
        other => other.to_string(),
    });
    record.name = text_of(element, &s.name);
    record.price_short = variant.price_short;
    record.price_number = variant.price_number;
    record.stock = match variant.stock {
        Some(0) => Stock::OutOfStock,
        Some(_) => Stock::InStock,
        None => Stock::Unknown,
    };
    record.brand = item.brand.and_then(|b| b.name);
    record.link = attr_of(element, &s.link, "href");
    if let Some(srcset) = attr_of(element, &s.image, "data-srcset") {
        record.image_url = first_srcset(&srcset).unwrap_or_default();
    }

    Ok(record)
}
