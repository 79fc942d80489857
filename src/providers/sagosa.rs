//! Sagosa store (PrestaShop)

use super::parsing::{attr_of, encode_query, selector, text_of};
use super::storefront::Storefront;
use super::traits::{Provider, ProviderError};
use crate::network::HttpClient;
use crate::results::{ProviderProfile, Record, Stock};
use async_trait::async_trait;
use scraper::Html;
use tracing::debug;

const LOGO: &str = "https://acdn-us.mitiendanube.com/stores/001/258/599/themes/common/logo-1636121110-1663682413-ff5e07835dc96cbf78797acba0239c841663682413-480-0.webp";

pub struct Sagosa {
    client: HttpClient,
    site: Storefront,
}

impl Sagosa {
    pub fn with_storefront(client: HttpClient, site: Storefront) -> Self {
        Self { client, site }
    }

    pub fn storefront() -> Storefront {
        Storefront::new("Sagosa", "https://www.sagosa.com.ar/").branded(LOGO)
    }

    fn search_url(&self, query: &str) -> String {
        self.site.endpoint(&format!(
            "busqueda?controller=search&s={}",
            encode_query(query, "+")
        ))
    }
}

#[async_trait]
impl Provider for Sagosa {
    fn name(&self) -> &str {
        "sagosa"
    }

    fn profile(&self) -> ProviderProfile {
        self.site.profile()
    }

    fn timeout(&self) -> Option<f64> {
        Some(20.0)
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Record>, ProviderError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let html = self.client.fetch_page(&self.search_url(query)).await?;
        parse_products(&html, limit)
    }
}

/// Parse the `article.product-miniature` cards of a search page
pub fn parse_products(html: &str, limit: usize) -> Result<Vec<Record>, ProviderError> {
    let card = selector("article.product-miniature")?;
    let title = selector("h3.product-title a")?;
    let brand = selector(r#"[itemprop="brand"] meta[itemprop="name"]"#)?;
    let price = selector("span.price")?;
    let image = selector(r#"meta[itemprop="image"]"#)?;
    let availability = selector(r#"link[itemprop="availability"]"#)?;

    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for element in document.select(&card).take(limit) {
        let mut record = Record::default();
        record.id = element.value().attr("data-id-product").map(str::to_string);

        record.name = text_of(element, &title);
        record.link = attr_of(element, &title, "href");
        record.brand = attr_of(element, &brand, "content");

        if let Some(short) = text_of(element, &price) {
            record.price_number = attr_of(element, &price, "content").and_then(|c| c.parse().ok());
            record.price_short = Some(short);
        }

        if let Some(url) = attr_of(element, &image, "content") {
            record.image_url = url;
        }

        let in_stock = attr_of(element, &availability, "href")
            .map(|href| href.contains("InStock"))
            .unwrap_or(false);
        record.stock = Stock::from(in_stock);

        records.push(record);
    }

    debug!("sagosa: parsed {} products", records.len());
    Ok(records)
}
