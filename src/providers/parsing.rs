//! HTML helpers shared by the store scrapers

use super::traits::ProviderError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

static PRICE_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d,\.]").unwrap());

/// Compile a CSS selector
pub(crate) fn selector(css: &str) -> Result<Selector, ProviderError> {
    Selector::parse(css).map_err(|e| ProviderError::parse(format!("selector {css}: {e}")))
}

/// Whitespace-collapsed text of an element, `None` when blank
pub(crate) fn text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Text of the first descendant matching `selector`
pub(crate) fn text_of(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().and_then(text)
}

/// Attribute of the first descendant matching `selector`
pub(crate) fn attr_of(element: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse an Argentine price such as `$ 12.345,67`.
///
/// Dots are thousands separators and the comma is the decimal mark.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned = PRICE_NOISE.replace_all(text, "");
    let normalized = cleaned.replace('.', "").replace(',', ".");
    normalized.parse().ok()
}

/// First URL of a `srcset` attribute
pub(crate) fn first_srcset(srcset: &str) -> Option<String> {
    srcset
        .split_whitespace()
        .next()
        .map(|s| s.trim_end_matches(',').to_string())
}

/// Encode a query for a store search URL, with spaces as `space`
pub(crate) fn encode_query(query: &str, space: &str) -> String {
    query
        .split_whitespace()
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join(space)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$ 12.345,67"), Some(12345.67));
        assert_eq!(parse_price("$1.200"), Some(1200.0));
        assert_eq!(parse_price("850,5"), Some(850.5));
        assert_eq!(parse_price("Consultar"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn test_first_srcset() {
        assert_eq!(
            first_srcset("//cdn/a-480.webp 480w, //cdn/a-640.webp 640w").as_deref(),
            Some("//cdn/a-480.webp")
        );
        assert_eq!(first_srcset("  "), None);
    }

    #[test]
    fn test_encode_query() {
        assert_eq!(encode_query("cemento  portland", "+"), "cemento+portland");
        assert_eq!(encode_query("caño 1/2", "%20"), "ca%C3%B1o%201%2F2");
    }

    #[test]
    fn test_text_helpers() {
        let html = Html::parse_fragment(
            r#"<div><h3 class="t"> Cal
                 hidratada </h3><a class="l" href=" /p/1 ">x</a><span class="e"> </span></div>"#,
        );
        let root = html.root_element();
        assert_eq!(
            text_of(root, &selector("h3.t").unwrap()).as_deref(),
            Some("Cal hidratada")
        );
        assert_eq!(
            attr_of(root, &selector("a.l").unwrap(), "href").as_deref(),
            Some("/p/1")
        );
        assert_eq!(text_of(root, &selector("span.e").unwrap()), None);
        assert!(selector("div[").is_err());
    }
}
