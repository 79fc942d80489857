//! HTTP clients used by the store providers

use super::user_agent::{accept_html, accept_language, generate_user_agent};
use crate::config::OutgoingSettings;
use crate::providers::ProviderError;
use anyhow::Result;
use once_cell::sync::OnceCell;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Proxy};
use std::time::Duration;
use tracing::debug;

/// Async HTTP client shared by every suspending provider
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .default_headers(extra_headers(settings)?)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        for proxy in proxies(settings)? {
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            user_agent: generate_user_agent(),
        })
    }

    /// GET `url` and return the body of a successful response
    pub async fn fetch_page(&self, url: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, accept_html())
            .header(ACCEPT_LANGUAGE, accept_language())
            .send()
            .await?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

/// Blocking counterpart of [`HttpClient`], for providers on the blocking pool.
///
/// Headers and proxies are validated up front. The underlying client is
/// built on first use, which must happen on a blocking thread.
pub struct BlockingHttpClient {
    headers: HeaderMap,
    proxies: Vec<Proxy>,
    verify_ssl: bool,
    pool_maxsize: usize,
    user_agent: String,
    client: OnceCell<reqwest::blocking::Client>,
}

impl BlockingHttpClient {
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        Ok(Self {
            headers: extra_headers(settings)?,
            proxies: proxies(settings)?,
            verify_ssl: settings.verify_ssl,
            pool_maxsize: settings.pool_maxsize,
            user_agent: generate_user_agent(),
            client: OnceCell::new(),
        })
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, ProviderError> {
        self.client.get_or_try_init(|| {
            let mut builder = reqwest::blocking::Client::builder()
                .pool_max_idle_per_host(self.pool_maxsize)
                .default_headers(self.headers.clone())
                .danger_accept_invalid_certs(!self.verify_ssl)
                .gzip(true)
                .brotli(true);
            for proxy in &self.proxies {
                builder = builder.proxy(proxy.clone());
            }
            Ok(builder.build()?)
        })
    }

    /// GET `url` with a per-request `timeout`; must only run on a blocking thread
    pub fn fetch_page(&self, url: &str, timeout: Duration) -> Result<String, ProviderError> {
        let response = self
            .client()?
            .get(url)
            .timeout(timeout)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, accept_html())
            .header(ACCEPT_LANGUAGE, accept_language())
            .send()?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        Ok(response.text()?)
    }
}

fn extra_headers(settings: &OutgoingSettings) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (key, value) in &settings.extra_headers {
        headers.insert(
            HeaderName::from_bytes(key.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }
    Ok(headers)
}

fn proxies(settings: &OutgoingSettings) -> Result<Vec<Proxy>> {
    let proxies = &settings.proxies;
    if let Some(ref all) = proxies.all {
        return Ok(vec![Proxy::all(all)?]);
    }

    let mut out = Vec::new();
    if let Some(ref http) = proxies.http {
        out.push(Proxy::http(http)?);
    }
    if let Some(ref https) = proxies.https {
        out.push(Proxy::https(https)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_extra_header_is_rejected() {
        let mut settings = OutgoingSettings::default();
        settings
            .extra_headers
            .insert("bad header".to_string(), "x".to_string());
        assert!(HttpClient::with_settings(&settings).is_err());
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/busqueda"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let body = client
            .fetch_page(&format!("{}/busqueda", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_page_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let err = client.fetch_page(&server.uri()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status(403)));
    }

    #[test]
    fn test_invalid_proxy_is_rejected() {
        let mut settings = OutgoingSettings::default();
        settings.proxies.all = Some("http://bad host:3128".to_string());
        assert!(HttpClient::with_settings(&settings).is_err());
        assert!(BlockingHttpClient::with_settings(&settings).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_fetch_sends_extra_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("x-store-client", "materials-search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hola"))
            .mount(&server)
            .await;

        let mut settings = OutgoingSettings::default();
        settings
            .extra_headers
            .insert("x-store-client".to_string(), "materials-search".to_string());
        let client = Arc::new(BlockingHttpClient::with_settings(&settings).unwrap());

        let url = server.uri();
        let body = tokio::task::spawn_blocking(move || client.fetch_page(&url, Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(body, "hola");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_fetch_honours_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = Arc::new(BlockingHttpClient::new().unwrap());
        let url = server.uri();
        let start = std::time::Instant::now();
        let result = tokio::task::spawn_blocking(move || {
            client.fetch_page(&url, Duration::from_millis(200))
        })
        .await
        .unwrap();

        assert!(matches!(result, Err(ProviderError::Network(ref e)) if e.is_timeout()));
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
