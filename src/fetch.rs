use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};

use crate::errors::FetchError;

/// Simplified HTTP response consumed by the scan engine: status code,
/// raw body and a header multimap. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
    pub headers: HashMap<String, Vec<String>>,
}

impl HttpResponse {
    /// Case-insensitive header lookup. HTTP/2 transports hand back
    /// lowercase names while catalogs spell them `X-Like-This`.
    pub fn header_values(&self, key: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_slice())
    }

    /// True when `needle` occurs anywhere in the response body.
    pub fn body_contains(&self, needle: &str) -> bool {
        let needle = needle.as_bytes();
        if needle.is_empty() {
            return true;
        }
        self.body.windows(needle.len()).any(|w| w == needle)
    }
}

/// The one capability the scan engine needs from the transport.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// Reqwest-backed fetcher. Redirect policy is fixed at client construction,
/// which is why the coordinator holds two instances of this type.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Fetcher that follows up to 5 redirects.
    pub fn new(insecure: bool, timeout: Duration) -> Self {
        Self {
            client: base_builder(insecure, timeout)
                .redirect(reqwest::redirect::Policy::limited(5))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Fetcher that stops at the first response.
    pub fn no_redirect(insecure: bool, timeout: Duration) -> Self {
        Self {
            client: base_builder(insecure, timeout)
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

fn base_builder(insecure: bool, timeout: Duration) -> ClientBuilder {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(5))
        .gzip(true)
        .brotli(true)
        .use_rustls_tls()
        .danger_accept_invalid_certs(insecure)
        .user_agent(concat!("exposcan/", env!("CARGO_PKG_VERSION")))
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status_code = resp.status().as_u16();

        let mut headers: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in resp.headers() {
            headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        let body = resp
            .bytes()
            .await
            .map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })?
            .to_vec();

        Ok(HttpResponse {
            status_code,
            body,
            headers,
        })
    }
}
