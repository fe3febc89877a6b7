//! Page fetcher
//!
//! The crawler only needs "request in, document out". [`Fetcher`] is that
//! seam; [`ProxyFetcher`] implements it over HTTP routed through a SOCKS proxy
//! (normally the local Tor daemon), so onion hostnames are resolved by the proxy.

use crate::config::EndpointConfig;
use crate::crawler::document::Document;
use crate::query::SearchRequest;
use crate::SiftError;
use reqwest::{Client, Proxy};
use std::future::Future;
use std::time::Duration;
use url::Url;

/// User agent sent with every request; matches the Tor Browser default
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; rv:115.0) Gecko/20100101 Firefox/115.0";

/// Source of result pages
///
/// Implementations must be safe to call from many tasks at once and share no
/// mutable state between calls.
pub trait Fetcher: Send + Sync + 'static {
    /// Fetches and parses the page for `request`
    ///
    /// # Errors
    ///
    /// * `SiftError::Transport` - connection, proxy or HTTP failure
    /// * `SiftError::Parse` - the response is not a usable page
    fn fetch(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Document, SiftError>> + Send;
}

/// Builds an HTTP client for the endpoint
///
/// Requests go through `config.proxy` when one is set. `socks5h` makes the
/// proxy resolve host names, which `.onion` addresses require.
///
/// # Example
///
/// ```no_run
/// use deepsift::config::EndpointConfig;
/// use deepsift::crawler::build_http_client;
///
/// let client = build_http_client(&EndpointConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &EndpointConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true);

    builder = match config.proxy_url() {
        Some(proxy) => builder.proxy(Proxy::all(proxy)?),
        None => builder.no_proxy(),
    };

    builder.build()
}

/// Fetcher for the configured endpoint
#[derive(Debug, Clone)]
pub struct ProxyFetcher {
    client: Client,
    base_url: Url,
}

impl ProxyFetcher {
    /// Creates a fetcher from the endpoint configuration
    pub fn new(config: &EndpointConfig) -> Result<Self, SiftError> {
        let client = build_http_client(config)?;
        let base_url = Url::parse(&config.base_url())?;
        Ok(Self { client, base_url })
    }

    /// Full URL a request is sent to
    pub fn url_for(&self, request: &SearchRequest) -> Result<Url, SiftError> {
        Ok(self.base_url.join(request.path())?)
    }
}

impl Fetcher for ProxyFetcher {
    async fn fetch(&self, request: &SearchRequest) -> Result<Document, SiftError> {
        let url = self.url_for(request)?;
        tracing::trace!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(request, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiftError::Transport {
                request: request.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(request, &e))?;

        Document::parse(request.clone(), &body)
    }
}

/// Classifies a reqwest failure into a transport error
fn transport_error(request: &SearchRequest, error: &reqwest::Error) -> SiftError {
    let message = if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        format!("connection through proxy failed: {}", error)
    } else {
        error.to_string()
    };

    SiftError::Transport {
        request: request.to_string(),
        message,
    }
}
