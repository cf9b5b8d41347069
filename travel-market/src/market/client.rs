//! HTTP seller client.
//!
//! Reaches a remote seller exposing `POST /catalog` (see
//! [`crate::web::seller_router`]).

use futures::FutureExt;
use futures::future::BoxFuture;

use super::endpoint::SellerEndpoint;
use super::error::MarketError;
use super::protocol::{CatalogReply, CatalogRequest};

/// Default request timeout in milliseconds.
///
/// The aggregation window normally cuts a slow seller off long before this;
/// the timeout only keeps abandoned connections from lingering.
const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Configuration for a remote seller.
#[derive(Debug, Clone)]
pub struct HttpSellerConfig {
    /// Seller identifier
    pub id: String,
    /// Base URL of the seller (without the `/catalog` suffix)
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl HttpSellerConfig {
    /// Create a config for the seller `id` at `base_url`.
    pub fn new(id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Set request timeout.
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Parse a list of `id=url` pairs separated by commas.
    ///
    /// ```
    /// use travel_market::market::HttpSellerConfig;
    ///
    /// let configs = HttpSellerConfig::parse_list("a=http://localhost:4001, b=http://localhost:4002").unwrap();
    /// assert_eq!(configs.len(), 2);
    /// assert_eq!(configs[1].id, "b");
    /// ```
    pub fn parse_list(s: &str) -> Result<Vec<Self>, MarketError> {
        s.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (id, url) = entry
                    .split_once('=')
                    .ok_or_else(|| MarketError::Config(format!("expected id=url, got {entry:?}")))?;
                let (id, url) = (id.trim(), url.trim());
                if id.is_empty() || url.is_empty() {
                    return Err(MarketError::Config(format!(
                        "expected id=url, got {entry:?}"
                    )));
                }
                Ok(Self::new(id, url))
            })
            .collect()
    }
}

/// Seller reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSeller {
    id: String,
    http: reqwest::Client,
    url: String,
}

impl HttpSeller {
    /// Create a client for the configured seller.
    pub fn new(config: HttpSellerConfig) -> Result<Self, MarketError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            id: config.id,
            http,
            url: format!("{}/catalog", config.base_url.trim_end_matches('/')),
        })
    }

    /// Returns the full catalog URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, request: &CatalogRequest) -> Result<CatalogReply, MarketError> {
        let response = self.http.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| MarketError::Json {
            message: e.to_string(),
        })
    }
}

impl SellerEndpoint for HttpSeller {
    fn id(&self) -> &str {
        &self.id
    }

    fn ask_catalog(
        &self,
        request: CatalogRequest,
    ) -> BoxFuture<'_, Result<CatalogReply, MarketError>> {
        async move { self.post(&request).await }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = HttpSellerConfig::new("agency", "http://localhost:4001");
        assert_eq!(config.timeout_ms, 5_000);

        let config = config.with_timeout_ms(250);
        assert_eq!(config.timeout_ms, 250);
    }

    #[test]
    fn catalog_url_strips_trailing_slash() {
        let seller = HttpSeller::new(HttpSellerConfig::new("agency", "http://localhost:4001/")).unwrap();
        assert_eq!(seller.url(), "http://localhost:4001/catalog");
        assert_eq!(seller.id(), "agency");
    }

    #[test]
    fn parse_list_rejects_bad_entries() {
        assert!(HttpSellerConfig::parse_list("agency").is_err());
        assert!(HttpSellerConfig::parse_list("=http://x").is_err());
        assert!(HttpSellerConfig::parse_list("").unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_seller_is_an_error() {
        // Port 9 (discard) on localhost is essentially never served over HTTP
        let seller = HttpSeller::new(
            HttpSellerConfig::new("ghost", "http://127.0.0.1:9").with_timeout_ms(500),
        )
        .unwrap();

        let result = seller.ask_catalog(CatalogRequest::new("traveller")).await;
        assert!(result.is_err());
    }
}
