//! DNS-over-HTTPS probe.

use async_trait::async_trait;
use dnsscope_core::{DnsScopeError, Result, DEFAULT_DOH_ENDPOINT, DEFAULT_DOH_PROVIDER, DEFAULT_DOH_TIMEOUT};
use reqwest::header::ACCEPT;
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Media type of the JSON DoH dialect
const DNS_JSON: &str = "application/dns-json";

/// Checks whether a public DoH endpoint answers for a domain
#[async_trait]
pub trait DohProbe: Send + Sync {
    /// Name of the probed endpoint's operator
    fn provider(&self) -> &str;

    /// Ask for the domain's A record; `Ok` means the endpoint answered with
    /// a success status, whatever the answer contained.
    async fn probe(&self, domain: &str) -> Result<()>;
}

/// [`DohProbe`] over reqwest using the JSON API
#[derive(Clone)]
pub struct DohClient {
    http: HttpClient,
    endpoint: Url,
    provider: String,
}

impl DohClient {
    /// Client for the default endpoint
    pub fn new() -> Result<Self> {
        DohClientBuilder::new().build()
    }

    /// Builder for custom configuration
    #[must_use]
    pub fn builder() -> DohClientBuilder {
        DohClientBuilder::new()
    }

    /// Endpoint URL
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl DohProbe for DohClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn probe(&self, domain: &str) -> Result<()> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("name", domain)
            .append_pair("type", "A");
        debug!(url = %url, "DoH request");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, DNS_JSON)
            .send()
            .await
            .map_err(|e| DnsScopeError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DnsScopeError::HttpStatus {
                code: status.as_u16(),
            })
        }
    }
}

/// Builder for configuring a [`DohClient`]
pub struct DohClientBuilder {
    endpoint: String,
    provider: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for DohClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DohClientBuilder {
    /// Builder with the default endpoint
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
            provider: DEFAULT_DOH_PROVIDER.to_string(),
            timeout: DEFAULT_DOH_TIMEOUT,
            user_agent: format!("dnsscope/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the endpoint URL (useful for testing)
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Set the provider name reported in assessments
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<DohClient> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| DnsScopeError::Config(format!("invalid DoH endpoint {}: {e}", self.endpoint)))?;

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| DnsScopeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(DohClient {
            http,
            endpoint,
            provider: self.provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> DohClient {
        DohClient::builder()
            .endpoint(format!("{}/dns-query", server.uri()))
            .provider("Test")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn success_status_means_supported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dns-query"))
            .and(query_param("name", "example.com"))
            .and(query_param("type", "A"))
            .and(header("accept", DNS_JSON))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"Status":0,"Answer":[]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.provider(), "Test");
        client.probe("example.com").await.unwrap();
    }

    #[tokio::test]
    async fn answer_content_is_irrelevant() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        client_for(&server).await.probe("example.com").await.unwrap();
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).await.probe("example.com").await.unwrap_err();
        assert!(matches!(err, DnsScopeError::HttpStatus { code: 503 }), "{err}");
    }

    #[test]
    fn invalid_endpoint_is_a_config_error() {
        let result = DohClient::builder().endpoint("not a url").build();
        assert!(matches!(result, Err(DnsScopeError::Config(_))));
    }
}
