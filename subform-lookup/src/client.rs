//! HTTP client for the lookup endpoints

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::cascade::CascadeKind;
use crate::error::LookupError;
use crate::options::OptionItem;
use crate::postal::PostalAddress;

/// Default postal-code service.
pub const DEFAULT_POSTAL_BASE_URL: &str = "https://viacep.com.br/ws";

/// Client for the application's option endpoints and the postal-code service.
///
/// Cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// let client = LookupClient::builder()
///     .base_url("https://example.com/app/")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let cities = client.options(CascadeKind::CitiesByState, "sp-hash").await?;
/// ```
#[derive(Debug, Clone)]
pub struct LookupClient {
    inner: Arc<LookupClientInner>,
}

#[derive(Debug)]
struct LookupClientInner {
    base_url: String,
    postal_base_url: String,
    http_client: Client,
    timeout: Option<Duration>,
}

impl LookupClient {
    pub fn builder() -> LookupClientBuilder<Missing> {
        LookupClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn postal_base_url(&self) -> &str {
        &self.inner.postal_base_url
    }

    /// Fetches the child options of a cascade for the parent's value.
    pub async fn options(&self, kind: CascadeKind, parent_value: &str) -> Result<Vec<OptionItem>, LookupError> {
        let url = join(&self.inner.base_url, &kind.path(parent_value))?;
        self.get_json(url).await
    }

    /// Looks up a postal code. `cep` must already be stripped of separators.
    pub async fn postal_address(&self, cep: &str) -> Result<PostalAddress, LookupError> {
        let url = join(&self.inner.postal_base_url, &format!("{cep}/json/"))?;
        let value: serde_json::Value = self.get_json(url).await?;
        PostalAddress::from_value(value, cep)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, LookupError> {
        debug!("GET {}", url);

        let mut request = self.inner.http_client.get(url);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LookupError::http(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| LookupError::parse_with_body(e.to_string(), body))
    }
}

/// Joins `path` onto `base`, tolerating a trailing slash on the base.
pub(crate) fn join(base: &str, path: &str) -> Result<Url, LookupError> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&raw).map_err(|e| LookupError::InvalidUrl(format!("{raw}: {e}")))
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`LookupClient`].
///
/// The application base URL is required; everything else has a default.
pub struct LookupClientBuilder<Base> {
    base_url: Base,
    postal_base_url: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl LookupClientBuilder<Missing> {
    pub fn new() -> Self {
        Self {
            base_url: Missing,
            postal_base_url: DEFAULT_POSTAL_BASE_URL.to_string(),
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the application base URL the option endpoints live under.
    pub fn base_url(self, url: impl Into<String>) -> LookupClientBuilder<Set<String>> {
        LookupClientBuilder {
            base_url: Set(url.into()),
            postal_base_url: self.postal_base_url,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for LookupClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> LookupClientBuilder<B> {
    /// Sets the postal-code service base URL.
    ///
    /// Defaults to [`DEFAULT_POSTAL_BASE_URL`].
    pub fn postal_base_url(mut self, url: impl Into<String>) -> Self {
        self.postal_base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// Ignored when a custom HTTP client is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl LookupClientBuilder<Set<String>> {
    /// Builds the [`LookupClient`], checking both base URLs.
    pub fn build(self) -> Result<LookupClient, LookupError> {
        for url in [&self.base_url.0, &self.postal_base_url] {
            Url::parse(url).map_err(|e| LookupError::InvalidUrl(format!("{url}: {e}")))?;
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(LookupClient {
            inner: Arc::new(LookupClientInner {
                base_url: self.base_url.0,
                postal_base_url: self.postal_base_url,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_handles_slashes() {
        let url = join("http://localhost/app/", "/states/7/cities").unwrap();
        assert_eq!(url.as_str(), "http://localhost/app/states/7/cities");

        let url = join("https://viacep.com.br/ws", "01001000/json/").unwrap();
        assert_eq!(url.as_str(), "https://viacep.com.br/ws/01001000/json/");
    }

    #[test]
    fn test_build_rejects_bad_base() {
        let err = LookupClient::builder().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, LookupError::InvalidUrl(_)));
    }

    #[test]
    fn test_build_defaults() {
        let client = LookupClient::builder()
            .base_url("http://localhost:8080/app")
            .build()
            .unwrap();
        assert_eq!(client.postal_base_url(), DEFAULT_POSTAL_BASE_URL);
        assert_eq!(client.base_url(), "http://localhost:8080/app");
    }
}
