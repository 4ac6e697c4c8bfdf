//! HTTP record source

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::api::RecordSource;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::Fields;
use crate::model::IndexTable;
use crate::model::Query;
use crate::model::RawPage;

/// [`RecordSource`] backed by the sales records HTTP API.
///
/// This client is cheap to clone (uses `Arc` internally).
///
/// | Operation | Request |
/// |-----------|---------|
/// | sellers | `GET {base}/sellers` |
/// | customers | `GET {base}/customers` |
/// | records | `GET {base}/records?{query}` |
/// | create | `POST {base}/records` |
/// | update | `PUT {base}/records/{id}` |
/// | delete | `DELETE {base}/records/{id}` |
///
/// # Example
///
/// ```ignore
/// use salesgrid_lib::ServerApi;
///
/// let api = ServerApi::builder()
///     .base_url("http://localhost:3002/api")
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct ServerApi {
    inner: Arc<ServerApiInner>,
}

struct ServerApiInner {
    base_url: String,
    http_client: Client,
    timeout: Option<Duration>,
}

impl ServerApi {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ServerApiBuilder<Missing> {
        ServerApiBuilder::new()
    }

    /// Returns the base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Builds `{base}/{segments...}`, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let path = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let raw = format!("{}/{}", self.inner.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Builds the records URL with `query` encoded as URL parameters.
    pub(crate) fn records_url(&self, query: &Query) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["records"])?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    /// Sends a request and returns the raw body of a successful response.
    async fn send(&self, method: Method, url: Url, body: Option<&Fields>) -> Result<String, Error> {
        log::debug!("{} {}", method, url);

        let mut request = self.inner.http_client.request(method, url);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from)?;

        if status.is_success() {
            Ok(text)
        } else {
            Err(ApiError::http(status.as_u16(), text).into())
        }
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&Fields>,
    ) -> Result<T, Error> {
        let text = self.send(method, url, body).await?;
        parse_json(&text)
    }
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    serde_json::from_str(text)
        .map_err(|e| ApiError::parse_with_body(e.to_string(), text).into())
}

#[async_trait]
impl RecordSource for ServerApi {
    async fn fetch_sellers(&self) -> Result<IndexTable, Error> {
        let url = self.endpoint(&["sellers"])?;
        self.request_json(Method::GET, url, None).await
    }

    async fn fetch_customers(&self) -> Result<IndexTable, Error> {
        let url = self.endpoint(&["customers"])?;
        self.request_json(Method::GET, url, None).await
    }

    async fn fetch_records(&self, query: &Query) -> Result<RawPage, Error> {
        let url = self.records_url(query)?;
        self.request_json(Method::GET, url, None).await
    }

    async fn create_record(&self, fields: &Fields) -> Result<Value, Error> {
        let url = self.endpoint(&["records"])?;
        self.request_json(Method::POST, url, Some(fields)).await
    }

    async fn update_record(&self, id: &str, fields: &Fields) -> Result<Value, Error> {
        let url = self.endpoint(&["records", id])?;
        self.request_json(Method::PUT, url, Some(fields)).await
    }

    async fn delete_record(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint(&["records", id])?;
        let text = self.send(Method::DELETE, url, None).await?;
        // Some servers echo the deleted record, some send nothing.
        if !text.trim().is_empty() {
            parse_json::<Value>(&text)?;
        }
        Ok(())
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`ServerApi`].
///
/// The base URL is required and checked at compile time.
pub struct ServerApiBuilder<U> {
    base_url: U,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl ServerApiBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the API base URL, e.g. `http://localhost:3002/api`.
    pub fn base_url(self, url: impl Into<String>) -> ServerApiBuilder<Set<String>> {
        ServerApiBuilder {
            base_url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for ServerApiBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> ServerApiBuilder<U> {
    /// Sets the per-request timeout.
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

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl ServerApiBuilder<Set<String>> {
    /// Builds the [`ServerApi`], validating the base URL.
    pub fn build(self) -> Result<ServerApi, Error> {
        let base_url = self.base_url.0;
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::from)?
            }
        };

        Ok(ServerApi {
            inner: Arc::new(ServerApiInner {
                base_url,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> ServerApi {
        ServerApi::builder()
            .base_url("http://localhost:3002/api/")
            .build()
            .unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let url = api().endpoint(&["records", "42"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3002/api/records/42");
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let url = api().endpoint(&["records", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3002/api/records/a%2Fb%20c");
    }

    #[test]
    fn test_records_url_encodes_query() {
        let query = Query::new().with("page", 1).with("filter[seller]", "Ann Lee");
        let url = api().records_url(&query).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3002/api/records?filter%5Bseller%5D=Ann+Lee&page=1"
        );
        assert_eq!(api().records_url(&Query::new()).unwrap().query(), None);
    }

    #[test]
    fn test_build_rejects_invalid_url() {
        let err = ServerApi::builder().base_url("not a url").build().err().unwrap();
        assert!(matches!(err, Error::Api(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_error_keeps_body() {
        let err = parse_json::<RawPage>("<html>oops</html>").unwrap_err();
        match err {
            Error::Api(api) => assert_eq!(api.body(), Some("<html>oops</html>")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
