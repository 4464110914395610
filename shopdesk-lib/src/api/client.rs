//! HTTP client for the back-office REST API

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::query::ListQuery;
use super::resource::Resource;
use super::response::{BackendResponse, ListEnvelope, Paginated, ResponseEnvelope};
use crate::error::ApiError;

/// Client for the back-office REST API.
///
/// Cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// let client = ApiClient::builder()
///     .base_url("https://api.shop.example/v1")
///     .token(session_token)
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// let page = client
///     .list::<serde_json::Value>(Resource::Products, &params.to_list_query())
///     .await?;
/// grid.set_data(page.into());
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    base_url: Url,
    token: Option<String>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("authenticated", &self.inner.token.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ApiClientBuilder<Missing> {
        ApiClientBuilder::new()
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// URL of a resource collection, or of one record when `id` is given.
    pub fn resource_url(&self, resource: Resource, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?;
            segments.pop_if_empty().push(resource.path());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Fetches one page of a resource.
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        query: &ListQuery,
    ) -> Result<Paginated<T>, ApiError> {
        let mut url = self.resource_url(resource, None)?;
        url.query_pairs_mut().extend_pairs(query.to_query_pairs());

        log::debug!("GET {url}");
        let envelope: ListEnvelope<T> = self.send(Method::GET, url, None::<&()>).await?;
        Ok(envelope.response)
    }

    /// Fetches a single record.
    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &str,
    ) -> Result<BackendResponse<T>, ApiError> {
        let url = self.resource_url(resource, Some(id))?;
        self.send_record(Method::GET, url, None::<&()>).await
    }

    /// Creates a record.
    pub async fn create<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        resource: Resource,
        body: &B,
    ) -> Result<BackendResponse<T>, ApiError> {
        let url = self.resource_url(resource, None)?;
        self.send_record(Method::POST, url, Some(body)).await
    }

    /// Replaces fields of an existing record.
    pub async fn update<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &str,
        body: &B,
    ) -> Result<BackendResponse<T>, ApiError> {
        let url = self.resource_url(resource, Some(id))?;
        self.send_record(Method::PUT, url, Some(body)).await
    }

    /// Deletes a record.
    pub async fn delete(
        &self,
        resource: Resource,
        id: &str,
    ) -> Result<BackendResponse<serde_json::Value>, ApiError> {
        let url = self.resource_url(resource, Some(id))?;
        self.send_record(Method::DELETE, url, None::<&()>).await
    }

    /// Send a request whose body is a single-record envelope.
    async fn send_record<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<BackendResponse<T>, ApiError> {
        log::debug!("{method} {url}");
        let envelope: ResponseEnvelope<T> = self.send(method, url, body).await?;
        Ok(envelope.response)
    }

    async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let mut request = self.inner.http_client.request(method, url);

        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::http(status.as_u16(), text));
        }

        serde_json::from_str(&text).map_err(|e| ApiError::parse_with_body(e.to_string(), text))
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`ApiClient`].
///
/// The base URL is required; `build` is only available once it is set.
pub struct ApiClientBuilder<Base> {
    base_url: Base,
    token: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl ApiClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: Missing,
            token: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the API base URL, e.g. `https://api.shop.example/v1`.
    pub fn base_url(self, url: impl Into<String>) -> ApiClientBuilder<Set<String>> {
        ApiClientBuilder {
            base_url: Set(url.into()),
            token: self.token,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for ApiClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> ApiClientBuilder<B> {
    /// Sets the session token sent as a bearer credential.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

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

impl ApiClientBuilder<Set<String>> {
    /// Builds the [`ApiClient`].
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base_url = Url::parse(&self.base_url.0)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.base_url.0)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.base_url.0));
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

        Ok(ApiClient {
            inner: Arc::new(ApiClientInner {
                base_url,
                token: self.token,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
