//! REST data source
//!
//! Pages are requested as `GET <base_url><resource>?page=<n>&<filter>=<value>`
//! with cookies kept in a per-client cookie store and, when a token is
//! held, a bearer Authorization header.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, trace};

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::paging::{Filters, PageRequest};

use super::auth::{SessionRefresher, TokenStore};
use super::PageSource;

/// Shared HTTP client for every view
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    refresh_endpoint: String,
    tokens: Arc<TokenStore>,
}

/// Response of the refresh endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// A page body: either a bare array or wrapped in `data`
#[derive(Deserialize)]
#[serde(untagged)]
enum PageBody<T> {
    Rows(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> PageBody<T> {
    fn into_rows(self) -> Vec<T> {
        match self {
            PageBody::Rows(rows) | PageBody::Wrapped { data: rows } => rows,
        }
    }
}

impl HttpClient {
    /// Create a client from the `[api]` configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is malformed or the underlying
    /// client cannot be built.
    pub fn new(config: &ApiConfig, tokens: Arc<TokenStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout()?)
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            refresh_endpoint: config.refresh_endpoint.clone(),
            tokens,
        })
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Absolute URL for a path relative to the base URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GET a list resource and decode its rows
    pub async fn get_rows<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> std::result::Result<Vec<T>, ApiError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let mut builder = self.client.get(&url).query(query);
        if let Some(token) = self.tokens.bearer() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status();
        trace!("Response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        decode_rows(&body)
    }
}

/// Decode a page body into rows
pub fn decode_rows<T: DeserializeOwned>(body: &str) -> std::result::Result<Vec<T>, ApiError> {
    serde_json::from_str::<PageBody<T>>(body)
        .map(PageBody::into_rows)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Query parameters for a page request: `page` first, then the filters
pub fn page_query<F: Filters>(request: &PageRequest<F>) -> Vec<(String, String)> {
    let mut query = vec![("page".to_string(), request.page.to_string())];
    query.extend(request.filters.query_pairs());
    query
}

fn network_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Network(format!("Request timed out: {}", e))
    } else {
        ApiError::Network(e.to_string())
    }
}

#[async_trait]
impl SessionRefresher for HttpClient {
    async fn refresh(&self) -> std::result::Result<(), ApiError> {
        let url = self.url(&self.refresh_endpoint);
        info!("Refreshing session at {}", url);

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        // Cookie-only sessions answer with an empty body
        let body = response.text().await.unwrap_or_default();
        if let Ok(RefreshResponse {
            access_token: Some(token),
        }) = serde_json::from_str::<RefreshResponse>(&body)
        {
            self.tokens.set(token);
        }
        Ok(())
    }
}

/// Page source for one REST resource
pub struct HttpPageSource<T> {
    client: Arc<HttpClient>,
    resource: String,
    _rows: PhantomData<fn() -> T>,
}

impl<T> HttpPageSource<T> {
    pub fn new(client: Arc<HttpClient>, resource: impl Into<String>) -> Self {
        Self {
            client,
            resource: resource.into(),
            _rows: PhantomData,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

#[async_trait]
impl<T, F> PageSource<T, F> for HttpPageSource<T>
where
    T: DeserializeOwned + Send + 'static,
    F: Filters,
{
    async fn fetch_page(&self, request: &PageRequest<F>) -> std::result::Result<Vec<T>, ApiError> {
        let query = page_query(request);
        self.client.get_rows(&self.resource, &query).await
    }
}
