//! # HTTP Client
//!
//! One `reqwest` client shared by every service, with the bearer token
//! swapped in and out at runtime.
//!
//! ## Request Path
//! ```text
//! service (e.g. OrdersService::cancel)
//!     │  segments ["orders", id, "cancel"]
//!     ▼
//! ApiClient::post ──► endpoint() ──► base_url + encoded segments
//!     │
//!     ▼
//! execute() ──► Authorization: Bearer <token> (if signed in)
//!     │
//!     ├── no response ─────────────► ApiError (Network)
//!     ├── non-2xx ─────────────────► ApiError::from_response(status, body)
//!     └── 2xx ──► decode_body() ──► T   (bare or { "data": T })
//! ```

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::services::{
    AuthService, CategoriesService, ConversationsService, FavoritesService, OrdersService,
    PaymentsService, SettingsService, SuppliersService,
};

/// Client for the Bookit REST API.
///
/// Cheap to clone; clones share the connection pool and the token.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Builds a client from configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        config.validate()?;
        Self::with_base_url(config.base_url()?, config.timeout())
    }

    /// Builds a client for an explicit base URL.
    pub fn with_base_url(base_url: Url, timeout: std::time::Duration) -> ApiResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::config(format!("Base URL cannot have paths: {base_url}")));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bookit-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::config(format!("Failed to build HTTP client: {e}")))?;

        debug!(base_url = %base_url, timeout_secs = timeout.as_secs(), "API client created");

        Ok(ApiClient {
            inner: Arc::new(ApiClientInner {
                http,
                base_url,
                token: RwLock::new(None),
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Token
    // =========================================================================

    /// Installs the bearer token sent with every following request.
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.inner.token.write().await = Some(token.into());
        debug!("Bearer token installed");
    }

    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
        debug!("Bearer token cleared");
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.token.read().await.clone()
    }

    pub async fn has_token(&self) -> bool {
        self.inner.token.read().await.is_some()
    }

    // =========================================================================
    // Services
    // =========================================================================

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.clone())
    }

    pub fn categories(&self) -> CategoriesService {
        CategoriesService::new(self.clone())
    }

    pub fn suppliers(&self) -> SuppliersService {
        SuppliersService::new(self.clone())
    }

    pub fn orders(&self) -> OrdersService {
        OrdersService::new(self.clone())
    }

    pub fn payments(&self) -> PaymentsService {
        PaymentsService::new(self.clone())
    }

    pub fn conversations(&self) -> ConversationsService {
        ConversationsService::new(self.clone())
    }

    pub fn favorites(&self) -> FavoritesService {
        FavoritesService::new(self.clone())
    }

    pub fn settings(&self) -> SettingsService {
        SettingsService::new(self.clone())
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
        let request = self.request(Method::GET, segments)?;
        self.send(request).await
    }

    /// GET with a query string built from `query`'s fields.
    pub async fn get_with_query<T, Q>(&self, segments: &[&str], query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, segments)?.query(query);
        self.send(request).await
    }

    pub async fn post<T, B>(&self, segments: &[&str], body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, segments)?.json(body);
        self.send(request).await
    }

    /// POST whose response body is ignored.
    pub async fn post_empty<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> ApiResult<()> {
        let request = self.request(Method::POST, segments)?.json(body);
        self.execute(request).await.map(|_| ())
    }

    pub async fn put<T, B>(&self, segments: &[&str], body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, segments)?.json(body);
        self.send(request).await
    }

    pub async fn patch<T, B>(&self, segments: &[&str], body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PATCH, segments)?.json(body);
        self.send(request).await
    }

    /// DELETE; any 2xx (including 204) is success.
    pub async fn delete(&self, segments: &[&str]) -> ApiResult<()> {
        let request = self.request(Method::DELETE, segments)?;
        self.execute(request).await.map(|_| ())
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Base URL with `segments` appended, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::config("Base URL cannot have paths"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ApiResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        Ok(self.inner.http.request(method, url))
    }

    /// Sends the request and classifies any failure.
    async fn execute(&self, request: RequestBuilder) -> ApiResult<Response> {
        let request = match self.inner.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let request = request.build().map_err(ApiError::from)?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let started = Instant::now();

        let response = match self.inner.http.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, %path, error = %e, "Request failed without a response");
                return Err(ApiError::network(e.to_string()));
            }
        };

        let status = response.status();
        debug!(
            %method,
            %path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API response"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &body);
        if err.is_expected() {
            debug!(%method, %path, kind = %err.kind, message = %err.message, "API business error");
        } else {
            warn!(%method, %path, kind = %err.kind, message = %err.message, "API error");
        }
        Err(err)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.execute(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response: {e}")))?;
        decode_body(&bytes)
    }
}

/// Decodes a success body that is either the resource or `{ "data": ... }`.
pub fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> ApiResult<T> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| ApiError::decode(format!("Response is not JSON: {e}")))?;

    if let Some(data) = value.get("data") {
        if let Ok(inner) = serde_json::from_value::<T>(data.clone()) {
            return Ok(inner);
        }
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::decode(format!("Unexpected response shape: {e}")))
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::time::Duration;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: String,
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::with_base_url(Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_and_encodes() {
        let api = client("https://api.example.com/api");
        assert_eq!(
            api.endpoint(&["orders", "o 1/2", "cancel"]).unwrap().as_str(),
            "https://api.example.com/api/orders/o%201%2F2/cancel"
        );

        let trailing = client("https://api.example.com/api/");
        assert_eq!(
            trailing.endpoint(&["categories"]).unwrap().as_str(),
            "https://api.example.com/api/categories"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert!(ApiClient::with_base_url(url, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_decode_bare_and_enveloped() {
        let bare: Thing = decode_body(br#"{"id":"a"}"#).unwrap();
        assert_eq!(bare.id, "a");

        let wrapped: Thing = decode_body(br#"{"data":{"id":"b"}}"#).unwrap();
        assert_eq!(wrapped.id, "b");

        let list: Vec<Thing> = decode_body(br#"{"data":[{"id":"c"}]}"#).unwrap();
        assert_eq!(list, vec![Thing { id: "c".to_string() }]);
    }

    #[test]
    fn test_decode_failure_is_decode_kind() {
        let err = decode_body::<Thing>(b"<html>").unwrap_err();
        assert_eq!(err.kind, crate::ApiErrorKind::Decode);

        let err = decode_body::<Thing>(br#"{"name":"x"}"#).unwrap_err();
        assert_eq!(err.kind, crate::ApiErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_token_lifecycle() {
        let api = client("http://localhost:3000/api");
        assert!(!api.has_token().await);

        api.set_token("abc").await;
        let clone = api.clone();
        assert_eq!(clone.token().await.as_deref(), Some("abc"));

        clone.clear_token().await;
        assert!(!api.has_token().await);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) on loopback is closed on test machines.
        let api = client("http://127.0.0.1:9/api");
        let err = api.get::<Thing>(&["things"]).await.unwrap_err();
        assert!(err.is_network());
        assert!(!err.is_expected());
    }
}
