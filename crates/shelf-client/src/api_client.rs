//! ApiClient - REST API implementation for the inventory backend.
//!
//! Single point of contact with the remote API: builds authenticated JSON
//! requests, maps failures into typed errors, and parses responses. No
//! caching and no retries; both are the application layer's concern.

use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use shelf_core::config::ApiConfig;
use shelf_core::error::{Result, ShelfError};
use shelf_core::product::{
    CreateProductData, Product, ProductListing, ProductRepository, UpdateProductData,
};
use shelf_core::session::AuthApi;

/// HTTP client for the inventory REST API.
///
/// Session-scoped: the owner constructs one client per session and injects
/// the current token via [`ApiClient::set_token`] before issuing requests.
/// The token lives behind a lock so a shared `Arc<ApiClient>` can be
/// re-pointed when the session changes.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Creates a client for the configured endpoint, with no token set.
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            token: RwLock::new(None),
        }
    }

    /// Creates a client from environment/file configuration.
    pub fn from_env() -> Self {
        Self::new(&ApiConfig::load())
    }

    /// Sets the initial token during construction.
    pub fn with_token(self, token: impl Into<String>) -> Self {
        *self.token.write().expect("token lock poisoned") = Some(token.into());
        self
    }

    /// Returns the base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    /// Builds a request with the JSON content type and, when a token is set,
    /// the `Authorization: Bearer` header.
    fn request_builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "sending {method} request");
        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.bearer() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        request
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(map_transport_error)
    }

    /// Sends the request and parses a 2xx JSON body into `T`.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status.as_u16(), body));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ShelfError::parse(format!("Failed to parse response body: {err}")))
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<String> {
        let request = self
            .request_builder(Method::POST, "/auth/login")
            .json(&LoginRequest { username, password });
        let response: LoginResponse = self.execute(request).await?;
        Ok(response.token)
    }
}

#[async_trait]
impl ProductRepository for ApiClient {
    fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") = token;
    }

    async fn list(&self) -> Result<Vec<ProductListing>> {
        self.execute(self.request_builder(Method::GET, "/products"))
            .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Product> {
        self.execute(self.request_builder(Method::GET, &format!("/products/{id}")))
            .await
    }

    async fn create(&self, data: &CreateProductData) -> Result<Product> {
        let request = self.request_builder(Method::POST, "/products").json(data);
        self.execute(request).await
    }

    async fn update(&self, id: &str, data: &UpdateProductData) -> Result<Product> {
        let request = self
            .request_builder(Method::PUT, &format!("/products/{id}"))
            .json(data);
        self.execute(request).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .send(self.request_builder(Method::DELETE, &format!("/products/{id}")))
            .await?;
        ensure_deleted(response.status().as_u16(), id)
    }

    async fn suggest_tags(&self, name: &str, description: &str) -> Result<Vec<String>> {
        let request = self
            .request_builder(Method::POST, "/suggest-tags/suggest-tags")
            .json(&SuggestTagsRequest { name, description });
        let response = self.send(request).await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        parse_suggest_response(status.as_u16(), status.is_success(), &body)
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Serialize)]
struct SuggestTagsRequest<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Deserialize, Default)]
struct SuggestTagsResponse {
    #[serde(rename = "suggestedTags", default)]
    suggested_tags: Option<Vec<String>>,
    #[serde(default)]
    message: Option<String>,
}

/// Maps a non-2xx response to [`ShelfError::Http`].
///
/// The server's body text becomes the message; an empty body falls back to a
/// generic `HTTP error {status}` message.
fn map_http_error(status: u16, body: String) -> ShelfError {
    let message = if body.trim().is_empty() {
        format!("HTTP error! status: {status}")
    } else {
        body
    };
    ShelfError::http(status, message)
}

/// Maps a reqwest failure to [`ShelfError`].
///
/// Decode failures count as parse errors; everything else is transport.
fn map_transport_error(err: reqwest::Error) -> ShelfError {
    if err.is_decode() {
        ShelfError::parse(err.to_string())
    } else {
        ShelfError::transport(err.to_string())
    }
}

/// Checks the delete response status.
///
/// The endpoint answers exactly 204 No Content on success; the body is never
/// read, since an empty body is not valid JSON. Any other status, including
/// other 2xx codes, is a failure.
fn ensure_deleted(status: u16, id: &str) -> Result<()> {
    if status != 204 {
        return Err(ShelfError::http(
            status,
            format!("Failed to delete product with id {id}. Status: {status}"),
        ));
    }
    Ok(())
}

/// Interprets the suggest-tags response envelope.
///
/// On a non-ok status the server-provided `message` field is preferred over
/// a generic failure; on ok the `suggestedTags` field is returned, defaulting
/// to an empty list when absent.
fn parse_suggest_response(status: u16, ok: bool, body: &str) -> Result<Vec<String>> {
    if !ok {
        let parsed: SuggestTagsResponse = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(ShelfError::http(
            status,
            format!("Failed to suggest tags: {message}"),
        ));
    }

    let parsed: SuggestTagsResponse = serde_json::from_str(body)
        .map_err(|err| ShelfError::parse(format!("Failed to parse suggestion response: {err}")))?;
    Ok(parsed.suggested_tags.unwrap_or_default())
}
