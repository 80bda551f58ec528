//! Product repository trait.
//!
//! Defines the interface for product data access against the remote API.

use async_trait::async_trait;

use super::model::{CreateProductData, Product, ProductListing, UpdateProductData};
use crate::error::Result;

/// An abstract repository for product records.
///
/// This trait defines the contract for reading and writing products,
/// decoupling the application's core logic from the specific backend
/// (the production implementation talks to the remote REST API; tests use
/// in-memory mocks).
///
/// # Implementation Notes
///
/// Implementations must not cache or retry; caching and invalidation are the
/// application layer's concern, and errors surface to the caller unchanged.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Replaces the bearer token used on all subsequent requests.
    ///
    /// Side-effect only; no network call is made. Passing `None` clears the
    /// token, after which requests are sent unauthenticated.
    fn set_token(&self, token: Option<String>);

    /// Lists all products in the list-view representation.
    async fn list(&self) -> Result<Vec<ProductListing>>;

    /// Finds a single product by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Product)`: the detail representation
    /// - `Err(_)`: transport failure or non-2xx response (including 404)
    async fn find_by_id(&self, id: &str) -> Result<Product>;

    /// Creates a product and returns the server-assigned record.
    async fn create(&self, data: &CreateProductData) -> Result<Product>;

    /// Updates an existing product and returns the refreshed record.
    async fn update(&self, id: &str, data: &UpdateProductData) -> Result<Product>;

    /// Deletes a product.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the server confirmed the deletion with 204 No Content
    /// - `Err(_)`: any other status or a transport failure
    async fn delete(&self, id: &str) -> Result<()>;

    /// Requests AI tag suggestions for a draft product.
    ///
    /// Returns an empty list when the service has no suggestions.
    async fn suggest_tags(&self, name: &str, description: &str) -> Result<Vec<String>>;
}
