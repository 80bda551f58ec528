//! Product use cases.
//!
//! `ProductService` wires the session, the repository (HTTP client in
//! production) and the query cache together: it propagates the bearer token
//! before every operation, disables queries while unauthenticated, validates
//! write payloads before they reach the network, and declares which cache
//! keys each mutation invalidates.

use std::sync::Arc;

use shelf_core::error::Result;
use shelf_core::product::{
    CreateProductData, Product, ProductListing, ProductRepository, UpdateProductData,
};
use shelf_core::session::AuthSession;

use crate::cache::{QueryCache, QueryState};
use crate::mutation::Mutation;

/// Cache key for the product collection.
pub const PRODUCTS_KEY: &str = "products";

/// Cache key for a single product.
pub fn product_key(id: &str) -> String {
    format!("{PRODUCTS_KEY}:{id}")
}

/// Use case layer for product reads and writes.
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    session: Arc<dyn AuthSession>,
    cache: QueryCache,
}

impl ProductService {
    /// Creates a service over a repository and session.
    pub fn new(repository: Arc<dyn ProductRepository>, session: Arc<dyn AuthSession>) -> Self {
        Self {
            repository,
            session,
            cache: QueryCache::new(),
        }
    }

    /// The underlying cache, for status inspection and logout cleanup.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Propagates the session token into the repository and reports whether
    /// queries are enabled.
    ///
    /// Called before every operation so a token change (login, logout,
    /// refresh) takes effect on the next request. A token going absent does
    /// not cancel in-flight requests; it only disables subsequent queries.
    fn sync_token(&self) -> bool {
        let token = self.session.token();
        let enabled = token.is_some();
        self.repository.set_token(token);
        enabled
    }

    /// Fetches the product collection through the cache.
    pub async fn list_products(&self) -> QueryState<Vec<ProductListing>> {
        let enabled = self.sync_token();
        let repository = Arc::clone(&self.repository);
        self.cache
            .query(PRODUCTS_KEY, enabled, move || async move {
                repository.list().await
            })
            .await
    }

    /// Forces a fresh fetch of the collection.
    pub async fn refetch_products(&self) -> QueryState<Vec<ProductListing>> {
        let enabled = self.sync_token();
        let repository = Arc::clone(&self.repository);
        self.cache
            .refetch(PRODUCTS_KEY, enabled, move || async move {
                repository.list().await
            })
            .await
    }

    /// Fetches a single product through the cache.
    pub async fn get_product(&self, id: &str) -> QueryState<Product> {
        let enabled = self.sync_token() && !id.is_empty();
        let repository = Arc::clone(&self.repository);
        let id_owned = id.to_string();
        self.cache
            .query(&product_key(id), enabled, move || async move {
                repository.find_by_id(&id_owned).await
            })
            .await
    }

    /// Creates a product.
    ///
    /// Validation errors are raised before any network call. On success the
    /// collection key is invalidated; the next listing refetches.
    pub async fn create_product(&self, data: CreateProductData) -> Result<Product> {
        data.validate()?;
        self.sync_token();
        let repository = Arc::clone(&self.repository);
        let created = Mutation::new(self.cache.clone())
            .invalidates(PRODUCTS_KEY)
            .run(async move { repository.create(&data).await })
            .await?;
        tracing::info!(id = %created.id, "product created");
        Ok(created)
    }

    /// Updates a product, invalidating both the collection and the item key.
    pub async fn update_product(&self, id: &str, data: UpdateProductData) -> Result<Product> {
        data.validate()?;
        self.sync_token();
        let repository = Arc::clone(&self.repository);
        let id_owned = id.to_string();
        Mutation::new(self.cache.clone())
            .invalidates(PRODUCTS_KEY)
            .invalidates(product_key(id))
            .run(async move { repository.update(&id_owned, &data).await })
            .await
    }

    /// Deletes a product, invalidating both the collection and the item key.
    ///
    /// Invalidation alone is sufficient; callers must not pair this with a
    /// manual refetch.
    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.sync_token();
        let repository = Arc::clone(&self.repository);
        let id_owned = id.to_string();
        Mutation::new(self.cache.clone())
            .invalidates(PRODUCTS_KEY)
            .invalidates(product_key(id))
            .run(async move { repository.delete(&id_owned).await })
            .await?;
        tracing::info!(id, "product deleted");
        Ok(())
    }

    /// Requests AI tag suggestions for a draft product.
    ///
    /// Results are not cached and not merged into any state; callers decide
    /// what to do with the list.
    pub async fn suggest_tags(&self, name: &str, description: &str) -> Result<Vec<String>> {
        self.sync_token();
        self.repository.suggest_tags(name, description).await
    }
}
