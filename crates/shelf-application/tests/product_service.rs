//! End-to-end tests for `ProductService` over an in-memory repository.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shelf_application::{FetchStatus, ProductService};
use shelf_core::error::{Result, ShelfError};
use shelf_core::product::{
    CreateProductData, Product, ProductListing, ProductRepository, UpdateProductData, tags,
};
use shelf_core::session::MemorySession;

// Mock repository backed by a HashMap, standing in for the remote API.
struct MockProductRepository {
    products: Mutex<HashMap<String, Product>>,
    next_id: AtomicUsize,
    list_calls: AtomicUsize,
    find_calls: AtomicUsize,
    create_calls: AtomicUsize,
    tokens: Mutex<Vec<Option<String>>>,
    suggestions: Vec<String>,
}

impl MockProductRepository {
    fn new() -> Self {
        Self {
            products: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(1),
            list_calls: AtomicUsize::new(0),
            find_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
            suggestions: Vec::new(),
        }
    }

    fn with_suggestions(suggestions: Vec<String>) -> Self {
        Self {
            suggestions,
            ..Self::new()
        }
    }

    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn recorded_tokens(&self) -> Vec<Option<String>> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    fn set_token(&self, token: Option<String>) {
        self.tokens.lock().unwrap().push(token);
    }

    async fn list(&self) -> Result<Vec<ProductListing>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let products = self.products.lock().unwrap();
        let mut listings: Vec<ProductListing> = products
            .values()
            .map(|product| ProductListing {
                id: product.id.clone(),
                name: product.name.clone(),
                description: product.description.clone(),
                tags: tags::join_tags(&product.tags),
                price: product.price,
                created_at: product.created_at.clone(),
                updated_at: product.updated_at.clone(),
            })
            .collect();
        listings.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(listings)
    }

    async fn find_by_id(&self, id: &str) -> Result<Product> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let products = self.products.lock().unwrap();
        products
            .get(id)
            .cloned()
            .ok_or_else(|| ShelfError::http(404, "Product not found"))
    }

    async fn create(&self, data: &CreateProductData) -> Result<Product> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let id = format!("p-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let product = Product {
            id: id.clone(),
            name: data.name.clone(),
            description: data.description.clone(),
            tags: data.tags.clone(),
            price: data.price,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        };
        self.products.lock().unwrap().insert(id, product.clone());
        Ok(product)
    }

    async fn update(&self, id: &str, data: &UpdateProductData) -> Result<Product> {
        let mut products = self.products.lock().unwrap();
        let product = products
            .get_mut(id)
            .ok_or_else(|| ShelfError::http(404, "Product not found"))?;
        product.name = data.name.clone();
        product.description = data.description.clone();
        product.tags = data.tags.clone();
        product.price = data.price;
        product.updated_at = "2024-01-02T00:00:00Z".to_string();
        Ok(product.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut products = self.products.lock().unwrap();
        products
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ShelfError::http(404, "Product not found"))
    }

    async fn suggest_tags(&self, _name: &str, _description: &str) -> Result<Vec<String>> {
        Ok(self.suggestions.clone())
    }
}

fn widget() -> CreateProductData {
    CreateProductData {
        name: "Widget".to_string(),
        description: "A widget".to_string(),
        tags: vec!["a".to_string(), "b".to_string()],
        price: 9.99,
    }
}

fn service_with(
    repository: Arc<MockProductRepository>,
    session: Arc<MemorySession>,
) -> ProductService {
    ProductService::new(repository, session)
}

#[tokio::test]
async fn test_queries_are_disabled_without_a_token() {
    let repository = Arc::new(MockProductRepository::new());
    let service = service_with(repository.clone(), Arc::new(MemorySession::new()));

    let state = service.list_products().await;

    assert_eq!(state.status, FetchStatus::Idle);
    assert!(state.data.is_none());
    assert!(state.error.is_none());
    assert_eq!(repository.list_calls(), 0);
}

#[tokio::test]
async fn test_token_is_propagated_before_the_first_request() {
    let repository = Arc::new(MockProductRepository::new());
    let service = service_with(
        repository.clone(),
        Arc::new(MemorySession::with_token("tok-1")),
    );

    let _ = service.list_products().await;

    assert_eq!(
        repository.recorded_tokens(),
        vec![Some("tok-1".to_string())]
    );
}

#[tokio::test]
async fn test_logout_stops_subsequent_queries() {
    let repository = Arc::new(MockProductRepository::new());
    let session = Arc::new(MemorySession::with_token("tok-1"));
    let service = service_with(repository.clone(), session.clone());

    let _ = service.list_products().await;
    assert_eq!(repository.list_calls(), 1);

    session.logout();
    let state = service.list_products().await;

    assert_eq!(state.status, FetchStatus::Idle);
    assert_eq!(repository.list_calls(), 1);
    // The cleared token was still pushed into the repository.
    assert_eq!(repository.recorded_tokens().last().unwrap(), &None);
}

#[tokio::test]
async fn test_create_invalidates_collection_and_round_trips_tags() {
    let repository = Arc::new(MockProductRepository::new());
    let service = service_with(
        repository.clone(),
        Arc::new(MemorySession::with_token("tok-1")),
    );

    // Warm the collection cache.
    let _ = service.list_products().await;
    assert_eq!(repository.list_calls(), 1);

    let created = service.create_product(widget()).await.unwrap();
    assert!(!created.id.is_empty());

    let state = service.list_products().await;
    assert_eq!(repository.list_calls(), 2);
    let listings = state.data.unwrap();
    let listing = listings
        .iter()
        .find(|listing| listing.id == created.id)
        .expect("created product missing from listing");
    assert_eq!(tags::split_tags(&listing.tags), vec!["a", "b"]);
}

#[tokio::test]
async fn test_delete_then_list_excludes_the_product_after_one_refetch() {
    let repository = Arc::new(MockProductRepository::new());
    let service = service_with(
        repository.clone(),
        Arc::new(MemorySession::with_token("tok-1")),
    );

    let keep = service.create_product(widget()).await.unwrap();
    let doomed = service.create_product(widget()).await.unwrap();
    let _ = service.list_products().await;
    let fetches_before = repository.list_calls();

    service.delete_product(&doomed.id).await.unwrap();

    let state = service.list_products().await;
    // Exactly one refetch, triggered by the invalidation alone.
    assert_eq!(repository.list_calls(), fetches_before + 1);
    let ids: Vec<String> = state
        .data
        .unwrap()
        .into_iter()
        .map(|listing| listing.id)
        .collect();
    assert!(ids.contains(&keep.id));
    assert!(!ids.contains(&doomed.id));
}

#[tokio::test]
async fn test_refetch_bypasses_a_fresh_cache_entry() {
    let repository = Arc::new(MockProductRepository::new());
    let service = service_with(
        repository.clone(),
        Arc::new(MemorySession::with_token("tok-1")),
    );

    let _ = service.list_products().await;
    let _ = service.list_products().await;
    assert_eq!(repository.list_calls(), 1);

    let state = service.refetch_products().await;
    assert_eq!(repository.list_calls(), 2);
    assert!(state.data.is_some());
}

#[tokio::test]
async fn test_update_of_missing_id_leaves_the_collection_cache_untouched() {
    let repository = Arc::new(MockProductRepository::new());
    let service = service_with(
        repository.clone(),
        Arc::new(MemorySession::with_token("tok-1")),
    );

    let _ = service.create_product(widget()).await.unwrap();
    let _ = service.list_products().await;
    let fetches_before = repository.list_calls();

    let err = service.update_product("missing", widget()).await.unwrap_err();
    assert_eq!(err.status(), Some(404));

    // The failed mutation performed no invalidation; the next read is
    // served from cache.
    let state = service.list_products().await;
    assert_eq!(repository.list_calls(), fetches_before);
    assert_eq!(state.data.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_invalidates_the_item_key() {
    let repository = Arc::new(MockProductRepository::new());
    let service = service_with(
        repository.clone(),
        Arc::new(MemorySession::with_token("tok-1")),
    );

    let created = service.create_product(widget()).await.unwrap();
    let _ = service.get_product(&created.id).await;
    let _ = service.get_product(&created.id).await;
    assert_eq!(repository.find_calls(), 1);

    let mut data = widget();
    data.name = "Widget v2".to_string();
    service.update_product(&created.id, data).await.unwrap();

    let state = service.get_product(&created.id).await;
    assert_eq!(repository.find_calls(), 2);
    assert_eq!(state.data.unwrap().name, "Widget v2");
}

#[tokio::test]
async fn test_validation_errors_never_reach_the_repository() {
    let repository = Arc::new(MockProductRepository::new());
    let service = service_with(
        repository.clone(),
        Arc::new(MemorySession::with_token("tok-1")),
    );

    let mut data = widget();
    data.name = "  ".to_string();
    let err = service.create_product(data).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(repository.create_calls(), 0);
}

#[tokio::test]
async fn test_suggest_tags_passes_results_through() {
    let repository = Arc::new(MockProductRepository::with_suggestions(vec![
        "furniture".to_string(),
        "wood".to_string(),
    ]));
    let service = service_with(
        repository.clone(),
        Arc::new(MemorySession::with_token("tok-1")),
    );

    let suggestions = service.suggest_tags("Chair", "Wooden chair").await.unwrap();
    assert_eq!(suggestions, vec!["furniture", "wood"]);

    let empty_repository = Arc::new(MockProductRepository::new());
    let empty_service = service_with(
        empty_repository,
        Arc::new(MemorySession::with_token("tok-1")),
    );
    assert!(empty_service.suggest_tags("Chair", "x").await.unwrap().is_empty());
}
