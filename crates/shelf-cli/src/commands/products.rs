use anyhow::{Result, anyhow};

use shelf_application::{ProductService, QueryState};
use shelf_core::product::{CreateProductData, Product};

/// Unwraps a query snapshot for one-shot CLI use.
///
/// A disabled query (no token) becomes an actionable error instead of an
/// empty result.
fn require<T>(state: QueryState<T>) -> Result<T> {
    state
        .into_result()?
        .ok_or_else(|| anyhow!("not authenticated: run `shelf login` and set SHELF_TOKEN"))
}

fn format_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub async fn list(service: &ProductService, search: Option<&str>) -> Result<()> {
    let listings = require(service.list_products().await)?;
    let total = listings.len();
    let filtered: Vec<_> = match search {
        Some(term) => listings
            .into_iter()
            .filter(|listing| listing.matches(term))
            .collect(),
        None => listings,
    };

    if filtered.is_empty() {
        println!("No products found");
        return Ok(());
    }

    println!(
        "{:<12} {:<24} {:>10}  {:<10}  TAGS",
        "ID", "NAME", "PRICE", "CREATED"
    );
    for listing in &filtered {
        println!(
            "{:<12} {:<24} {:>10.2}  {:<10}  {}",
            listing.id,
            listing.name,
            listing.price,
            format_date(&listing.created_at),
            listing.tags,
        );
    }
    println!("{} of {} products", filtered.len(), total);
    Ok(())
}

pub async fn show(service: &ProductService, id: &str) -> Result<()> {
    let product = require(service.get_product(id).await)?;
    print_product(&product);
    Ok(())
}

pub async fn create(
    service: &ProductService,
    name: String,
    description: String,
    tags: Vec<String>,
    price: f64,
) -> Result<()> {
    let created = service
        .create_product(CreateProductData {
            name,
            description,
            tags,
            price,
        })
        .await?;
    println!("Created product {}", created.id);
    Ok(())
}

pub async fn update(
    service: &ProductService,
    id: &str,
    name: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    price: Option<f64>,
) -> Result<()> {
    let current = require(service.get_product(id).await)?;

    let mut data = current.to_payload();
    if let Some(name) = name {
        data.name = name;
    }
    if let Some(description) = description {
        data.description = description;
    }
    if !tags.is_empty() {
        data.tags = tags;
    }
    if let Some(price) = price {
        data.price = price;
    }

    let updated = service.update_product(id, data).await?;
    print_product(&updated);
    Ok(())
}

pub async fn delete(service: &ProductService, id: &str) -> Result<()> {
    service.delete_product(id).await?;
    println!("Deleted product {id}");
    Ok(())
}

pub async fn suggest(service: &ProductService, name: &str, description: &str) -> Result<()> {
    let suggestions = service.suggest_tags(name, description).await?;
    if suggestions.is_empty() {
        println!("No suggestions");
        return Ok(());
    }
    for tag in suggestions {
        println!("{tag}");
    }
    Ok(())
}

fn print_product(product: &Product) {
    println!("ID:          {}", product.id);
    println!("Name:        {}", product.name);
    println!("Description: {}", product.description);
    println!("Tags:        {}", product.tags.join(", "));
    println!("Price:       {:.2}", product.price);
    println!("Created:     {}", format_date(&product.created_at));
    println!("Updated:     {}", format_date(&product.updated_at));
}
