use anyhow::{Result, anyhow};

use shelf_application::ProductService;
use shelf_core::product::InventoryStats;

/// Prints the dashboard overview figures.
pub async fn run(service: &ProductService) -> Result<()> {
    let listings = service
        .list_products()
        .await
        .into_result()?
        .ok_or_else(|| anyhow!("not authenticated: run `shelf login` and set SHELF_TOKEN"))?;

    let stats = InventoryStats::from_listings(&listings);
    println!("Total products: {}", stats.total_products);
    println!("Total value:    {:.2}", stats.total_value);
    println!("Average price:  {:.2}", stats.average_price);
    println!("Distinct tags:  {}", stats.distinct_tags);
    Ok(())
}
