//! Inventory statistics derived from product listings.

use std::collections::HashSet;

use super::model::ProductListing;
use super::tags;

/// Aggregate figures for the dashboard overview.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryStats {
    /// Number of products in the inventory
    pub total_products: usize,
    /// Combined price of all products
    pub total_value: f64,
    /// Mean price, 0 for an empty inventory
    pub average_price: f64,
    /// Number of distinct tags across all products
    pub distinct_tags: usize,
}

impl InventoryStats {
    /// Computes statistics over a set of listings.
    ///
    /// Tag counting goes through the normalizer, so duplicates within and
    /// across products collapse to one entry each.
    pub fn from_listings(listings: &[ProductListing]) -> Self {
        let total_products = listings.len();
        let total_value: f64 = listings.iter().map(|listing| listing.price).sum();
        let average_price = if total_products == 0 {
            0.0
        } else {
            total_value / total_products as f64
        };

        let mut seen: HashSet<String> = HashSet::new();
        for listing in listings {
            for tag in tags::split_tags(&listing.tags) {
                seen.insert(tag);
            }
        }

        Self {
            total_products,
            total_value,
            average_price,
            distinct_tags: seen.len(),
        }
    }
}
