//! Product domain: models, normalizer, repository seam and statistics.

pub mod model;
pub mod repository;
pub mod stats;
pub mod tags;

pub use model::{
    CreateProductData, Product, ProductListing, UpdateProductData, DESCRIPTION_MAX_LEN,
    NAME_MAX_LEN,
};
pub use repository::ProductRepository;
pub use stats::InventoryStats;
