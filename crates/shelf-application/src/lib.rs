//! Application layer: query/mutation cache and product use cases.

pub mod cache;
pub mod mutation;
pub mod products;

pub use cache::{FetchStatus, QueryCache, QueryState};
pub use mutation::Mutation;
pub use products::{PRODUCTS_KEY, ProductService, product_key};
