//! Infrastructure crate: the reqwest-backed implementation of the core's
//! repository and auth traits.

pub mod api_client;

pub use api_client::ApiClient;
