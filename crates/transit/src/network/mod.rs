//! Network abstractions and the HTTP implementation.

pub mod http;
pub mod traits;

pub use http::HttpFetcher;
pub use traits::DataFetcher;
