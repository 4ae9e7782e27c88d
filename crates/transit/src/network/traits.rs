//! Pluggable networking traits.
//!
//! The API client only needs "GET this URL and give me the body"; anything
//! that can do that (reqwest, a recorded fixture, a test double) plugs in here.

use std::future::Future;
use std::pin::Pin;

use crate::models::types::Result;

/// Fetch raw bytes from a URL
///
/// Implementations attach authentication and must turn non-success
/// statuses into errors.
pub trait DataFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}
