//! Caching client for the upstream JSON:API service.
//!
//! [`ApiClient::request`] never fails: transport errors and malformed bodies
//! are logged and surface as [`Payload::NoData`], which callers treat the
//! same as an empty collection when deciding what to render.

pub mod query;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};
use url::Url;

use crate::cache::{CacheStore, CachedRecords};
use crate::models::record::{decode_records, Record};
use crate::models::types::Result;
use crate::network::traits::DataFetcher;

pub use query::{Endpoint, Query};

pub const DEFAULT_BASE_URL: &str = "https://api-v3.mbta.com/";

/// Freshness window for cached responses
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Tag every cached response is written under
pub const DEFAULT_CACHE_TAG: &str = "mbta_api";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub cache_ttl: Duration,
    pub cache_tag: String,
}

impl ApiConfig {
    /// Use a different upstream. A trailing slash is added so endpoint
    /// paths are joined under the base path instead of replacing its last
    /// segment.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let mut url = Url::parse(base_url)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = url;
        Ok(self)
    }

    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_tag: DEFAULT_CACHE_TAG.to_owned(),
        }
    }
}

/// Result of a request: the decoded collection, or nothing usable
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Records(CachedRecords),
    NoData,
}

impl Payload {
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            Payload::Records(records) => Some(records),
            Payload::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Payload::NoData)
    }

    /// True when there is nothing to render: no data, or an empty collection
    pub fn is_empty(&self) -> bool {
        self.records().map_or(true, <[Record]>::is_empty)
    }
}

/// Issues filtered GET requests through a [`DataFetcher`], caching decoded
/// responses in a [`CacheStore`].
///
/// This type is cheap to clone; the fetcher and cache are shared.
#[derive(Clone)]
pub struct ApiClient {
    fetcher: Arc<dyn DataFetcher>,
    cache: Arc<dyn CacheStore>,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(fetcher: Arc<dyn DataFetcher>, cache: Arc<dyn CacheStore>, config: ApiConfig) -> Self {
        Self {
            fetcher,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Drop every cached response written by this client
    pub fn invalidate_cache(&self) -> usize {
        self.cache.invalidate_tag(&self.config.cache_tag)
    }

    pub async fn request(&self, query: &Query) -> Payload {
        if !query.is_cacheable() {
            return self.fetch(query).await;
        }

        let key = query.cache_key();
        if let Some(records) = self.cache.get(&key) {
            debug!(cache_key = %key, "cache hit");
            return Payload::Records(records);
        }

        debug!(cache_key = %key, "cache miss");
        let payload = self.fetch(query).await;

        // Failures are not cached so the next request retries upstream
        if let Payload::Records(records) = &payload {
            self.cache.insert(
                key,
                records.clone(),
                self.config.cache_ttl,
                &self.config.cache_tag,
            );
        }

        payload
    }

    async fn fetch(&self, query: &Query) -> Payload {
        match self.try_fetch(query).await {
            Ok(Some(records)) => Payload::Records(records.into()),
            Ok(None) => {
                debug!(endpoint = %query.endpoint(), "response carried no data");
                Payload::NoData
            }
            Err(err) => {
                error!(endpoint = %query.endpoint(), error = %err, "transit API request failed");
                Payload::NoData
            }
        }
    }

    async fn try_fetch(&self, query: &Query) -> Result<Option<Vec<Record>>> {
        let url = query.url(&self.config.base_url)?;
        let body = self.fetcher.fetch(url.as_str()).await?;
        decode_records(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryCache, NoCache};
    use crate::test_support::FakeFetcher;

    const TRIPS: &str = r#"{"data": [{"id": "t1", "type": "trip"}, {"id": "t2", "type": "trip"}]}"#;

    fn client(fetcher: &Arc<FakeFetcher>) -> ApiClient {
        ApiClient::new(fetcher.clone(), Arc::new(MemoryCache::new()), ApiConfig::default())
    }

    #[tokio::test]
    async fn test_identical_cacheable_queries_hit_network_once() {
        let fetcher = Arc::new(FakeFetcher::new().respond("/trips", TRIPS));
        let client = client(&fetcher);
        let query = Query::new(Endpoint::Trips).filter("route", "Red").filter("direction_id", 0);

        let first = client.request(&query).await;
        let second = client.request(&query).await;

        assert_eq!(first.records().map(<[Record]>::len), Some(2));
        assert_eq!(first, second);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_different_filters_are_cached_separately() {
        let fetcher = Arc::new(FakeFetcher::new().respond("/trips", TRIPS));
        let client = client(&fetcher);

        client.request(&Query::new(Endpoint::Trips).filter("route", "Red")).await;
        client.request(&Query::new(Endpoint::Trips).filter("route", "Blue")).await;
        client.request(&Query::new(Endpoint::Trips).filter("route", "Red")).await;

        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_uncached_query_always_hits_network() {
        let fetcher = Arc::new(FakeFetcher::new().respond("/predictions", TRIPS));
        let client = client(&fetcher);
        let cached = Query::new(Endpoint::Predictions).filter("route", "Red");
        let live = cached.clone().uncached();

        client.request(&cached).await;
        client.request(&live).await;
        client.request(&live).await;

        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test]
    async fn test_uncached_query_does_not_populate_cache() {
        let fetcher = Arc::new(FakeFetcher::new().respond("/predictions", TRIPS));
        let client = client(&fetcher);
        let query = Query::new(Endpoint::Predictions).filter("route", "Red");

        client.request(&query.clone().uncached()).await;
        client.request(&query).await;

        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_is_no_data() {
        let fetcher = Arc::new(FakeFetcher::new().fail("/stops", 503));
        let client = client(&fetcher);

        let payload = client.request(&Query::new(Endpoint::Stops)).await;

        assert!(payload.is_no_data());
        assert!(payload.is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let fetcher = Arc::new(FakeFetcher::new().fail("/stops", 500));
        let client = client(&fetcher);
        let query = Query::new(Endpoint::Stops).filter("route", "Red");

        client.request(&query).await;
        client.request(&query).await;

        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_and_missing_data() {
        let fetcher = Arc::new(
            FakeFetcher::new()
                .respond("/routes", "")
                .respond("/trips", r#"{"errors": [{"status": "400"}]}"#)
                .respond("/stops", r#"{"data": []}"#)
                .respond("/schedules", "not json"),
        );
        let client = ApiClient::new(fetcher.clone(), Arc::new(NoCache), ApiConfig::default());

        assert!(client.request(&Query::new(Endpoint::Routes)).await.is_no_data());
        assert!(client.request(&Query::new(Endpoint::Trips)).await.is_no_data());
        assert!(client.request(&Query::new(Endpoint::Schedules)).await.is_no_data());

        let empty = client.request(&Query::new(Endpoint::Stops)).await;
        assert!(!empty.is_no_data());
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_record_without_id_spoils_collection() {
        let fetcher = Arc::new(FakeFetcher::new().respond(
            "/stops",
            r#"{"data": [{"id": "place-alfcl", "type": "stop"}, {"type": "stop"}]}"#,
        ));
        let client = client(&fetcher);
        let query = Query::new(Endpoint::Stops);

        assert!(client.request(&query).await.is_no_data());
        assert!(client.request(&query).await.is_no_data());
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_request_url_carries_filters() {
        let fetcher = Arc::new(FakeFetcher::new().respond("/schedules", TRIPS));
        let client = client(&fetcher);

        client
            .request(
                &Query::new(Endpoint::Schedules)
                    .filter("route", "Red")
                    .sort("departure_time"),
            )
            .await;

        let requested = fetcher.requested_urls();
        assert_eq!(
            requested,
            vec!["https://api-v3.mbta.com/schedules?filter%5Broute%5D=Red&sort=departure_time".to_string()]
        );
    }

    #[tokio::test]
    async fn test_invalidate_cache() {
        let fetcher = Arc::new(FakeFetcher::new().respond("/trips", TRIPS));
        let client = client(&fetcher);
        let query = Query::new(Endpoint::Trips);

        client.request(&query).await;
        assert_eq!(client.invalidate_cache(), 1);
        client.request(&query).await;

        assert_eq!(fetcher.calls(), 2);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = ApiConfig::default().with_base_url("http://localhost:4000/v3").unwrap();
        let url = Query::new(Endpoint::Routes).url(&config.base_url).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/v3/routes");

        assert!(ApiConfig::default().with_base_url("not a url").is_err());
    }
}
