//! Logical upstream queries and their cache keys.

use std::collections::BTreeMap;

use url::form_urlencoded;
use url::Url;

use crate::models::types::Result;

/// Upstream resource collections
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Endpoint {
    Routes,
    Trips,
    Stops,
    Schedules,
    Predictions,
}

/// A filtered GET against one endpoint
///
/// Filters are kept sorted by field so that the same logical query always
/// renders to the same URL and cache key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    endpoint: Endpoint,
    filters: BTreeMap<String, String>,
    sort: Option<String>,
    cacheable: bool,
}

impl Query {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            filters: BTreeMap::new(),
            sort: None,
            cacheable: true,
        }
    }

    /// Add `filter[field]=value`. Filters are ANDed upstream; a second
    /// filter on the same field replaces the first.
    pub fn filter(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.filters.insert(field.into(), value.to_string());
        self
    }

    pub fn sort(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(field.into());
        self
    }

    /// Always hit the network and never touch the cache
    pub fn uncached(mut self) -> Self {
        self.cacheable = false;
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn sort_field(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    /// Encoded query string: `filter[a]=1&filter[b]=2&sort=x`
    fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        for (field, value) in &self.filters {
            serializer.append_pair(&format!("filter[{field}]"), value);
        }
        if let Some(sort) = &self.sort {
            serializer.append_pair("sort", sort);
        }

        serializer.finish()
    }

    /// Cache key for this query.
    ///
    /// Built from the percent-encoded query string, so two queries share a
    /// key exactly when they have the same endpoint, filters and sort.
    pub fn cache_key(&self) -> String {
        let query = self.query_string();
        if query.is_empty() {
            self.endpoint.to_string()
        } else {
            format!("{}?{}", self.endpoint, query)
        }
    }

    /// Absolute request URL under `base`
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.join(self.endpoint.as_ref())?;

        let query = self.query_string();
        url.set_query((!query.is_empty()).then_some(query.as_str()));

        Ok(url)
    }
}
