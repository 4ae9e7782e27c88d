//! Stop directory used to resolve overlay entries that reference a stop id
//! which is not a matrix row.
//!
//! Schedules and predictions point at platform-level stops while the row
//! set comes from the route's stop list, which may name the parent station
//! instead. The directory maps any stop id to the names that could be a row.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::client::{ApiClient, Endpoint, Query};
use crate::identifiers::StopIdentifier;
use crate::models::entities::StopRef;
use crate::models::record::Record;

#[derive(Clone, Debug)]
struct StopEntry {
    name: Option<Arc<str>>,
    parent_station: Option<StopIdentifier>,
}

/// Every known stop, keyed by id
#[derive(Clone, Debug, Default)]
pub struct StopIndex {
    stops: HashMap<StopIdentifier, StopEntry>,
}

impl StopIndex {
    pub fn from_records(records: &[Record]) -> Self {
        let stops = records
            .iter()
            .map(StopRef::from_record)
            .map(|stop| {
                let entry = StopEntry {
                    name: stop.name.map(Arc::from),
                    parent_station: stop.parent_station_id.map(StopIdentifier::new),
                };
                (StopIdentifier::new(stop.id), entry)
            })
            .collect();

        Self { stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn name_of(&self, stop_id: &str) -> Option<&str> {
        self.stops.get(stop_id)?.name.as_deref()
    }

    /// Row keys to try for `stop_id`, most specific first: the stop's own
    /// name, then its parent station's name.
    pub fn candidate_keys(&self, stop_id: &str) -> Vec<&str> {
        let Some(entry) = self.stops.get(stop_id) else {
            return Vec::new();
        };

        let parent_name = entry
            .parent_station
            .as_ref()
            .and_then(|parent| self.name_of(parent.as_str()));

        entry.name.as_deref().into_iter().chain(parent_name).collect()
    }
}

/// Per-request, lazily loaded [`StopIndex`]
///
/// The directory is fetched the first time it is needed and reused for the
/// rest of the request, however many entries need resolving.
pub struct StopDirectory<'c> {
    client: &'c ApiClient,
    index: Option<StopIndex>,
}

impl<'c> StopDirectory<'c> {
    pub fn new(client: &'c ApiClient) -> Self {
        Self {
            client,
            index: None,
        }
    }

    /// The query used to load every stop
    pub fn query() -> Query {
        Query::new(Endpoint::Stops)
    }

    pub fn is_loaded(&self) -> bool {
        self.index.is_some()
    }

    pub async fn index(&mut self) -> &StopIndex {
        let index = match self.index.take() {
            Some(index) => index,
            None => {
                debug!("loading stop directory for parent station lookup");
                let payload = self.client.request(&Self::query()).await;
                // An unavailable directory resolves nothing; it is not retried
                // within the same request.
                StopIndex::from_records(payload.records().unwrap_or_default())
            }
        };

        self.index.insert(index)
    }
}
