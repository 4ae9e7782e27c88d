//! Test doubles shared by the unit tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use serde_json::{json, Value};
use url::Url;

use crate::models::record::Record;
use crate::models::types::{Result, TransitError};
use crate::network::traits::DataFetcher;

enum Reply {
    Body(String),
    Status(u16),
}

struct Rule {
    path: String,
    query_contains: Option<String>,
    reply: Reply,
}

/// In-memory [`DataFetcher`] answering by URL path and recording requests
#[derive(Default)]
pub struct FakeFetcher {
    rules: Vec<Rule>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path: &str, body: impl Into<String>) -> Self {
        self.rules.push(Rule {
            path: path.to_owned(),
            query_contains: None,
            reply: Reply::Body(body.into()),
        });
        self
    }

    /// Answer only when the decoded query string contains `needle`. Checked
    /// before plain path rules.
    pub fn respond_when(mut self, path: &str, needle: &str, body: impl Into<String>) -> Self {
        self.rules.push(Rule {
            path: path.to_owned(),
            query_contains: Some(needle.to_owned()),
            reply: Reply::Body(body.into()),
        });
        self
    }

    pub fn fail(mut self, path: &str, status: u16) -> Self {
        self.rules.push(Rule {
            path: path.to_owned(),
            query_contains: None,
            reply: Reply::Status(status),
        });
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests to `path` whose decoded query equals `query`
    pub fn calls_to(&self, path: &str, query: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|url| Url::parse(url).ok())
            .filter(|url| url.path() == path && decoded_query(url) == query)
            .count()
    }

    fn reply_for(&self, url: &Url) -> Option<&Reply> {
        let query = decoded_query(url);
        let conditional = self.rules.iter().find(|rule| {
            rule.path == url.path()
                && rule
                    .query_contains
                    .as_deref()
                    .is_some_and(|needle| query.contains(needle))
        });

        conditional
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|rule| rule.path == url.path() && rule.query_contains.is_none())
            })
            .map(|rule| &rule.reply)
    }
}

fn decoded_query(url: &Url) -> String {
    url.query_pairs()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

impl DataFetcher for FakeFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(url.to_owned());

            let parsed = Url::parse(url)?;
            match self.reply_for(&parsed) {
                Some(Reply::Body(body)) => Ok(body.clone().into_bytes()),
                Some(Reply::Status(status)) => Err(TransitError::UnexpectedStatus {
                    status: *status,
                    url: url.to_owned(),
                }),
                None => Err(TransitError::UnexpectedStatus {
                    status: 404,
                    url: url.to_owned(),
                }),
            }
        })
    }
}

// ============================================================================
// Record builders
// ============================================================================

pub fn document(records: &[Value]) -> String {
    json!({ "data": records }).to_string()
}

pub fn trip(id: &str, route: &str, name: &str) -> Value {
    json!({
        "type": "trip",
        "id": id,
        "attributes": { "name": name, "direction_id": 0 },
        "relationships": { "route": { "data": { "type": "route", "id": route } } }
    })
}

pub fn stop(id: &str, name: &str) -> Value {
    json!({
        "type": "stop",
        "id": id,
        "attributes": { "name": name },
        "relationships": { "parent_station": { "data": null } }
    })
}

pub fn child_stop(id: &str, name: &str, parent: &str) -> Value {
    json!({
        "type": "stop",
        "id": id,
        "attributes": { "name": name },
        "relationships": { "parent_station": { "data": { "type": "stop", "id": parent } } }
    })
}

pub fn stop_time(
    kind: &str,
    trip: &str,
    stop: &str,
    arrival: Option<&str>,
    departure: Option<&str>,
) -> Value {
    json!({
        "type": kind,
        "id": format!("{kind}-{trip}-{stop}"),
        "attributes": { "arrival_time": arrival, "departure_time": departure },
        "relationships": {
            "route": { "data": { "type": "route", "id": "Red" } },
            "stop": { "data": { "type": "stop", "id": stop } },
            "trip": { "data": { "type": "trip", "id": trip } }
        }
    })
}

pub fn schedule(trip: &str, stop: &str, departure: &str) -> Value {
    stop_time("schedule", trip, stop, None, Some(departure))
}

pub fn prediction(trip: &str, stop: &str, departure: &str) -> Value {
    stop_time("prediction", trip, stop, None, Some(departure))
}

pub fn records(values: &[Value]) -> Vec<Record> {
    values
        .iter()
        .map(|value| serde_json::from_value(value.clone()).unwrap())
        .collect()
}

pub fn route(id: &str, long_name: &str, route_type: u16) -> Value {
    json!({
        "type": "route",
        "id": id,
        "attributes": {
            "long_name": long_name,
            "description": "Rapid Transit",
            "color": "DA291C",
            "text_color": "FFFFFF",
            "type": route_type
        }
    })
}
