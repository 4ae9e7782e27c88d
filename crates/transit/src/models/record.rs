//! Generic JSON:API resource objects.
//!
//! Every upstream collection (routes, trips, stops, schedules, predictions)
//! decodes into the same [`Record`] shape; typed views in
//! [`entities`](super::entities) read the fields each kind needs.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::types::Result;

/// A decoded resource object: `{ id, type, attributes, relationships }`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Record {
    pub id: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub attributes: Map<String, Value>,

    #[serde(default)]
    pub relationships: HashMap<String, RelatedRef>,
}

/// A relationship entry. `data` is null when the relation is unset and may
/// be missing entirely when the upstream only sends links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RelatedRef {
    #[serde(default)]
    pub data: Option<Linkage>,
}

/// Resource linkage, either to-one or to-many
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ResourceIdentifier {
    pub id: String,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl Record {
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|value| !value.is_null())
    }

    /// String attribute, `None` when absent, null or not a string
    pub fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(Value::as_str)
    }

    pub fn attribute_u64(&self, name: &str) -> Option<u64> {
        self.attribute(name).and_then(Value::as_u64)
    }

    /// Id of a to-one relationship, `None` for null, missing or to-many data
    pub fn related_id(&self, relationship: &str) -> Option<&str> {
        match self.relationships.get(relationship)?.data.as_ref()? {
            Linkage::One(resource) => Some(resource.id.as_str()),
            Linkage::Many(_) => None,
        }
    }
}

/// Top-level document. Only `data` is read; `included`, `links` and `jsonapi`
/// members are ignored.
#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    data: Option<Value>,
}

/// Decode a response body into records.
///
/// Returns `Ok(None)` for an empty body or a document without `data`; a
/// single resource object is returned as a one-element list. A collection
/// with any element lacking an `id` fails as a whole.
pub fn decode_records(body: &[u8]) -> Result<Option<Vec<Record>>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let document: Document = serde_json::from_slice(body)?;

    let records = match document.data {
        None => return Ok(None),
        Some(data @ Value::Array(_)) => serde_json::from_value(data)?,
        Some(data) => vec![serde_json::from_value(data)?],
    };

    Ok(Some(records))
}
