//! Typed views over [`Record`]s.
//!
//! Views borrow from the record and only check for the presence of the
//! fields they expose. Missing optional fields come back as `None`.

use crate::identifiers::RouteIdentifier;
use crate::models::record::Record;
use crate::models::types::RouteType;

// ============================================================================
// Trips
// ============================================================================

#[derive(Clone, Copy, Debug)]
pub struct TripRef<'a> {
    pub id: &'a str,
    pub route_id: Option<&'a str>,
    pub name: Option<&'a str>,
}

impl<'a> TripRef<'a> {
    pub fn from_record(record: &'a Record) -> Self {
        Self {
            id: &record.id,
            route_id: record.related_id("route"),
            name: record.attribute_str("name"),
        }
    }

    /// Column label: the trip name, or the trip id when the name is empty
    pub fn display_name(&self) -> &'a str {
        match self.name {
            Some(name) if !name.is_empty() => name,
            _ => self.id,
        }
    }

    pub fn belongs_to(&self, route_id: &RouteIdentifier) -> bool {
        self.route_id == Some(route_id.as_str())
    }
}

// ============================================================================
// Stops
// ============================================================================

#[derive(Clone, Copy, Debug)]
pub struct StopRef<'a> {
    pub id: &'a str,
    pub name: Option<&'a str>,
    pub parent_station_id: Option<&'a str>,
}

impl<'a> StopRef<'a> {
    pub fn from_record(record: &'a Record) -> Self {
        Self {
            id: &record.id,
            name: record.attribute_str("name"),
            parent_station_id: record.related_id("parent_station"),
        }
    }

    /// Matrix row key. Rows are keyed by stop name; a stop without a name
    /// falls back to its id so it still gets a row.
    pub fn row_key(&self) -> &'a str {
        self.name.unwrap_or(self.id)
    }
}

// ============================================================================
// Schedule and prediction entries
// ============================================================================

/// A schedule or prediction entry: a time for one trip at one stop
#[derive(Clone, Copy, Debug)]
pub struct StopTimeRef<'a> {
    pub id: &'a str,
    pub route_id: Option<&'a str>,
    pub trip_id: Option<&'a str>,
    pub stop_id: Option<&'a str>,
    pub departure_time: Option<&'a str>,
    pub arrival_time: Option<&'a str>,
}

impl<'a> StopTimeRef<'a> {
    pub fn from_record(record: &'a Record) -> Self {
        Self {
            id: &record.id,
            route_id: record.related_id("route"),
            trip_id: record.related_id("trip"),
            stop_id: record.related_id("stop"),
            departure_time: record.attribute_str("departure_time"),
            arrival_time: record.attribute_str("arrival_time"),
        }
    }

    /// Departure time, or arrival time at the last stop of a trip
    pub fn event_time(&self) -> Option<&'a str> {
        self.departure_time.or(self.arrival_time)
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Display metadata for a route
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct RouteSummary {
    pub id: RouteIdentifier,
    pub long_name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub text_color: Option<String>,
    pub route_type: Option<RouteType>,
}

impl RouteSummary {
    pub fn from_record(record: &Record) -> Self {
        let owned = |name: &str| record.attribute_str(name).map(str::to_owned);

        Self {
            id: RouteIdentifier::new(&record.id),
            long_name: owned("long_name").unwrap_or_else(|| record.id.clone()),
            description: owned("description"),
            color: owned("color"),
            text_color: owned("text_color"),
            route_type: record
                .attribute_u64("type")
                .and_then(|value| u16::try_from(value).ok())
                .and_then(RouteType::from_gtfs),
        }
    }
}
