//! Assembles a [`ScheduleTable`] for one route and direction.
//!
//! The pipeline is explicit: fetch everything concurrently, initialize the
//! matrix, overlay schedules, resolve, overlay predictions, resolve, render.
//! Predictions are written last so they win over scheduled times.

use tracing::{debug, warn};

use crate::client::{ApiClient, Endpoint, Payload, Query};
use crate::identifiers::RouteIdentifier;
use crate::models::entities::RouteSummary;
use crate::models::record::Record;
use crate::models::types::DirectionId;
use crate::schedule::matrix::ScheduleMatrix;
use crate::schedule::stop_index::StopDirectory;

/// First header cell
pub const STOP_LABEL: &str = "Stop";

/// Route and direction a schedule is built for
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ScheduleRequest {
    pub route_id: RouteIdentifier,
    pub direction: DirectionId,
}

impl ScheduleRequest {
    pub fn new(route_id: impl Into<RouteIdentifier>, direction: DirectionId) -> Self {
        Self {
            route_id: route_id.into(),
            direction,
        }
    }

    /// Same route, opposite direction
    pub fn toggled(&self) -> Self {
        Self {
            route_id: self.route_id.clone(),
            direction: self.direction.toggled(),
        }
    }

    fn scoped(&self, endpoint: Endpoint) -> Query {
        Query::new(endpoint)
            .filter("route", &self.route_id)
            .filter("direction_id", self.direction)
    }

    pub fn trips_query(&self) -> Query {
        self.scoped(Endpoint::Trips)
    }

    pub fn stops_query(&self) -> Query {
        self.scoped(Endpoint::Stops)
    }

    pub fn schedules_query(&self) -> Query {
        self.scoped(Endpoint::Schedules).sort("departure_time")
    }

    /// Live data: never cached, left in upstream order
    pub fn predictions_query(&self) -> Query {
        self.scoped(Endpoint::Predictions).uncached()
    }

    pub fn route_query(&self) -> Query {
        Query::new(Endpoint::Routes).filter("id", &self.route_id)
    }
}

/// Link to the same route in the other direction
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct DirectionToggle {
    pub request: ScheduleRequest,
    /// `"<first stop> → <last stop>"`, absent when there are no stops
    pub label: Option<String>,
}

/// Everything a renderer needs to draw one schedule view
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ScheduleTable {
    pub request: ScheduleRequest,
    pub route: Option<RouteSummary>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub toggle: DirectionToggle,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScheduleOutcome {
    Ready(ScheduleTable),
    /// A required collection came back as no data. `missing` lists them in
    /// the order stops, trips, schedules.
    Unavailable { missing: Vec<Endpoint> },
}

impl ScheduleOutcome {
    pub fn table(&self) -> Option<&ScheduleTable> {
        match self {
            ScheduleOutcome::Ready(table) => Some(table),
            ScheduleOutcome::Unavailable { .. } => None,
        }
    }
}

pub async fn build_schedule(client: &ApiClient, request: &ScheduleRequest) -> ScheduleOutcome {
    let trips_query = request.trips_query();
    let stops_query = request.stops_query();
    let schedules_query = request.schedules_query();
    let predictions_query = request.predictions_query();
    let route_query = request.route_query();

    let (trips, stops, schedules, predictions, route) = futures_util::join!(
        client.request(&trips_query),
        client.request(&stops_query),
        client.request(&schedules_query),
        client.request(&predictions_query),
        client.request(&route_query),
    );

    let (Some(trip_records), Some(stop_records), Some(schedule_records)) =
        (trips.records(), stops.records(), schedules.records())
    else {
        let missing: Vec<Endpoint> = [
            (Endpoint::Stops, &stops),
            (Endpoint::Trips, &trips),
            (Endpoint::Schedules, &schedules),
        ]
        .into_iter()
        .filter(|(_, payload)| payload.is_no_data())
        .map(|(endpoint, _)| endpoint)
        .collect();

        warn!(
            route = %request.route_id,
            direction = %request.direction,
            ?missing,
            "schedule unavailable"
        );
        return ScheduleOutcome::Unavailable { missing };
    };

    let mut matrix = ScheduleMatrix::initialize(&request.route_id, trip_records, stop_records);
    let mut directory = StopDirectory::new(client);

    apply_overlay(&mut matrix, schedule_records, &mut directory).await;
    if let Some(prediction_records) = predictions.records() {
        apply_overlay(&mut matrix, prediction_records, &mut directory).await;
    }

    ScheduleOutcome::Ready(ScheduleTable {
        request: request.clone(),
        route: route_summary(&route, &request.route_id),
        header: matrix.header(STOP_LABEL),
        rows: matrix.table_rows(),
        toggle: DirectionToggle {
            request: request.toggled(),
            label: toggle_label(&matrix),
        },
    })
}

async fn apply_overlay(
    matrix: &mut ScheduleMatrix,
    entries: &[Record],
    directory: &mut StopDirectory<'_>,
) {
    let unresolved = matrix.overlay(entries);
    if unresolved.is_empty() {
        return;
    }

    let pending = unresolved.len();
    let applied = matrix.resolve(unresolved, directory.index().await);
    debug!(pending, applied, "resolved entries through stop directory");
}

fn route_summary(payload: &Payload, route_id: &RouteIdentifier) -> Option<RouteSummary> {
    payload
        .records()?
        .iter()
        .find(|record| record.id == route_id.as_str())
        .map(RouteSummary::from_record)
}

fn toggle_label(matrix: &ScheduleMatrix) -> Option<String> {
    let first = matrix.row_keys().next()?;
    let last = matrix.row_keys().last()?;
    Some(format!("{first} → {last}"))
}
