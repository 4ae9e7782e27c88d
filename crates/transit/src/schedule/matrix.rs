//! The stop × trip time grid.
//!
//! Rows and columns are fixed when the matrix is initialized from the
//! route's trips and stops. Overlays (schedules, then predictions) only
//! ever overwrite cells; an entry that does not land on an existing cell is
//! dropped.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::identifiers::{RouteIdentifier, StopIdentifier, TripIdentifier};
use crate::models::entities::{StopRef, StopTimeRef, TripRef};
use crate::models::record::Record;
use crate::schedule::stop_index::StopIndex;
use crate::schedule::time::format_clock_time;

/// One matrix column: a trip and its display name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripColumn {
    pub trip_id: TripIdentifier,
    pub name: String,
}

/// An overlay entry whose stop id is not a row key
///
/// Its column is already known; only the row needs resolving through the
/// stop directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedCell {
    stop_id: StopIdentifier,
    column: usize,
    time: String,
}

impl UnresolvedCell {
    pub fn stop_id(&self) -> &StopIdentifier {
        &self.stop_id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleMatrix {
    columns: Vec<TripColumn>,
    column_index: HashMap<TripIdentifier, usize>,
    row_keys: Vec<Arc<str>>,
    row_index: HashMap<Arc<str>, usize>,
    /// `cells[row][column]`; an empty string means no time
    cells: Vec<Vec<String>>,
}

impl ScheduleMatrix {
    /// Build the empty grid.
    ///
    /// Columns are the trips on `route_id`, in first-seen order without
    /// duplicates; trips tagged to any other route (shuttles, replacement
    /// services) are left out. Rows are the stops by name, in input order.
    pub fn initialize(route_id: &RouteIdentifier, trips: &[Record], stops: &[Record]) -> Self {
        let mut columns = Vec::new();
        let mut column_index: HashMap<TripIdentifier, usize> = HashMap::new();

        for trip in trips.iter().map(TripRef::from_record) {
            if !trip.belongs_to(route_id) || column_index.contains_key(trip.id) {
                continue;
            }

            let trip_id = TripIdentifier::new(trip.id);
            column_index.insert(trip_id.clone(), columns.len());
            columns.push(TripColumn {
                trip_id,
                name: trip.display_name().to_owned(),
            });
        }

        let mut row_keys: Vec<Arc<str>> = Vec::new();
        let mut row_index: HashMap<Arc<str>, usize> = HashMap::new();

        for stop in stops.iter().map(StopRef::from_record) {
            let key = stop.row_key();
            if row_index.contains_key(key) {
                continue;
            }

            let key: Arc<str> = Arc::from(key);
            row_index.insert(key.clone(), row_keys.len());
            row_keys.push(key);
        }

        let skeleton = vec![String::new(); columns.len()];
        let cells = vec![skeleton; row_keys.len()];

        Self {
            columns,
            column_index,
            row_keys,
            row_index,
            cells,
        }
    }

    /// Trip columns in display order
    pub fn columns(&self) -> &[TripColumn] {
        &self.columns
    }

    /// Row keys (stop names) in input order
    pub fn row_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.row_keys.iter().map(|key| &**key)
    }

    pub fn row_count(&self) -> usize {
        self.row_keys.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell value, `None` when the coordinate is not in the matrix
    pub fn cell(&self, row_key: &str, trip_id: &str) -> Option<&str> {
        let row = *self.row_index.get(row_key)?;
        let column = *self.column_index.get(trip_id)?;
        Some(self.cells[row][column].as_str())
    }

    /// Cells of one row in column order
    pub fn row(&self, row_key: &str) -> Option<&[String]> {
        let row = *self.row_index.get(row_key)?;
        Some(&self.cells[row])
    }

    /// Write schedule or prediction times into the grid.
    ///
    /// Entries whose stop id is itself a row key are applied directly.
    /// Entries for a known trip whose stop id is not a row are returned for
    /// [`resolve`](Self::resolve). Everything else (no usable time, unknown
    /// trip, missing relationships) is skipped.
    pub fn overlay(&mut self, entries: &[Record]) -> Vec<UnresolvedCell> {
        let mut unresolved = Vec::new();

        for entry in entries.iter().map(StopTimeRef::from_record) {
            let Some(raw_time) = entry.event_time() else {
                continue;
            };

            let Some(time) = format_clock_time(raw_time) else {
                debug!(entry = entry.id, time = raw_time, "skipping unparseable time");
                continue;
            };

            let (Some(stop_id), Some(trip_id)) = (entry.stop_id, entry.trip_id) else {
                continue;
            };

            let Some(&column) = self.column_index.get(trip_id) else {
                continue;
            };

            match self.row_index.get(stop_id) {
                Some(&row) => self.cells[row][column] = time,
                None => unresolved.push(UnresolvedCell {
                    stop_id: StopIdentifier::new(stop_id),
                    column,
                    time,
                }),
            }
        }

        unresolved
    }

    /// Apply entries left over by [`overlay`](Self::overlay), looking their
    /// stop up in `index`. Returns how many landed on a cell.
    pub fn resolve(&mut self, unresolved: Vec<UnresolvedCell>, index: &StopIndex) -> usize {
        let mut applied = 0;

        for cell in unresolved {
            let row = index
                .candidate_keys(cell.stop_id.as_str())
                .into_iter()
                .find_map(|key| self.row_index.get(key).copied());

            if let Some(row) = row {
                self.cells[row][cell.column] = cell.time;
                applied += 1;
            }
        }

        applied
    }

    /// `[stop label, trip names...]`
    pub fn header(&self, stop_label: &str) -> Vec<String> {
        std::iter::once(stop_label.to_owned())
            .chain(self.columns.iter().map(|column| column.name.clone()))
            .collect()
    }

    /// `[stop key, cells...]` for every row in input order
    pub fn table_rows(&self) -> Vec<Vec<String>> {
        self.row_keys
            .iter()
            .zip(&self.cells)
            .map(|(key, cells)| {
                std::iter::once(key.to_string())
                    .chain(cells.iter().cloned())
                    .collect()
            })
            .collect()
    }
}
