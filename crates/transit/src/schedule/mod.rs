//! Schedule matrix construction.
//!
//! A schedule view is a grid with one row per stop and one column per trip.
//! Cells hold the scheduled time, replaced by the predicted time where one
//! exists.

pub mod builder;
pub mod matrix;
pub mod stop_index;
pub mod time;

pub use builder::{
    build_schedule, DirectionToggle, ScheduleOutcome, ScheduleRequest, ScheduleTable, STOP_LABEL,
};
pub use matrix::{ScheduleMatrix, TripColumn, UnresolvedCell};
pub use stop_index::{StopDirectory, StopIndex};
pub use time::{format_clock_time, CLOCK_FORMAT};
