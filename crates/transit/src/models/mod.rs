//! Transit data models, types, and errors.

pub mod entities;
pub mod record;
pub mod types;

// Re-exports for convenience
pub use entities::{RouteSummary, StopRef, StopTimeRef, TripRef};
pub use record::{decode_records, Linkage, Record, RelatedRef, ResourceIdentifier};
pub use types::{DirectionId, Result, RouteType, TransitError};
