//! # mbta-transit
//!
//! Schedule aggregation over a JSON:API transit service.
//!
//! ## Features
//!
//! - **Cached requests**: identical filtered queries share one upstream call
//! - **Failure isolation**: transport errors become [`client::Payload::NoData`]
//! - **Schedule matrix**: stops × trips with predictions over schedules
//! - **Parent-station fallback**: platform stop ids resolved to station rows
//! - **Pluggable networking**: implement your own data fetching
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mbta_transit::prelude::*;
//!
//! # async fn run() -> mbta_transit::models::Result<()> {
//! let client = ApiClient::new(
//!     Arc::new(HttpFetcher::new(None)?),
//!     Arc::new(MemoryCache::new()),
//!     ApiConfig::default(),
//! );
//!
//! let request = ScheduleRequest::new("Red", DirectionId::Outbound);
//! if let ScheduleOutcome::Ready(table) = build_schedule(&client, &request).await {
//!     println!("{}", table.header.join(" | "));
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod identifiers;
pub mod models;
pub mod network;
pub mod routes;
pub mod schedule;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub mod prelude {
    pub use crate::cache::{CachePolicy, CacheStore, MemoryCache, NoCache};
    pub use crate::client::{ApiClient, ApiConfig, Endpoint, Payload, Query};
    pub use crate::identifiers::*;
    pub use crate::models::{entities::*, types::*};
    pub use crate::network::{DataFetcher, HttpFetcher};
    pub use crate::routes::list_routes;
    pub use crate::schedule::{
        build_schedule, DirectionToggle, ScheduleOutcome, ScheduleRequest, ScheduleTable,
    };
}

pub use prelude::*;
