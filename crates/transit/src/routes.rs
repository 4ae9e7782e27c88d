//! Route listing for index pages.

use itertools::Itertools;

use crate::client::{ApiClient, Endpoint, Query};
use crate::models::entities::RouteSummary;
use crate::models::types::RouteType;

/// Query for routes of the given types, all routes when `types` is empty
pub fn routes_query(types: &[RouteType]) -> Query {
    let query = Query::new(Endpoint::Routes).sort("sort_order");

    if types.is_empty() {
        return query;
    }

    let types = types.iter().map(|route_type| route_type.as_gtfs()).join(",");
    query.filter("type", types)
}

/// Routes in upstream `sort_order`, or `None` when no data was available
pub async fn list_routes(client: &ApiClient, types: &[RouteType]) -> Option<Vec<RouteSummary>> {
    let payload = client.request(&routes_query(types)).await;
    let routes = payload
        .records()?
        .iter()
        .map(RouteSummary::from_record)
        .collect();

    Some(routes)
}
