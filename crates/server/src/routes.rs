use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use mbta_transit::cache::CachePolicy;
use mbta_transit::client::{ApiClient, Endpoint};
use mbta_transit::models::{DirectionId, RouteType};
use mbta_transit::routes::list_routes;
use mbta_transit::schedule::{ScheduleOutcome, ScheduleRequest, build_schedule};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

const NO_CACHE: &str = "no-cache";

pub fn create_router(client: ApiClient) -> Router {
    Router::new()
        .route("/routes", get(routes))
        .route("/schedules/{route_id}/{direction}", get(schedule))
        .route("/health", get(health))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(client)
}

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("invalid route type: {0}")]
    InvalidRouteType(String),

    #[error(transparent)]
    InvalidDirection(#[from] mbta_transit::models::TransitError),

    #[error("route listing unavailable")]
    RoutesUnavailable,

    #[error("schedule unavailable")]
    ScheduleUnavailable { missing: Vec<Endpoint> },
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServerError::InvalidRouteType(_) | ServerError::InvalidDirection(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            ServerError::RoutesUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": self.to_string() }),
            ),
            ServerError::ScheduleUnavailable { missing } => {
                let missing: Vec<String> = missing.iter().map(ToString::to_string).collect();
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": self.to_string(), "missing": missing }),
                )
            }
        };

        (status, [(header::CACHE_CONTROL, NO_CACHE)], Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RoutesParams {
    /// Comma-separated GTFS route types
    types: Option<String>,
}

fn parse_route_types(raw: Option<&str>) -> Result<Vec<RouteType>, ServerError> {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .map(|value| {
            value
                .parse::<u16>()
                .ok()
                .and_then(RouteType::from_gtfs)
                .ok_or_else(|| ServerError::InvalidRouteType(value.to_owned()))
        })
        .collect()
}

async fn routes(
    State(client): State<ApiClient>,
    Query(params): Query<RoutesParams>,
) -> Result<Response, ServerError> {
    let types = parse_route_types(params.types.as_deref())?;
    let routes = list_routes(&client, &types)
        .await
        .ok_or(ServerError::RoutesUnavailable)?;

    let cache_control = CachePolicy::ROUTE_LISTING.cache_control();
    Ok(([(header::CACHE_CONTROL, cache_control)], Json(routes)).into_response())
}

async fn schedule(
    State(client): State<ApiClient>,
    Path((route_id, direction)): Path<(String, String)>,
) -> Result<Response, ServerError> {
    let direction: DirectionId = direction.parse()?;
    let request = ScheduleRequest::new(route_id, direction);

    match build_schedule(&client, &request).await {
        ScheduleOutcome::Ready(table) => {
            let cache_control = CachePolicy::SCHEDULE.cache_control();
            Ok(([(header::CACHE_CONTROL, cache_control)], Json(table)).into_response())
        }
        ScheduleOutcome::Unavailable { missing } => {
            Err(ServerError::ScheduleUnavailable { missing })
        }
    }
}

async fn health() -> &'static str {
    "OK"
}
