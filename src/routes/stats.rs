use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::stats::{StatsQuery, StatsResponse},
    services::stats_service,
    state::SharedState,
};

/// Statistics endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/stats", get(get_stats))
}

/// Singles and doubles tables for the requested window.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    params(StatsQuery),
    responses((status = 200, description = "Statistics tables", body = StatsResponse))
)]
pub async fn get_stats(
    State(state): State<SharedState>,
    Query(query): Query<StatsQuery>,
) -> Json<StatsResponse> {
    Json(stats_service::stats(&state, query.window.unwrap_or_default()).await)
}
