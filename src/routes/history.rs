use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};

use crate::{
    dto::history::{ClearHistoryResponse, CompletedMatchView, DayGroupView, HistorySummaryView},
    error::AppError,
    services::history_service,
    state::SharedState,
};

/// Match history endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/history", get(list_history).delete(clear_history))
        .route("/history/summary", get(history_summary))
        .route("/history/{started_at}", delete(delete_match))
}

/// List finished matches grouped by local day, newest first.
#[utoipa::path(
    get,
    path = "/history",
    tag = "history",
    responses((status = 200, description = "Matches per day", body = [DayGroupView]))
)]
pub async fn list_history(State(state): State<SharedState>) -> Json<Vec<DayGroupView>> {
    Json(history_service::grouped_by_day(&state).await)
}

/// Totals over the stored history.
#[utoipa::path(
    get,
    path = "/history/summary",
    tag = "history",
    responses((status = 200, description = "History totals", body = HistorySummaryView))
)]
pub async fn history_summary(State(state): State<SharedState>) -> Json<HistorySummaryView> {
    Json(history_service::summary(&state).await)
}

/// Delete one match and reverse its lifetime statistics.
#[utoipa::path(
    delete,
    path = "/history/{started_at}",
    tag = "history",
    params(("started_at" = i64, Path, description = "Start timestamp (unix ms) identifying the match")),
    responses(
        (status = 200, description = "Deleted match", body = CompletedMatchView),
        (status = 404, description = "No match with this start timestamp")
    )
)]
pub async fn delete_match(
    State(state): State<SharedState>,
    Path(started_at): Path<i64>,
) -> Result<Json<CompletedMatchView>, AppError> {
    Ok(Json(history_service::delete_match(&state, started_at).await?))
}

/// Forget every stored match.
#[utoipa::path(
    delete,
    path = "/history",
    tag = "history",
    responses((status = 200, description = "Number of matches removed", body = ClearHistoryResponse))
)]
pub async fn clear_history(State(state): State<SharedState>) -> Json<ClearHistoryResponse> {
    Json(history_service::clear(&state).await)
}
