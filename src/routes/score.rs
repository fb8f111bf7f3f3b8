use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::score::{
        AnnouncementsRequest, CommandResponse, DoublesLineupRequest, MatchView, SideRequest,
        SinglesLineupRequest, WinningPointsRequest,
    },
    error::AppError,
    services::score_service,
    state::SharedState,
};

/// Live match endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/match", get(get_match))
        .route("/match/points", post(score_point))
        .route("/match/points/remove", post(remove_point))
        .route("/match/undo", post(undo))
        .route("/match/reset", post(reset))
        .route("/match/serve/swap", post(swap_serve))
        .route("/match/ends/swap", post(swap_ends))
        .route("/match/winning-points", put(set_winning_points))
        .route("/match/lineup/singles", put(configure_singles))
        .route("/match/lineup/doubles", put(configure_doubles))
        .route("/match/announcements", put(set_announcements))
}

/// Return the current scoreboard.
#[utoipa::path(
    get,
    path = "/match",
    tag = "match",
    responses((status = 200, description = "Current match", body = MatchView))
)]
pub async fn get_match(State(state): State<SharedState>) -> Json<MatchView> {
    Json(score_service::match_view(&state).await)
}

/// Award a rally to a side.
#[utoipa::path(
    post,
    path = "/match/points",
    tag = "match",
    request_body = SideRequest,
    responses(
        (status = 200, description = "Command result", body = CommandResponse),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn score_point(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SideRequest>>,
) -> Json<CommandResponse> {
    Json(score_service::score_point(&state, payload.side).await)
}

/// Take a point back from a side.
#[utoipa::path(
    post,
    path = "/match/points/remove",
    tag = "match",
    request_body = SideRequest,
    responses(
        (status = 200, description = "Command result", body = CommandResponse),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn remove_point(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SideRequest>>,
) -> Json<CommandResponse> {
    Json(score_service::remove_point(&state, payload.side).await)
}

/// Revert the last command.
#[utoipa::path(
    post,
    path = "/match/undo",
    tag = "match",
    responses((status = 200, description = "Command result", body = CommandResponse))
)]
pub async fn undo(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(score_service::undo(&state).await)
}

/// Start the match over with the same lineup.
#[utoipa::path(
    post,
    path = "/match/reset",
    tag = "match",
    responses((status = 200, description = "Command result", body = CommandResponse))
)]
pub async fn reset(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(score_service::reset(&state).await)
}

/// Hand the serve to the other side.
#[utoipa::path(
    post,
    path = "/match/serve/swap",
    tag = "match",
    responses((status = 200, description = "Command result", body = CommandResponse))
)]
pub async fn swap_serve(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(score_service::swap_serve(&state).await)
}

/// Exchange both sides of the scoreboard.
#[utoipa::path(
    post,
    path = "/match/ends/swap",
    tag = "match",
    responses((status = 200, description = "Command result", body = CommandResponse))
)]
pub async fn swap_ends(State(state): State<SharedState>) -> Json<CommandResponse> {
    Json(score_service::swap_ends(&state).await)
}

/// Select the winning-points threshold.
#[utoipa::path(
    put,
    path = "/match/winning-points",
    tag = "match",
    request_body = WinningPointsRequest,
    responses(
        (status = 200, description = "Command result", body = CommandResponse),
        (status = 400, description = "Threshold outside 3, 7, 11, 15, 21")
    )
)]
pub async fn set_winning_points(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<WinningPointsRequest>>,
) -> Json<CommandResponse> {
    Json(score_service::set_winning_points(&state, payload.points).await)
}

/// Start a singles match.
#[utoipa::path(
    put,
    path = "/match/lineup/singles",
    tag = "match",
    request_body = SinglesLineupRequest,
    responses(
        (status = 200, description = "Command result", body = CommandResponse),
        (status = 400, description = "Invalid or repeated player name")
    )
)]
pub async fn configure_singles(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SinglesLineupRequest>>,
) -> Result<Json<CommandResponse>, AppError> {
    Ok(Json(
        score_service::configure_singles(&state, payload).await?,
    ))
}

/// Start a doubles match.
#[utoipa::path(
    put,
    path = "/match/lineup/doubles",
    tag = "match",
    request_body = DoublesLineupRequest,
    responses(
        (status = 200, description = "Command result", body = CommandResponse),
        (status = 400, description = "Invalid or repeated player name")
    )
)]
pub async fn configure_doubles(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<DoublesLineupRequest>>,
) -> Result<Json<CommandResponse>, AppError> {
    Ok(Json(
        score_service::configure_doubles(&state, payload).await?,
    ))
}

/// Toggle special-score announcements.
#[utoipa::path(
    put,
    path = "/match/announcements",
    tag = "match",
    request_body = AnnouncementsRequest,
    responses((status = 200, description = "Command result", body = CommandResponse))
)]
pub async fn set_announcements(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<AnnouncementsRequest>>,
) -> Json<CommandResponse> {
    Json(score_service::set_announcements(&state, payload).await)
}
