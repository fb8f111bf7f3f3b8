//! Commands and queries on the live match.
//!
//! Every command runs under the scoreboard lock: the mutation, the persistence
//! hand-off and the SSE broadcast happen in one critical section so events
//! leave in command order.

use tracing::{debug, info};

use crate::{
    dto::score::{
        AnnouncementsRequest, CommandResponse, DoublesLineupRequest, MatchView,
        SinglesLineupRequest,
    },
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState, now_ms,
        game::{Side, TeamLineup},
        participant::normalize_name,
        scoreboard::{CommandOutcome, Scoreboard},
    },
};

/// Current scoreboard view.
pub async fn match_view(state: &SharedState) -> MatchView {
    let board = state.scoreboard().await;
    MatchView::from_board(&board)
}

/// Run `command` against the scoreboard, persist what it touched and broadcast
/// what it produced.
pub async fn run_command<F>(state: &SharedState, name: &'static str, command: F) -> CommandResponse
where
    F: FnOnce(&mut Scoreboard, i64) -> CommandOutcome,
{
    let mut board = state.scoreboard().await;
    let outcome = command(&mut board, now_ms());

    if outcome.is_applied() {
        debug!(command = name, message = %outcome.message, "command applied");
        if !outcome.changes.is_empty() {
            state.persistence().persist(&board, outcome.changes);
        }
    } else {
        info!(command = name, reason = %outcome.message, "command rejected");
    }

    let view = MatchView::from_board(&board);
    sse_events::broadcast_outcome(state, &outcome, &view);
    CommandResponse::new(&outcome, view)
}

/// Award a rally.
pub async fn score_point(state: &SharedState, side: Side) -> CommandResponse {
    run_command(state, "score_point", |board, now| board.score_point(side, now)).await
}

/// Take a point back.
pub async fn remove_point(state: &SharedState, side: Side) -> CommandResponse {
    run_command(state, "remove_point", |board, _| board.remove_point(side)).await
}

/// Revert the last command.
pub async fn undo(state: &SharedState) -> CommandResponse {
    run_command(state, "undo", |board, _| board.undo()).await
}

/// Start the match over.
pub async fn reset(state: &SharedState) -> CommandResponse {
    run_command(state, "reset", |board, _| board.reset()).await
}

/// Hand the serve to the other side.
pub async fn swap_serve(state: &SharedState) -> CommandResponse {
    run_command(state, "swap_serve", |board, _| board.swap_serve()).await
}

/// Exchange both sides.
pub async fn swap_ends(state: &SharedState) -> CommandResponse {
    run_command(state, "swap_ends", |board, _| board.swap_ends()).await
}

/// Change the winning threshold.
pub async fn set_winning_points(state: &SharedState, points: u8) -> CommandResponse {
    run_command(state, "set_winning_points", |board, now| {
        board.set_winning_points(points, now)
    })
    .await
}

/// Start a singles match.
pub async fn configure_singles(
    state: &SharedState,
    request: SinglesLineupRequest,
) -> Result<CommandResponse, ServiceError> {
    ensure_distinct(&[&request.side_a, &request.side_b])?;
    Ok(run_command(state, "configure_singles", |board, _| {
        board.configure_singles(&request.side_a, &request.side_b)
    })
    .await)
}

/// Start a doubles match.
pub async fn configure_doubles(
    state: &SharedState,
    request: DoublesLineupRequest,
) -> Result<CommandResponse, ServiceError> {
    ensure_distinct(&[
        &request.side_a.even_court,
        &request.side_a.odd_court,
        &request.side_b.even_court,
        &request.side_b.odd_court,
    ])?;
    let first_server = request.first_server;
    let side_a = TeamLineup::from(request.side_a);
    let side_b = TeamLineup::from(request.side_b);
    Ok(run_command(state, "configure_doubles", move |board, _| {
        board.configure_doubles(side_a, side_b, first_server)
    })
    .await)
}

/// Toggle special-score announcements.
pub async fn set_announcements(
    state: &SharedState,
    request: AnnouncementsRequest,
) -> CommandResponse {
    run_command(state, "set_announcements", |board, _| {
        board.set_special_scores(request.special_scores_enabled)
    })
    .await
}

/// Reject lineups naming the same player twice; the ledger could not tell them apart.
fn ensure_distinct(names: &[&String]) -> Result<(), ServiceError> {
    let mut seen: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = normalize_name(name);
        if seen.contains(&name) {
            return Err(ServiceError::InvalidInput(format!(
                "player `{name}` appears twice in the lineup"
            )));
        }
        seen.push(name);
    }
    Ok(())
}
