use serde::Serialize;
use tracing::{info, warn};

use crate::{
    dto::{
        score::MatchView,
        sse::{MatchWonEvent, PointScoredEvent, ServerEvent, SpecialScoreEvent, SystemStatus},
    },
    state::{
        SharedState, SseHub,
        scoreboard::{CommandOutcome, ScoreEvent},
    },
};

const EVENT_POINT_SCORED: &str = "point.scored";
const EVENT_SPECIAL_SCORE: &str = "special.score";
const EVENT_MATCH_WON: &str = "match.won";
const EVENT_MATCH_UPDATED: &str = "match.updated";
const EVENT_SYSTEM_STATUS: &str = "system.status";
const EVENT_INFO: &str = "info";

/// Broadcast the events of an applied command followed by the refreshed view.
pub fn broadcast_outcome(state: &SharedState, outcome: &CommandOutcome, view: &MatchView) {
    if !outcome.is_applied() {
        return;
    }
    for event in &outcome.events {
        broadcast_score_event(state.sse(), event);
    }
    send_event(state.sse(), EVENT_MATCH_UPDATED, view);
}

fn broadcast_score_event(hub: &SseHub, event: &ScoreEvent) {
    match event {
        ScoreEvent::PointScored {
            match_id,
            side,
            score,
            game_point,
            call,
        } => send_event(
            hub,
            EVENT_POINT_SCORED,
            &PointScoredEvent {
                match_id: *match_id,
                side: *side,
                score_a: score.a,
                score_b: score.b,
                game_point: *game_point,
                call: call.clone(),
            },
        ),
        ScoreEvent::SpecialScore { match_id, kind } => send_event(
            hub,
            EVENT_SPECIAL_SCORE,
            &SpecialScoreEvent {
                match_id: *match_id,
                kind: *kind,
            },
        ),
        ScoreEvent::MatchWon {
            match_id,
            winner,
            winner_id,
            score,
        } => send_event(
            hub,
            EVENT_MATCH_WON,
            &MatchWonEvent {
                match_id: *match_id,
                winner: *winner,
                winner_id: winner_id.to_string(),
                score_a: score.a,
                score_b: score.b,
            },
        ),
    }
}

/// Send a human-readable info message onto the SSE stream.
pub fn broadcast_info(hub: &SseHub, message: &str) {
    hub.broadcast(ServerEvent::new(
        Some(EVENT_INFO.to_string()),
        message.to_string(),
    ));
}

/// Forward every degraded-mode flip to SSE subscribers until the state is dropped.
pub async fn run_status_notifier(state: SharedState) {
    let mut watcher = state.degraded_watcher();
    while watcher.changed().await.is_ok() {
        let degraded = *watcher.borrow_and_update();
        info!(degraded, "storage status changed");
        send_event(state.sse(), EVENT_SYSTEM_STATUS, &SystemStatus { degraded });
    }
}

fn send_event(hub: &SseHub, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
