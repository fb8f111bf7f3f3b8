use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::{game::Side, rules::SpecialScore};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Build an event from a pre-rendered data field.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream.
    pub stream: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether blobs are currently failing to reach the storage backend.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after every awarded rally.
pub struct PointScoredEvent {
    pub match_id: Uuid,
    pub side: Side,
    pub score_a: u8,
    pub score_b: u8,
    pub game_point: bool,
    /// Umpire call, server's score first.
    pub call: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a score combination deserves a bonus announcement.
pub struct SpecialScoreEvent {
    pub match_id: Uuid,
    pub kind: SpecialScore,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the match has been won.
pub struct MatchWonEvent {
    pub match_id: Uuid,
    pub winner: Side,
    /// Canonical identity of the winner.
    pub winner_id: String,
    pub score_a: u8,
    pub score_b: u8,
}
