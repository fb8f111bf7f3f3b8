use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::score::CommandStatusDto;

/// Button pressed on a remote control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RemoteAction {
    ScoreA,
    ScoreB,
    RemoveA,
    RemoveB,
    Reset,
    SwapServe,
    Undo,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
/// Messages accepted from remote-control WebSocket clients.
pub struct RemoteInboundMessage {
    pub action: RemoteAction,
}

impl RemoteInboundMessage {
    /// Parse a text frame.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Acknowledgement sent back for every remote action.
pub struct RemoteAck {
    pub action: RemoteAction,
    pub status: CommandStatusDto,
    pub message: String,
}
