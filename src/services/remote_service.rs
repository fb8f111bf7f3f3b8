//! Remote-control WebSocket: every text frame names one key press, answered
//! by an acknowledgement carrying the command status.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::{
        remote::{RemoteAck, RemoteAction, RemoteInboundMessage},
        score::CommandResponse,
    },
    services::score_service,
    state::{SharedState, game::Side},
};

#[derive(Debug, Error)]
enum RemoteError {
    /// Writer channel closed; the connection must be torn down.
    #[error("connection closed")]
    ConnectionClosed,
}

/// Handle the full lifecycle of one remote-control connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps acknowledgements flowing while inbound frames are awaited.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    info!(%connection_id, "remote connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match RemoteInboundMessage::from_json_str(&text) {
                Ok(RemoteInboundMessage { action }) => {
                    let response = dispatch(&state, action).await;
                    info!(%connection_id, ?action, message = %response.message, "remote action");
                    if send_ack(&outbound_tx, action, response).is_err() {
                        info!(%connection_id, "connection closed during acknowledgement");
                        break;
                    }
                }
                Err(err) => {
                    warn!(%connection_id, error = %err, "failed to parse remote message");
                }
            },
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) | Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(%connection_id, error = %err, "websocket error");
                break;
            }
        }
    }

    info!(%connection_id, "remote disconnected");
    finalize(writer_task, outbound_tx).await;
}

/// Map a key press onto its scoreboard command.
pub async fn dispatch(state: &SharedState, action: RemoteAction) -> CommandResponse {
    match action {
        RemoteAction::ScoreA => score_service::score_point(state, Side::A).await,
        RemoteAction::ScoreB => score_service::score_point(state, Side::B).await,
        RemoteAction::RemoveA => score_service::remove_point(state, Side::A).await,
        RemoteAction::RemoveB => score_service::remove_point(state, Side::B).await,
        RemoteAction::Reset => score_service::reset(state).await,
        RemoteAction::SwapServe => score_service::swap_serve(state).await,
        RemoteAction::Undo => score_service::undo(state).await,
    }
}

fn send_ack(
    tx: &mpsc::UnboundedSender<Message>,
    action: RemoteAction,
    response: CommandResponse,
) -> Result<(), RemoteError> {
    let ack = RemoteAck {
        action,
        status: response.status,
        message: response.message,
    };
    let payload = match serde_json::to_string(&ack) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "failed to serialize remote acknowledgement");
            return Ok(());
        }
    };
    tx.send(Message::Text(payload.into()))
        .map_err(|_| RemoteError::ConnectionClosed)
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
