use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::{
    dto::sse::{Handshake, ServerEvent},
    state::SharedState,
};

const STREAM_NAME: &str = "events";

/// Subscribe to the scoreboard event stream.
///
/// The handshake is queued on the new receiver only, so other clients do not
/// see it.
pub fn subscribe(state: &SharedState) -> (broadcast::Receiver<ServerEvent>, Option<ServerEvent>) {
    let receiver = state.sse().subscribe();
    let handshake = ServerEvent::json(
        Some("handshake".to_string()),
        &Handshake {
            stream: STREAM_NAME.to_string(),
            message: "scoreboard stream connected".to_string(),
            degraded: state.is_degraded(),
        },
    )
    .ok();
    (receiver, handshake)
}

/// Convert a broadcast receiver into an SSE response, forwarding events until
/// the client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
    handshake: Option<ServerEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        if let Some(handshake) = handshake {
            if tx.send(Ok(to_event(handshake))).await.is_err() {
                return;
            }
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            if tx.send(Ok(to_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            // Skip lagged messages but keep the stream alive.
                            debug!(skipped, "SSE subscriber lagging");
                            continue;
                        }
                    }
                }
            }
        }

        info!("SSE stream disconnected");
    });

    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_event(payload: ServerEvent) -> Event {
    let event = Event::default().data(payload.data);
    match payload.event {
        Some(name) => event.event(name),
        None => event,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        services::persistence::PersistenceHandle,
        state::{AppState, Scoreboard},
    };

    #[tokio::test]
    async fn handshake_reports_degraded_flag() {
        let (handle, _rx) = PersistenceHandle::channel();
        let state = AppState::new(AppConfig::default(), Scoreboard::default(), handle);
        state.update_degraded(true);

        let (_receiver, handshake) = subscribe(&state);
        let handshake = handshake.unwrap();
        assert_eq!(handshake.event.as_deref(), Some("handshake"));
        let payload: serde_json::Value = serde_json::from_str(&handshake.data).unwrap();
        assert_eq!(payload["degraded"], true);
        assert_eq!(payload["stream"], "events");
    }
}
