use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod health;
pub mod history;
pub mod remote;
pub mod score;
pub mod sse;
pub mod stats;

/// Compose all route trees and attach the shared state.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(score::router())
        .merge(history::router())
        .merge(stats::router())
        .merge(sse::router())
        .merge(remote::router())
        .merge(docs::router());

    api_router.with_state(state)
}
