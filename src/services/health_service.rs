use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether blobs are currently reaching the storage backend.
pub fn health_status(state: &SharedState) -> HealthResponse {
    if state.is_degraded() {
        warn!("health requested while storage is degraded");
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
