use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{dao::blob_store::BlobStore, state::SharedState};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Poll the blob store and keep the shared state in degraded mode while it is unreachable.
pub async fn run(state: SharedState, store: Arc<dyn BlobStore>) {
    let mut delay = INITIAL_DELAY;

    loop {
        match store.health_check().await {
            Ok(()) => {
                if state.is_degraded() {
                    info!("storage healthy again; leaving degraded mode");
                    state.update_degraded(false);
                }
                delay = INITIAL_DELAY;
                sleep(HEALTH_POLL_INTERVAL).await;
            }
            Err(err) => {
                if !state.is_degraded() {
                    warn!(error = %err, "storage health check failed; entering degraded mode");
                    state.update_degraded(true);
                } else {
                    warn!(error = %err, retry_in = ?delay, "storage still unavailable");
                }
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }
}
