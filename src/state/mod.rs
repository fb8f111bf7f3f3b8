pub mod engine;
pub mod game;
pub mod history;
pub mod participant;
pub mod rules;
pub mod scoreboard;
mod sse;
pub mod stats;
pub mod undo;

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::{Mutex, MutexGuard, watch};

use crate::{config::AppConfig, services::persistence::PersistenceHandle};

pub use self::scoreboard::Scoreboard;
pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

/// Capacity of the SSE broadcast channel.
const SSE_CAPACITY: usize = 64;

/// Central application state: the single scoreboard, the event hub and the
/// persistence handle.
pub struct AppState {
    config: AppConfig,
    scoreboard: Mutex<Scoreboard>,
    sse: SseHub,
    persistence: PersistenceHandle,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        config: AppConfig,
        scoreboard: Scoreboard,
        persistence: PersistenceHandle,
    ) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(false);
        Arc::new(Self {
            config,
            scoreboard: Mutex::new(scoreboard),
            sse: SseHub::new(SSE_CAPACITY),
            persistence,
            degraded: degraded_tx,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Lock the scoreboard; every command and query goes through this guard.
    pub async fn scoreboard(&self) -> MutexGuard<'_, Scoreboard> {
        self.scoreboard.lock().await
    }

    /// Broadcast hub used for the SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Queue used to hand blobs to the persistence writer.
    pub fn persistence(&self) -> &PersistenceHandle {
        &self.persistence
    }

    /// Whether the last storage interaction failed.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }
}

/// Current wall-clock time as unix milliseconds.
pub fn now_ms() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(nanos).unwrap_or(i64::MAX)
}
