//! Persistence of the scoreboard blobs.
//!
//! Commands never wait for storage: after a mutation the caller encodes the
//! dirty blobs while still holding the scoreboard lock and queues them on an
//! unbounded channel. A single writer task drains the queue, keeps only the
//! latest version of each blob and writes them sequentially.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    config::AppConfig,
    dao::{
        blob_store::{BlobKey, BlobStore},
        models::{CompletedMatchEntity, HistoryEntity, LedgerEntity, SettingsEntity},
        storage::{StorageError, StorageResult},
    },
    state::{
        SharedState,
        game::WINNING_POINTS_MENU,
        history::MatchHistory,
        scoreboard::{Changes, Scoreboard, ScoreboardSettings},
        stats::AllTimeLedger,
    },
};

/// Blob handed to the writer task.
#[derive(Debug)]
pub struct PendingWrite {
    key: BlobKey,
    blob: Vec<u8>,
}

impl PendingWrite {
    /// Blob this write targets.
    pub fn key(&self) -> BlobKey {
        self.key
    }
}

/// Sending half of the writer queue.
#[derive(Clone)]
pub struct PersistenceHandle {
    tx: mpsc::UnboundedSender<PendingWrite>,
}

impl PersistenceHandle {
    /// Create the queue; the receiver goes to [`run_writer`].
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PendingWrite>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Encode the blobs flagged in `changes` and queue them.
    pub fn persist(&self, board: &Scoreboard, changes: Changes) {
        for (key, encoded) in encode_changes(board, changes) {
            match encoded {
                Ok(blob) => {
                    if self.tx.send(PendingWrite { key, blob }).is_err() {
                        warn!(%key, "persistence writer stopped; dropping blob");
                    }
                }
                Err(err) => warn!(%key, error = %err, "failed to encode blob"),
            }
        }
    }
}

fn encode_changes(board: &Scoreboard, changes: Changes) -> Vec<(BlobKey, StorageResult<Vec<u8>>)> {
    let mut blobs = Vec::new();
    if changes.settings {
        blobs.push((BlobKey::Settings, encode_settings(&board.settings())));
    }
    if changes.history {
        blobs.push((BlobKey::History, encode_history(board.history())));
    }
    if changes.ledger {
        blobs.push((BlobKey::Ledger, encode_ledger(board.ledger())));
    }
    blobs
}

/// Drain the queue until every handle is dropped, writing blobs in order.
pub async fn run_writer(
    state: SharedState,
    store: Arc<dyn BlobStore>,
    mut rx: mpsc::UnboundedReceiver<PendingWrite>,
) {
    while let Some(first) = rx.recv().await {
        let mut pending: IndexMap<BlobKey, Vec<u8>> = IndexMap::new();
        pending.insert(first.key, first.blob);
        while let Ok(next) = rx.try_recv() {
            pending.insert(next.key, next.blob);
        }

        for (key, blob) in pending {
            let size = blob.len();
            match store.save(key, blob).await {
                Ok(()) => {
                    debug!(%key, size, "blob saved");
                    if state.is_degraded() {
                        info!("storage writable again; leaving degraded mode");
                        state.update_degraded(false);
                    }
                }
                Err(err) => {
                    warn!(%key, error = %err, "failed to save blob; entering degraded mode");
                    state.update_degraded(true);
                }
            }
        }
    }
    info!("persistence writer stopped");
}

/// Rebuild the scoreboard from the stored blobs.
///
/// A missing blob yields its default value; an unreadable or corrupt one is
/// logged and replaced by the default as well.
pub async fn restore(store: &dyn BlobStore, config: &AppConfig) -> Scoreboard {
    let default_settings = ScoreboardSettings {
        winning_points: config.default_winning_points,
        ..ScoreboardSettings::default()
    };

    let settings = load_or_default(store, BlobKey::Settings, default_settings.clone(), |blob| {
        decode_settings(blob, &default_settings)
    })
    .await;
    let history = load_or_default(
        store,
        BlobKey::History,
        MatchHistory::with_capacity(config.history_capacity),
        |blob| decode_history(blob, config.history_capacity),
    )
    .await;
    let ledger =
        load_or_default(store, BlobKey::Ledger, AllTimeLedger::default(), decode_ledger).await;

    info!(
        history = history.len(),
        ledger_games = ledger.total_games,
        "scoreboard restored"
    );
    Scoreboard::new(settings, history, ledger, config.undo_capacity)
}

async fn load_or_default<T>(
    store: &dyn BlobStore,
    key: BlobKey,
    default: T,
    decode: impl FnOnce(&[u8]) -> StorageResult<T>,
) -> T {
    match store.load(key).await {
        Ok(Some(blob)) => decode(&blob).unwrap_or_else(|err| {
            warn!(%key, error = %err, "stored blob is corrupt; using defaults");
            default
        }),
        Ok(None) => {
            info!(%key, "no stored blob; using defaults");
            default
        }
        Err(err) => {
            warn!(%key, error = %err, "failed to load blob; using defaults");
            default
        }
    }
}

fn encode<E: Serialize>(key: BlobKey, entity: &E) -> StorageResult<Vec<u8>> {
    serde_json::to_vec(entity).map_err(|source| StorageError::Codec {
        key: key.as_str(),
        source,
    })
}

fn decode<E: DeserializeOwned>(key: BlobKey, blob: &[u8]) -> StorageResult<E> {
    serde_json::from_slice(blob).map_err(|source| StorageError::Codec {
        key: key.as_str(),
        source,
    })
}

/// Encode the settings blob.
pub fn encode_settings(settings: &ScoreboardSettings) -> StorageResult<Vec<u8>> {
    encode(BlobKey::Settings, &SettingsEntity::from(settings))
}

/// Decode the settings blob, replacing an unsupported threshold by the default one.
pub fn decode_settings(
    blob: &[u8],
    defaults: &ScoreboardSettings,
) -> StorageResult<ScoreboardSettings> {
    let mut settings: ScoreboardSettings = decode::<SettingsEntity>(BlobKey::Settings, blob)?.into();
    if !WINNING_POINTS_MENU.contains(&settings.winning_points) {
        warn!(
            stored = settings.winning_points,
            "stored winning points not supported; using default"
        );
        settings.winning_points = defaults.winning_points;
    }
    Ok(settings)
}

/// Encode the history blob, oldest match first.
pub fn encode_history(history: &MatchHistory) -> StorageResult<Vec<u8>> {
    let entity = HistoryEntity {
        matches: history.iter().map(CompletedMatchEntity::from).collect(),
    };
    encode(BlobKey::History, &entity)
}

/// Decode the history blob, keeping the newest `capacity` matches.
pub fn decode_history(blob: &[u8], capacity: usize) -> StorageResult<MatchHistory> {
    let entity: HistoryEntity = decode(BlobKey::History, blob)?;
    Ok(MatchHistory::from_records(
        entity.matches.into_iter().map(Into::into).collect(),
        capacity,
    ))
}

/// Encode the all-time ledger blob.
pub fn encode_ledger(ledger: &AllTimeLedger) -> StorageResult<Vec<u8>> {
    encode(BlobKey::Ledger, &LedgerEntity::from(ledger))
}

/// Decode the all-time ledger blob.
pub fn decode_ledger(blob: &[u8]) -> StorageResult<AllTimeLedger> {
    decode::<LedgerEntity>(BlobKey::Ledger, blob).map(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::blob_store::memory::MemoryBlobStore,
        state::{
            AppState,
            game::{Side, TeamLineup},
            history::tests::{doubles_match, singles_match},
        },
    };

    fn sample_ledger() -> AllTimeLedger {
        let mut ledger = AllTimeLedger::default();
        ledger.record(&singles_match("Alice", "Bob", (21, 17), 1_000));
        ledger.record(&doubles_match(("Alice", "Bob"), ("Carol", "Dave"), (18, 21), 2_000));
        ledger
    }

    #[test]
    fn blobs_round_trip() {
        let mut history = MatchHistory::default();
        history.append(singles_match("Alice", "Bob", (21, 17), 1_000));
        history.append(doubles_match(("Alice", "Bob"), ("Carol", "Dave"), (18, 21), 2_000));
        let restored = decode_history(&encode_history(&history).unwrap(), 150).unwrap();
        assert_eq!(
            restored.iter().collect::<Vec<_>>(),
            history.iter().collect::<Vec<_>>()
        );

        let ledger = sample_ledger();
        assert_eq!(decode_ledger(&encode_ledger(&ledger).unwrap()).unwrap(), ledger);

        let settings = ScoreboardSettings {
            lineup: crate::state::game::Lineup::doubles(
                TeamLineup::pair("Alice", "Bob"),
                TeamLineup::pair("Carol", "Dave"),
                Side::B,
            ),
            winning_points: 15,
            special_scores_enabled: false,
        };
        let blob = encode_settings(&settings).unwrap();
        assert_eq!(
            decode_settings(&blob, &ScoreboardSettings::default()).unwrap(),
            settings
        );
    }

    #[test]
    fn history_decode_respects_capacity() {
        let mut history = MatchHistory::default();
        for started_at in 0..5 {
            history.append(singles_match("A", "B", (21, 3), started_at));
        }
        let restored = decode_history(&encode_history(&history).unwrap(), 3).unwrap();
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.iter().next().map(|m| m.started_at), Some(2));
    }

    #[test]
    fn unsupported_threshold_falls_back() {
        let blob = br#"{"mode":"singles","side_a":{"primary":"A"},"side_b":{"primary":"B"},"first_server":"a","winning_points":9}"#;
        let settings = decode_settings(blob, &ScoreboardSettings::default()).unwrap();
        assert_eq!(settings.winning_points, 21);
        assert!(settings.special_scores_enabled);
    }

    #[tokio::test]
    async fn corrupt_or_missing_blobs_restore_defaults() {
        let store = MemoryBlobStore::new();
        store
            .save(BlobKey::History, b"not json".to_vec())
            .await
            .unwrap();
        store
            .save(BlobKey::Ledger, encode_ledger(&sample_ledger()).unwrap())
            .await
            .unwrap();

        let board = restore(&store, &AppConfig::default()).await;
        assert!(board.history().is_empty());
        assert_eq!(board.ledger().total_games, 2);
        assert_eq!(board.settings().winning_points, 21);
    }

    #[tokio::test]
    async fn writer_persists_what_restore_reads_back() {
        let store = Arc::new(MemoryBlobStore::new());
        let (handle, rx) = PersistenceHandle::channel();
        let (unused, _unused_rx) = PersistenceHandle::channel();
        let state = AppState::new(AppConfig::default(), Scoreboard::default(), unused);

        {
            let mut board = state.scoreboard().await;
            let mut changes = board.configure_singles("Alice", "Bob").changes;
            for _ in 0..21 {
                let outcome = board.score_point(Side::A, 5_000);
                changes.history |= outcome.changes.history;
                changes.ledger |= outcome.changes.ledger;
            }
            handle.persist(&board, changes);
        }
        drop(handle);

        let writer_store: Arc<dyn BlobStore> = store.clone();
        run_writer(state.clone(), writer_store, rx).await;
        assert!(!state.is_degraded());

        let restored = restore(store.as_ref(), &AppConfig::default()).await;
        assert_eq!(restored.history().len(), 1);
        assert_eq!(restored.ledger().total_games, 1);
        assert_eq!(restored.settings().lineup.teams.a.primary, "Alice");
    }
}
