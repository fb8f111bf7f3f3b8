//! Application-level configuration loading: storage backend, capacities and
//! the local calendar used to group history by day.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use time::UtcOffset;
use tracing::{info, warn};

use crate::state::{
    game::{DEFAULT_WINNING_POINTS, WINNING_POINTS_MENU},
    history::DEFAULT_HISTORY_CAPACITY,
    undo::DEFAULT_UNDO_CAPACITY,
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BADMINTON_SCORE_CONFIG_PATH";
/// Directory holding the blob files when none is configured.
const DEFAULT_DATA_DIR: &str = "data";

/// Backend used to persist settings, history and the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// One JSON file per blob under the data directory.
    #[default]
    File,
    /// Nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Directory used by the file store.
    pub data_dir: PathBuf,
    /// Selected storage backend.
    pub storage: StorageKind,
    /// Offset of the local calendar (history day grouping).
    pub utc_offset: UtcOffset,
    /// Threshold used until the scorer picks another one.
    pub default_winning_points: u8,
    /// Maximum number of undo snapshots.
    pub undo_capacity: usize,
    /// Maximum number of stored matches.
    pub history_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        storage = ?app_config.storage,
                        data_dir = %app_config.data_dir.display(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    data_dir: Option<PathBuf>,
    storage: StorageKind,
    utc_offset_minutes: Option<i32>,
    default_winning_points: Option<u8>,
    undo_capacity: Option<usize>,
    history_capacity: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let default_winning_points = match raw.default_winning_points {
            Some(points) if WINNING_POINTS_MENU.contains(&points) => points,
            Some(points) => {
                warn!(
                    points,
                    "default winning points not in {WINNING_POINTS_MENU:?}; using {DEFAULT_WINNING_POINTS}"
                );
                DEFAULT_WINNING_POINTS
            }
            None => DEFAULT_WINNING_POINTS,
        };

        Self {
            data_dir: raw
                .data_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            storage: raw.storage,
            utc_offset: resolve_offset(raw.utc_offset_minutes),
            default_winning_points,
            undo_capacity: raw.undo_capacity.unwrap_or(DEFAULT_UNDO_CAPACITY).max(1),
            history_capacity: raw
                .history_capacity
                .unwrap_or(DEFAULT_HISTORY_CAPACITY)
                .max(1),
        }
    }
}

/// Configured offset, else the system's local offset, else UTC.
fn resolve_offset(minutes: Option<i32>) -> UtcOffset {
    if let Some(minutes) = minutes {
        match UtcOffset::from_whole_seconds(minutes.saturating_mul(60)) {
            Ok(offset) => return offset,
            Err(err) => warn!(minutes, error = %err, "invalid utc offset; ignoring"),
        }
    }
    UtcOffset::current_local_offset().unwrap_or_else(|_| {
        info!("local utc offset unavailable; grouping history by UTC day");
        UtcOffset::UTC
    })
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
