//! DTO definitions for the statistics routes.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::state::{
    participant::ParticipantId,
    stats::{HeadToHead, ParticipantStats, StatsTable},
};

/// Range of matches the statistics are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatsWindow {
    /// Every stored match.
    #[default]
    All,
    /// Stored matches that ended in the last 24 hours.
    Last24Hours,
    /// Lifetime ledger, including matches evicted from the history.
    AllTime,
}

/// Query string of `GET /stats`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Defaults to `all`.
    pub window: Option<StatsWindow>,
}

/// Results against one opponent.
#[derive(Debug, Serialize, ToSchema)]
pub struct HeadToHeadView {
    pub opponent: String,
    pub wins: u32,
    pub losses: u32,
    pub total: u32,
    pub win_rate: f64,
}

/// One row of a statistics table.
#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantStatsView {
    /// "Alice" or "Alice/Bob" (doubles names sorted).
    pub id: String,
    pub players: Vec<String>,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub head_to_head: Vec<HeadToHeadView>,
}

fn players_of(id: &ParticipantId) -> Vec<String> {
    match id {
        ParticipantId::Player { name } => vec![name.clone()],
        ParticipantId::Team { first, second } => vec![first.clone(), second.clone()],
    }
}

impl From<ParticipantStats> for ParticipantStatsView {
    fn from(stats: ParticipantStats) -> Self {
        Self {
            id: stats.id.to_string(),
            players: players_of(&stats.id),
            games_played: stats.games_played,
            wins: stats.wins,
            losses: stats.losses,
            win_rate: stats.win_rate,
            head_to_head: stats
                .head_to_head
                .into_iter()
                .map(|(opponent, result): (ParticipantId, HeadToHead)| HeadToHeadView {
                    opponent: opponent.to_string(),
                    wins: result.wins,
                    losses: result.losses,
                    total: result.total(),
                    win_rate: result.win_rate(),
                })
                .collect(),
        }
    }
}

/// Statistics tables for the requested window.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub window: StatsWindow,
    /// Matches accounted for.
    pub total_games: u64,
    /// End timestamp (unix ms) of the earliest accounted match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_game_at: Option<i64>,
    /// End timestamp (unix ms) of the latest accounted match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_game_at: Option<i64>,
    pub singles: Vec<ParticipantStatsView>,
    pub doubles: Vec<ParticipantStatsView>,
}

impl StatsResponse {
    /// Assemble a response from computed tables.
    pub fn new(
        window: StatsWindow,
        total_games: u64,
        bounds: (Option<i64>, Option<i64>),
        table: StatsTable,
    ) -> Self {
        Self {
            window,
            total_games,
            first_game_at: bounds.0,
            last_game_at: bounds.1,
            singles: table.singles.into_iter().map(Into::into).collect(),
            doubles: table.doubles.into_iter().map(Into::into).collect(),
        }
    }
}
