//! Serialized shapes of the persisted blobs.
//!
//! Entities are kept separate from the domain types so the on-disk format can
//! stay stable while the in-memory model evolves.

use serde::{Deserialize, Serialize};

use crate::state::{
    game::{Lineup, Mode, PerSide, Side, TeamLineup},
    history::CompletedMatch,
    participant::ParticipantId,
    scoreboard::ScoreboardSettings,
    stats::{AllTimeLedger, HeadToHead, LedgerRecord},
};

/// Players fielded by one side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Player starting on the even court (only player in singles).
    pub primary: String,
    /// Doubles partner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,
}

impl From<&TeamLineup> for TeamEntity {
    fn from(team: &TeamLineup) -> Self {
        Self {
            primary: team.primary.clone(),
            partner: team.partner.clone(),
        }
    }
}

impl From<TeamEntity> for TeamLineup {
    fn from(entity: TeamEntity) -> Self {
        match entity.partner {
            Some(partner) => TeamLineup::pair(entity.primary, partner),
            None => TeamLineup::solo(entity.primary),
        }
    }
}

/// Player names and preferences restored at start-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsEntity {
    /// Singles or doubles.
    pub mode: Mode,
    /// Players on side A.
    pub side_a: TeamEntity,
    /// Players on side B.
    pub side_b: TeamEntity,
    /// Side serving the first rally.
    pub first_server: Side,
    /// Winning-points threshold.
    pub winning_points: u8,
    /// Whether special scores are announced.
    #[serde(default = "default_special_scores")]
    pub special_scores_enabled: bool,
}

fn default_special_scores() -> bool {
    true
}

impl From<&ScoreboardSettings> for SettingsEntity {
    fn from(settings: &ScoreboardSettings) -> Self {
        Self {
            mode: settings.lineup.mode,
            side_a: (&settings.lineup.teams.a).into(),
            side_b: (&settings.lineup.teams.b).into(),
            first_server: settings.lineup.first_server,
            winning_points: settings.winning_points,
            special_scores_enabled: settings.special_scores_enabled,
        }
    }
}

impl From<SettingsEntity> for ScoreboardSettings {
    fn from(entity: SettingsEntity) -> Self {
        Self {
            lineup: Lineup {
                mode: entity.mode,
                teams: PerSide::new(entity.side_a.into(), entity.side_b.into()),
                first_server: entity.first_server,
            },
            winning_points: entity.winning_points,
            special_scores_enabled: entity.special_scores_enabled,
        }
    }
}

/// A finished match as stored in the history blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletedMatchEntity {
    /// Singles or doubles.
    pub mode: Mode,
    /// Players on side A.
    pub side_a: TeamEntity,
    /// Players on side B.
    pub side_b: TeamEntity,
    /// Final score of side A.
    pub score_a: u8,
    /// Final score of side B.
    pub score_b: u8,
    /// Threshold the match was played to.
    pub winning_points: u8,
    /// Unix timestamp (ms); identifies the match.
    pub started_at: i64,
    /// Unix timestamp (ms).
    pub ended_at: i64,
    /// Winning side.
    pub winner: Side,
}

impl From<&CompletedMatch> for CompletedMatchEntity {
    fn from(record: &CompletedMatch) -> Self {
        Self {
            mode: record.mode,
            side_a: (&record.teams.a).into(),
            side_b: (&record.teams.b).into(),
            score_a: record.score.a,
            score_b: record.score.b,
            winning_points: record.winning_points,
            started_at: record.started_at,
            ended_at: record.ended_at,
            winner: record.winner,
        }
    }
}

impl From<CompletedMatchEntity> for CompletedMatch {
    fn from(entity: CompletedMatchEntity) -> Self {
        Self {
            mode: entity.mode,
            teams: PerSide::new(entity.side_a.into(), entity.side_b.into()),
            score: PerSide::new(entity.score_a, entity.score_b),
            winning_points: entity.winning_points,
            started_at: entity.started_at,
            ended_at: entity.ended_at,
            winner: entity.winner,
        }
    }
}

/// History blob: matches in insertion order, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntity {
    /// Stored matches.
    pub matches: Vec<CompletedMatchEntity>,
}

/// Head-to-head counters against one opponent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadToHeadEntity {
    /// Opposing player or team.
    pub opponent: ParticipantId,
    /// Matches won against the opponent.
    pub wins: u32,
    /// Matches lost against the opponent.
    pub losses: u32,
}

/// Lifetime counters of one player or team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerParticipantEntity {
    /// Player or team.
    pub id: ParticipantId,
    /// Matches played.
    pub games_played: u32,
    /// Matches won.
    pub wins: u32,
    /// Matches lost.
    pub losses: u32,
    /// Head-to-head counters, one per opponent.
    #[serde(default)]
    pub opponents: Vec<HeadToHeadEntity>,
}

/// All-time ledger blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntity {
    /// Matches counted since the ledger was created.
    pub total_games: u64,
    /// End timestamp (ms) of the earliest counted match.
    pub first_game_at: Option<i64>,
    /// End timestamp (ms) of the latest counted match.
    pub last_game_at: Option<i64>,
    /// Counters per player or team.
    pub participants: Vec<LedgerParticipantEntity>,
}

impl From<&AllTimeLedger> for LedgerEntity {
    fn from(ledger: &AllTimeLedger) -> Self {
        let participants = ledger
            .records
            .iter()
            .map(|(id, record)| LedgerParticipantEntity {
                id: id.clone(),
                games_played: record.games_played,
                wins: record.wins,
                losses: record.losses,
                opponents: record
                    .opponents
                    .iter()
                    .map(|(opponent, result)| HeadToHeadEntity {
                        opponent: opponent.clone(),
                        wins: result.wins,
                        losses: result.losses,
                    })
                    .collect(),
            })
            .collect();

        Self {
            total_games: ledger.total_games,
            first_game_at: ledger.first_game_at,
            last_game_at: ledger.last_game_at,
            participants,
        }
    }
}

impl From<LedgerEntity> for AllTimeLedger {
    fn from(entity: LedgerEntity) -> Self {
        let records = entity
            .participants
            .into_iter()
            .map(|participant| {
                let opponents = participant
                    .opponents
                    .into_iter()
                    .map(|entry| {
                        (
                            entry.opponent,
                            HeadToHead {
                                wins: entry.wins,
                                losses: entry.losses,
                            },
                        )
                    })
                    .collect();
                (
                    participant.id,
                    LedgerRecord {
                        games_played: participant.games_played,
                        wins: participant.wins,
                        losses: participant.losses,
                        opponents,
                    },
                )
            })
            .collect();

        Self {
            records,
            total_games: entity.total_games,
            first_game_at: entity.first_game_at,
            last_game_at: entity.last_game_at,
        }
    }
}
