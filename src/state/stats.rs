//! Player and team statistics.
//!
//! Two computations share the same counters:
//! - [`WindowedStats`] folds any slice of the stored history from scratch;
//! - [`AllTimeLedger`] is maintained incrementally on every finished match and
//!   reversed when a match is deleted, independently of the history cap.

use std::cmp::Reverse;

use indexmap::IndexMap;

use crate::state::{game::Side, history::CompletedMatch, participant::ParticipantId};

/// Wins over games, `0.0` when nothing was played.
pub fn win_rate(wins: u32, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        f64::from(wins) / f64::from(games)
    }
}

/// Results against one specific opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadToHead {
    /// Matches won against the opponent.
    pub wins: u32,
    /// Matches lost against the opponent.
    pub losses: u32,
}

impl HeadToHead {
    /// Number of meetings.
    pub fn total(&self) -> u32 {
        self.wins + self.losses
    }

    /// Share of meetings won.
    pub fn win_rate(&self) -> f64 {
        win_rate(self.wins, self.total())
    }
}

/// Counters kept for a player or a team.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerRecord {
    /// Matches played.
    pub games_played: u32,
    /// Matches won.
    pub wins: u32,
    /// Matches lost.
    pub losses: u32,
    /// Per-opponent results, in first-meeting order.
    pub opponents: IndexMap<ParticipantId, HeadToHead>,
}

impl LedgerRecord {
    /// Share of matches won.
    pub fn win_rate(&self) -> f64 {
        win_rate(self.wins, self.games_played)
    }

    fn add_result(&mut self, opponent: ParticipantId, won: bool) {
        self.games_played += 1;
        let head_to_head = self.opponents.entry(opponent).or_default();
        if won {
            self.wins += 1;
            head_to_head.wins += 1;
        } else {
            self.losses += 1;
            head_to_head.losses += 1;
        }
    }

    fn remove_result(&mut self, opponent: &ParticipantId, won: bool) {
        self.games_played = self.games_played.saturating_sub(1);
        if won {
            self.wins = self.wins.saturating_sub(1);
        } else {
            self.losses = self.losses.saturating_sub(1);
        }

        if let Some(head_to_head) = self.opponents.get_mut(opponent) {
            if won {
                head_to_head.wins = head_to_head.wins.saturating_sub(1);
            } else {
                head_to_head.losses = head_to_head.losses.saturating_sub(1);
            }
            if head_to_head.total() == 0 {
                self.opponents.shift_remove(opponent);
            }
        }
    }
}

/// One row of a statistics table.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantStats {
    /// Player or team.
    pub id: ParticipantId,
    /// Matches played.
    pub games_played: u32,
    /// Matches won.
    pub wins: u32,
    /// Matches lost.
    pub losses: u32,
    /// Share of matches won.
    pub win_rate: f64,
    /// Results per opponent, most frequent opponent first.
    pub head_to_head: Vec<(ParticipantId, HeadToHead)>,
}

impl ParticipantStats {
    fn from_record(id: ParticipantId, record: &LedgerRecord) -> Self {
        let mut head_to_head: Vec<_> = record
            .opponents
            .iter()
            .map(|(opponent, result)| (opponent.clone(), *result))
            .collect();
        head_to_head.sort_by_key(|(_, result)| Reverse(result.total()));

        Self {
            id,
            games_played: record.games_played,
            wins: record.wins,
            losses: record.losses,
            win_rate: record.win_rate(),
            head_to_head,
        }
    }
}

/// Singles and doubles tables, busiest participants first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsTable {
    /// Singles players.
    pub singles: Vec<ParticipantStats>,
    /// Doubles teams.
    pub doubles: Vec<ParticipantStats>,
}

impl StatsTable {
    fn from_records(records: &IndexMap<ParticipantId, LedgerRecord>) -> Self {
        let (doubles, singles): (Vec<_>, Vec<_>) = records
            .iter()
            .map(|(id, record)| ParticipantStats::from_record(id.clone(), record))
            .partition(|row| row.id.is_team());

        let mut table = Self { singles, doubles };
        table
            .singles
            .sort_by_key(|row| Reverse(row.games_played));
        table
            .doubles
            .sort_by_key(|row| Reverse(row.games_played));
        table
    }

    /// Whether both tables are empty.
    pub fn is_empty(&self) -> bool {
        self.singles.is_empty() && self.doubles.is_empty()
    }
}

/// Stateless recomputation over an arbitrary window of matches.
pub struct WindowedStats;

impl WindowedStats {
    /// Fold every match of the window into fresh tables.
    pub fn compute<'a>(matches: impl IntoIterator<Item = &'a CompletedMatch>) -> StatsTable {
        let mut records: IndexMap<ParticipantId, LedgerRecord> = IndexMap::new();
        for record in matches {
            for side in [Side::A, Side::B] {
                records
                    .entry(record.participant(side))
                    .or_default()
                    .add_result(record.participant(side.opponent()), record.winner == side);
            }
        }
        StatsTable::from_records(&records)
    }
}

/// Lifetime ledger, updated per finished match and reversed per deletion.
///
/// First/last timestamps only widen on insertion; a deletion resets them once
/// the ledger is empty but never recomputes them after a partial deletion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllTimeLedger {
    /// Counters per player or team.
    pub records: IndexMap<ParticipantId, LedgerRecord>,
    /// Matches currently accounted for.
    pub total_games: u64,
    /// End timestamp of the earliest recorded match.
    pub first_game_at: Option<i64>,
    /// End timestamp of the latest recorded match.
    pub last_game_at: Option<i64>,
}

impl AllTimeLedger {
    /// Account for a finished match.
    pub fn record(&mut self, record: &CompletedMatch) {
        for side in [Side::A, Side::B] {
            self.records
                .entry(record.participant(side))
                .or_default()
                .add_result(record.participant(side.opponent()), record.winner == side);
        }

        self.total_games += 1;
        self.first_game_at = Some(
            self.first_game_at
                .map_or(record.ended_at, |first| first.min(record.ended_at)),
        );
        self.last_game_at = Some(
            self.last_game_at
                .map_or(record.ended_at, |last| last.max(record.ended_at)),
        );
    }

    /// Reverse the effect of [`AllTimeLedger::record`] for a deleted match.
    ///
    /// Counters are clamped at zero; emptied head-to-head and participant
    /// entries are dropped.
    pub fn remove(&mut self, record: &CompletedMatch) {
        for side in [Side::A, Side::B] {
            let id = record.participant(side);
            let Some(entry) = self.records.get_mut(&id) else {
                continue;
            };
            entry.remove_result(&record.participant(side.opponent()), record.winner == side);
            if entry.games_played == 0 {
                self.records.shift_remove(&id);
            }
        }

        self.total_games = self.total_games.saturating_sub(1);
        if self.total_games == 0 {
            self.first_game_at = None;
            self.last_game_at = None;
        }
    }

    /// Counters for one participant.
    pub fn get(&self, id: &ParticipantId) -> Option<&LedgerRecord> {
        self.records.get(id)
    }

    /// Tables built from the lifetime counters.
    pub fn table(&self) -> StatsTable {
        StatsTable::from_records(&self.records)
    }
}
