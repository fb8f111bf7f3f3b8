use std::collections::VecDeque;

use time::{Date, OffsetDateTime, UtcOffset};

use crate::state::{
    game::{Mode, PerSide, Side, TeamLineup},
    participant::ParticipantId,
};

/// Number of finished matches kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 150;

/// Immutable record of a finished match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedMatch {
    /// Singles or doubles.
    pub mode: Mode,
    /// Players on each side, as fielded during the match.
    pub teams: PerSide<TeamLineup>,
    /// Final score.
    pub score: PerSide<u8>,
    /// Threshold in force when the match ended.
    pub winning_points: u8,
    /// Unix timestamp (ms) of the first rally; identifies the match.
    pub started_at: i64,
    /// Unix timestamp (ms) of the winning rally.
    pub ended_at: i64,
    /// Side that won.
    pub winner: Side,
}

impl CompletedMatch {
    /// Canonical identity of the side `side`.
    pub fn participant(&self, side: Side) -> ParticipantId {
        ParticipantId::from_lineup(&self.teams[side])
    }

    /// Canonical identity of the winner.
    pub fn winner_id(&self) -> ParticipantId {
        self.participant(self.winner)
    }

    /// Match length in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).max(0)
    }
}

/// Matches finished on the same local calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    /// Local calendar date.
    pub date: Date,
    /// Matches of the day, most recent first.
    pub matches: Vec<CompletedMatch>,
}

/// Aggregate counts over the stored history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistorySummary {
    /// Number of stored matches.
    pub total_games: usize,
    /// Matches won by whoever played on side A.
    pub side_a_wins: usize,
    /// Matches won by whoever played on side B.
    pub side_b_wins: usize,
    /// End timestamp of the most recently stored match.
    pub latest_ended_at: Option<i64>,
}

/// Append-only, size-bounded log of finished matches (oldest evicted first).
#[derive(Debug, Clone)]
pub struct MatchHistory {
    matches: VecDeque<CompletedMatch>,
    capacity: usize,
}

impl Default for MatchHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl MatchHistory {
    /// Empty history keeping at most `capacity` matches (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            matches: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Rebuild a history from persisted records, keeping the newest ones.
    pub fn from_records(records: Vec<CompletedMatch>, capacity: usize) -> Self {
        let mut history = Self::with_capacity(capacity);
        for record in records {
            history.append(record);
        }
        history
    }

    /// Append a match, returning the evicted oldest match when over capacity.
    pub fn append(&mut self, record: CompletedMatch) -> Option<CompletedMatch> {
        self.matches.push_back(record);
        if self.matches.len() > self.capacity {
            self.matches.pop_front()
        } else {
            None
        }
    }

    /// Remove the match identified by its start timestamp.
    pub fn delete(&mut self, started_at: i64) -> Option<CompletedMatch> {
        let index = self
            .matches
            .iter()
            .position(|record| record.started_at == started_at)?;
        self.matches.remove(index)
    }

    /// Drop every stored match.
    pub fn clear(&mut self) {
        self.matches.clear();
    }

    /// Stored matches in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CompletedMatch> {
        self.matches.iter()
    }

    /// Number of stored matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether no match is stored.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matches that ended at or after `since` (unix ms), in insertion order.
    pub fn within(&self, since: i64) -> Vec<CompletedMatch> {
        self.matches
            .iter()
            .filter(|record| record.ended_at >= since)
            .cloned()
            .collect()
    }

    /// Group matches by local calendar day, newest day and newest match first.
    pub fn grouped_by_day(&self, offset: UtcOffset) -> Vec<DayGroup> {
        let mut groups: Vec<DayGroup> = Vec::new();
        for record in self.matches.iter().rev() {
            let date = local_date(record.ended_at, offset);
            match groups.iter_mut().find(|group| group.date == date) {
                Some(group) => group.matches.push(record.clone()),
                None => groups.push(DayGroup {
                    date,
                    matches: vec![record.clone()],
                }),
            }
        }
        groups.sort_by(|left, right| right.date.cmp(&left.date));
        groups
    }

    /// Totals over the whole stored window.
    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            total_games: self.matches.len(),
            side_a_wins: self.count_wins(Side::A),
            side_b_wins: self.count_wins(Side::B),
            latest_ended_at: self.matches.back().map(|record| record.ended_at),
        }
    }

    fn count_wins(&self, side: Side) -> usize {
        self.matches
            .iter()
            .filter(|record| record.winner == side)
            .count()
    }
}

/// Local calendar date of a unix millisecond timestamp.
pub fn local_date(timestamp_ms: i64, offset: UtcOffset) -> Date {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(timestamp_ms) * 1_000_000)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
        .to_offset(offset)
        .date()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const DAY_MS: i64 = 86_400_000;

    pub(crate) fn singles_match(a: &str, b: &str, score: (u8, u8), started_at: i64) -> CompletedMatch {
        let score = PerSide::new(score.0, score.1);
        CompletedMatch {
            mode: Mode::Singles,
            teams: PerSide::new(TeamLineup::solo(a), TeamLineup::solo(b)),
            score,
            winning_points: 21,
            started_at,
            ended_at: started_at + 600_000,
            winner: if score.a > score.b { Side::A } else { Side::B },
        }
    }

    pub(crate) fn doubles_match(
        a: (&str, &str),
        b: (&str, &str),
        score: (u8, u8),
        started_at: i64,
    ) -> CompletedMatch {
        let score = PerSide::new(score.0, score.1);
        CompletedMatch {
            mode: Mode::Doubles,
            teams: PerSide::new(TeamLineup::pair(a.0, a.1), TeamLineup::pair(b.0, b.1)),
            score,
            winning_points: 21,
            started_at,
            ended_at: started_at + 900_000,
            winner: if score.a > score.b { Side::A } else { Side::B },
        }
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut history = MatchHistory::default();
        for index in 0..150 {
            assert!(history.append(singles_match("A", "B", (21, 10), index)).is_none());
        }
        let evicted = history.append(singles_match("A", "B", (21, 10), 150));
        assert_eq!(evicted.map(|record| record.started_at), Some(0));
        assert_eq!(history.len(), 150);
        assert_eq!(history.iter().next().map(|record| record.started_at), Some(1));
    }

    #[test]
    fn delete_by_start_timestamp() {
        let mut history = MatchHistory::default();
        history.append(singles_match("A", "B", (21, 10), 10));
        history.append(singles_match("A", "B", (5, 21), 20));

        let removed = history.delete(10);
        assert_eq!(removed.map(|record| record.score.a), Some(21));
        assert!(history.delete(10).is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn groups_by_local_day_newest_first() {
        let mut history = MatchHistory::default();
        let day_one = 1_700_000_000_000 - 1_700_000_000_000 % DAY_MS;
        history.append(singles_match("A", "B", (21, 10), day_one + 1_000));
        history.append(singles_match("A", "B", (21, 12), day_one + 2_000));
        history.append(singles_match("A", "B", (21, 14), day_one + DAY_MS + 1_000));

        let groups = history.grouped_by_day(UtcOffset::UTC);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].matches.len(), 1);
        assert_eq!(groups[0].matches[0].score.b, 14);
        assert_eq!(groups[1].matches.len(), 2);
        assert_eq!(groups[1].matches[0].score.b, 12);
        assert!(groups[0].date > groups[1].date);
    }

    #[test]
    fn offset_moves_matches_across_midnight() {
        let midnight = 1_700_000_000_000 - 1_700_000_000_000 % DAY_MS;
        let mut history = MatchHistory::default();
        history.append(singles_match("A", "B", (21, 3), midnight - 1_200_000));
        let utc = history.grouped_by_day(UtcOffset::UTC);
        let plus_two = history.grouped_by_day(UtcOffset::from_hms(2, 0, 0).unwrap());
        assert_eq!((utc.len(), plus_two.len()), (1, 1));
        assert_eq!(plus_two[0].date, utc[0].date.next_day().unwrap());
    }

    #[test]
    fn summary_counts_wins_per_side() {
        let mut history = MatchHistory::default();
        assert_eq!(history.summary(), HistorySummary::default());

        history.append(singles_match("A", "B", (21, 10), 1));
        history.append(singles_match("A", "B", (19, 21), 2));
        history.append(singles_match("C", "D", (21, 0), 3));

        let summary = history.summary();
        assert_eq!(summary.total_games, 3);
        assert_eq!(summary.side_a_wins, 2);
        assert_eq!(summary.side_b_wins, 1);
        assert_eq!(summary.latest_ended_at, Some(3 + 600_000));
    }

    #[test]
    fn window_filters_on_end_time() {
        let mut history = MatchHistory::default();
        history.append(singles_match("A", "B", (21, 10), 0));
        history.append(singles_match("A", "B", (21, 10), DAY_MS));
        assert_eq!(history.within(DAY_MS).len(), 1);
        assert_eq!(history.within(0).len(), 2);
    }
}
