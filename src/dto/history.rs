//! DTO definitions for the match history routes.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::format_timestamp,
    state::{
        game::{Mode, Side},
        history::{CompletedMatch, DayGroup, HistorySummary},
    },
};

/// A finished match as shown in the history list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompletedMatchView {
    /// Unix timestamp (ms) of the first rally; identifies the match.
    pub started_at: i64,
    /// Unix timestamp (ms) of the winning rally.
    pub ended_at: i64,
    /// RFC 3339 rendering of `ended_at`.
    pub ended_at_text: String,
    pub duration_ms: i64,
    pub mode: Mode,
    pub side_a: String,
    pub side_b: String,
    pub score_a: u8,
    pub score_b: u8,
    pub winning_points: u8,
    pub winner: Side,
    /// Canonical identity of the winner ("Alice" or "Alice/Bob", sorted).
    pub winner_id: String,
}

impl From<&CompletedMatch> for CompletedMatchView {
    fn from(record: &CompletedMatch) -> Self {
        Self {
            started_at: record.started_at,
            ended_at: record.ended_at,
            ended_at_text: format_timestamp(record.ended_at),
            duration_ms: record.duration_ms(),
            mode: record.mode,
            side_a: record.teams.a.label(),
            side_b: record.teams.b.label(),
            score_a: record.score.a,
            score_b: record.score.b,
            winning_points: record.winning_points,
            winner: record.winner,
            winner_id: record.winner_id().to_string(),
        }
    }
}

/// Matches finished on one local calendar day.
#[derive(Debug, Serialize, ToSchema)]
pub struct DayGroupView {
    /// `YYYY-MM-DD` in the configured local offset.
    pub date: String,
    pub matches: Vec<CompletedMatchView>,
}

impl From<&DayGroup> for DayGroupView {
    fn from(group: &DayGroup) -> Self {
        Self {
            date: format!(
                "{:04}-{:02}-{:02}",
                group.date.year(),
                u8::from(group.date.month()),
                group.date.day()
            ),
            matches: group.matches.iter().map(Into::into).collect(),
        }
    }
}

/// Totals over the stored history.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistorySummaryView {
    pub total_games: usize,
    pub side_a_wins: usize,
    pub side_b_wins: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_ended_at: Option<i64>,
}

impl From<HistorySummary> for HistorySummaryView {
    fn from(summary: HistorySummary) -> Self {
        Self {
            total_games: summary.total_games,
            side_a_wins: summary.side_a_wins,
            side_b_wins: summary.side_b_wins,
            latest_ended_at: summary.latest_ended_at,
        }
    }
}

/// Acknowledgement of a history clear.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClearHistoryResponse {
    /// Number of matches removed.
    pub cleared: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::history::{
        MatchHistory,
        tests::{DAY_MS, doubles_match},
    };
    use time::UtcOffset;

    #[test]
    fn day_groups_render_iso_dates() {
        let mut history = MatchHistory::default();
        history.append(doubles_match(("Bob", "Alice"), ("Carol", "Dave"), (21, 9), 19 * DAY_MS));

        let groups = history.grouped_by_day(UtcOffset::UTC);
        let view = DayGroupView::from(&groups[0]);
        assert_eq!(view.date, "1970-01-20");
        assert_eq!(view.matches[0].side_a, "Bob/Alice");
        assert_eq!(view.matches[0].winner_id, "Alice/Bob");
        assert_eq!(view.matches[0].duration_ms, 900_000);
    }
}
