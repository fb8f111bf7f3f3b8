use tracing::info;

use crate::{
    dto::history::{ClearHistoryResponse, CompletedMatchView, DayGroupView, HistorySummaryView},
    error::ServiceError,
    services::sse_events,
    state::{SharedState, scoreboard::Changes},
};

/// Stored matches grouped by local calendar day, newest first.
pub async fn grouped_by_day(state: &SharedState) -> Vec<DayGroupView> {
    let board = state.scoreboard().await;
    board
        .history()
        .grouped_by_day(state.config().utc_offset)
        .iter()
        .map(DayGroupView::from)
        .collect()
}

/// Totals over the stored history.
pub async fn summary(state: &SharedState) -> HistorySummaryView {
    let board = state.scoreboard().await;
    board.history().summary().into()
}

/// Delete one match, identified by its start timestamp, and reverse its
/// contribution to the lifetime ledger.
pub async fn delete_match(
    state: &SharedState,
    started_at: i64,
) -> Result<CompletedMatchView, ServiceError> {
    let mut board = state.scoreboard().await;
    let removed = board
        .delete_match(started_at)
        .ok_or_else(|| ServiceError::NotFound(format!("no match started at {started_at}")))?;

    state.persistence().persist(
        &board,
        Changes {
            history: true,
            ledger: true,
            ..Changes::default()
        },
    );
    sse_events::broadcast_info(state.sse(), "history updated");
    Ok(CompletedMatchView::from(&removed))
}

/// Forget every stored match.
pub async fn clear(state: &SharedState) -> ClearHistoryResponse {
    let mut board = state.scoreboard().await;
    let cleared = board.clear_history();
    if cleared > 0 {
        state.persistence().persist(
            &board,
            Changes {
                history: true,
                ..Changes::default()
            },
        );
        sse_events::broadcast_info(state.sse(), "history cleared");
    } else {
        info!("history already empty");
    }
    ClearHistoryResponse { cleared }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        services::persistence::PersistenceHandle,
        state::{
            AppState, Scoreboard,
            history::{MatchHistory, tests::singles_match},
            scoreboard::ScoreboardSettings,
            stats::AllTimeLedger,
        },
    };

    fn state_with_matches() -> SharedState {
        let mut history = MatchHistory::default();
        let mut ledger = AllTimeLedger::default();
        for (started_at, score) in [(1_000, (21, 15)), (2_000, (12, 21))] {
            let record = singles_match("Alice", "Bob", score, started_at);
            ledger.record(&record);
            history.append(record);
        }
        let board = Scoreboard::new(ScoreboardSettings::default(), history, ledger, 50);
        let (handle, _rx) = PersistenceHandle::channel();
        AppState::new(AppConfig::default(), board, handle)
    }

    #[tokio::test]
    async fn delete_unknown_match_is_not_found() {
        let state = state_with_matches();
        assert!(matches!(
            delete_match(&state, 42).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(summary(&state).await.total_games, 2);
    }

    #[tokio::test]
    async fn delete_updates_summary_and_ledger() {
        let state = state_with_matches();
        let removed = delete_match(&state, 2_000).await.unwrap();
        assert_eq!(removed.score_b, 21);

        let summary = summary(&state).await;
        assert_eq!(summary.total_games, 1);
        assert_eq!(summary.side_a_wins, 1);
        assert_eq!(summary.side_b_wins, 0);
        assert_eq!(state.scoreboard().await.ledger().total_games, 1);
    }

    #[tokio::test]
    async fn clear_keeps_the_ledger() {
        let state = state_with_matches();
        assert_eq!(clear(&state).await.cleared, 2);
        assert!(grouped_by_day(&state).await.is_empty());
        assert_eq!(state.scoreboard().await.ledger().total_games, 2);
        assert_eq!(clear(&state).await.cleared, 0);
    }
}
