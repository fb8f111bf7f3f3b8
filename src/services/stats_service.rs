use crate::{
    dto::stats::{StatsResponse, StatsWindow},
    state::{SharedState, now_ms, stats::WindowedStats},
};

const DAY_MS: i64 = 24 * 60 * 60 * 1_000;

/// Statistics for `window`, evaluated at the current time.
pub async fn stats(state: &SharedState, window: StatsWindow) -> StatsResponse {
    stats_at(state, window, now_ms()).await
}

async fn stats_at(state: &SharedState, window: StatsWindow, now: i64) -> StatsResponse {
    let board = state.scoreboard().await;
    match window {
        StatsWindow::All => {
            let history = board.history();
            let bounds = (
                history.iter().map(|record| record.ended_at).min(),
                history.iter().map(|record| record.ended_at).max(),
            );
            StatsResponse::new(
                window,
                history.len() as u64,
                bounds,
                WindowedStats::compute(history.iter()),
            )
        }
        StatsWindow::Last24Hours => {
            let recent = board.history().within(now - DAY_MS);
            let bounds = (
                recent.iter().map(|record| record.ended_at).min(),
                recent.iter().map(|record| record.ended_at).max(),
            );
            StatsResponse::new(
                window,
                recent.len() as u64,
                bounds,
                WindowedStats::compute(&recent),
            )
        }
        StatsWindow::AllTime => {
            let ledger = board.ledger();
            StatsResponse::new(
                window,
                ledger.total_games,
                (ledger.first_game_at, ledger.last_game_at),
                ledger.table(),
            )
        }
    }
}
