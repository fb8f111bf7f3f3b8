//! Scoreboard orchestrating the engine, the history store, the all-time
//! ledger and the announcement preferences.
//!
//! Commands never fail: a precondition failure comes back as a rejected
//! [`CommandOutcome`] carrying the status message to surface. Applied commands
//! report the events to broadcast and which persisted blobs became dirty.

use tracing::{debug, info};
use uuid::Uuid;

use crate::state::{
    engine::{PointOutcome, Rejection, ScoreEngine},
    game::{DEFAULT_WINNING_POINTS, Lineup, MatchState, PerSide, Side, TeamLineup},
    history::{CompletedMatch, MatchHistory},
    participant::ParticipantId,
    rules::SpecialScore,
    stats::AllTimeLedger,
};

/// Preferences restored at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardSettings {
    /// Players and serve setup.
    pub lineup: Lineup,
    /// Winning-points threshold.
    pub winning_points: u8,
    /// Whether special scores are announced.
    pub special_scores_enabled: bool,
}

impl Default for ScoreboardSettings {
    fn default() -> Self {
        Self {
            lineup: Lineup::default(),
            winning_points: DEFAULT_WINNING_POINTS,
            special_scores_enabled: true,
        }
    }
}

/// Something presentation layers react to.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreEvent {
    /// A rally was awarded.
    PointScored {
        match_id: Uuid,
        side: Side,
        score: PerSide<u8>,
        game_point: bool,
        call: String,
    },
    /// A score combination worth a bonus announcement was reached.
    SpecialScore { match_id: Uuid, kind: SpecialScore },
    /// The match was won.
    MatchWon {
        match_id: Uuid,
        winner: Side,
        winner_id: ParticipantId,
        score: PerSide<u8>,
    },
}

/// Persisted blobs touched by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Changes {
    /// Lineup, threshold or announcement preference changed.
    pub settings: bool,
    /// The history store changed.
    pub history: bool,
    /// The all-time ledger changed.
    pub ledger: bool,
}

impl Changes {
    /// Whether nothing needs to be written.
    pub fn is_empty(&self) -> bool {
        !(self.settings || self.history || self.ledger)
    }
}

/// Whether a command took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The command changed the scoreboard.
    Applied,
    /// A precondition failed; nothing changed.
    Rejected,
}

/// Result of a scoreboard command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    /// Applied or rejected.
    pub status: CommandStatus,
    /// Status line for the scorer.
    pub message: String,
    /// Events to broadcast, in emission order.
    pub events: Vec<ScoreEvent>,
    /// Blobs to persist.
    pub changes: Changes,
}

impl CommandOutcome {
    fn applied(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Applied,
            message: message.into(),
            events: Vec::new(),
            changes: Changes::default(),
        }
    }

    fn rejected(rejection: Rejection) -> Self {
        Self {
            status: CommandStatus::Rejected,
            message: rejection.to_string(),
            events: Vec::new(),
            changes: Changes::default(),
        }
    }

    fn settings_changed(mut self) -> Self {
        self.changes.settings = true;
        self
    }

    /// Whether the command took effect.
    pub fn is_applied(&self) -> bool {
        self.status == CommandStatus::Applied
    }
}

impl From<Result<CommandOutcome, Rejection>> for CommandOutcome {
    fn from(result: Result<CommandOutcome, Rejection>) -> Self {
        result.unwrap_or_else(CommandOutcome::rejected)
    }
}

/// The whole scorekeeping core behind a single owner.
#[derive(Debug)]
pub struct Scoreboard {
    engine: ScoreEngine,
    history: MatchHistory,
    ledger: AllTimeLedger,
    special_scores_enabled: bool,
    match_id: Uuid,
}

impl Scoreboard {
    /// Assemble a scoreboard from restored blobs.
    pub fn new(
        settings: ScoreboardSettings,
        history: MatchHistory,
        ledger: AllTimeLedger,
        undo_capacity: usize,
    ) -> Self {
        Self {
            engine: ScoreEngine::new(settings.lineup, settings.winning_points, undo_capacity),
            history,
            ledger,
            special_scores_enabled: settings.special_scores_enabled,
            match_id: Uuid::new_v4(),
        }
    }

    /// Live match state.
    pub fn state(&self) -> &MatchState {
        self.engine.state()
    }

    /// Engine queries.
    pub fn engine(&self) -> &ScoreEngine {
        &self.engine
    }

    /// Stored finished matches.
    pub fn history(&self) -> &MatchHistory {
        &self.history
    }

    /// Lifetime statistics.
    pub fn ledger(&self) -> &AllTimeLedger {
        &self.ledger
    }

    /// Identifier of the live match, renewed whenever a new match starts.
    pub fn match_id(&self) -> Uuid {
        self.match_id
    }

    /// Whether special scores are announced.
    pub fn special_scores_enabled(&self) -> bool {
        self.special_scores_enabled
    }

    /// Preferences to persist.
    pub fn settings(&self) -> ScoreboardSettings {
        let state = self.engine.state();
        ScoreboardSettings {
            lineup: state.lineup.clone(),
            winning_points: state.winning_points,
            special_scores_enabled: self.special_scores_enabled,
        }
    }

    /// Award a rally to `side`.
    pub fn score_point(&mut self, side: Side, now: i64) -> CommandOutcome {
        let result = self.engine.score_point(side, now).map(|outcome| {
            let PointOutcome {
                side,
                game_point,
                special,
                call,
                completed,
                ..
            } = outcome;

            let mut command = CommandOutcome::applied(call.clone());
            command.events.push(ScoreEvent::PointScored {
                match_id: self.match_id,
                side,
                score: self.engine.state().score,
                game_point,
                call,
            });
            if let Some(kind) = special.filter(|_| self.special_scores_enabled) {
                command.events.push(ScoreEvent::SpecialScore {
                    match_id: self.match_id,
                    kind,
                });
            }
            if let Some(completed) = completed {
                self.finish(completed, &mut command);
            }
            command
        });
        result.into()
    }

    /// Take a point back from `side`.
    pub fn remove_point(&mut self, side: Side) -> CommandOutcome {
        self.engine
            .remove_point(side)
            .map(|()| CommandOutcome::applied("point removed"))
            .into()
    }

    /// Revert the last command.
    pub fn undo(&mut self) -> CommandOutcome {
        let was_over = self.engine.is_over();
        let result = self.engine.undo().map(|()| {
            let mut command = CommandOutcome::applied("undone").settings_changed();
            if was_over && !self.engine.is_over() {
                self.withdraw_win(&mut command);
            }
            command
        });
        result.into()
    }

    /// Start the match over.
    pub fn reset(&mut self) -> CommandOutcome {
        self.engine.reset();
        self.match_id = Uuid::new_v4();
        CommandOutcome::applied("match reset")
    }

    /// Hand the serve to the other side.
    pub fn swap_serve(&mut self) -> CommandOutcome {
        self.engine
            .swap_serve()
            .map(|()| CommandOutcome::applied("serve swapped"))
            .into()
    }

    /// Exchange both sides of the scoreboard.
    pub fn swap_ends(&mut self) -> CommandOutcome {
        self.engine.swap_ends();
        CommandOutcome::applied("ends swapped").settings_changed()
    }

    /// Change the winning threshold; may finish a match in progress.
    pub fn set_winning_points(&mut self, points: u8, now: i64) -> CommandOutcome {
        let result = self.engine.set_winning_points(points, now).map(|completed| {
            let mut command =
                CommandOutcome::applied(format!("playing to {points}")).settings_changed();
            if let Some(completed) = completed {
                self.finish(completed, &mut command);
            }
            command
        });
        result.into()
    }

    /// Start a singles match between `a` and `b`.
    pub fn configure_singles(&mut self, a: &str, b: &str) -> CommandOutcome {
        self.configure(Lineup::singles(a, b))
    }

    /// Start a doubles match; each team's primary starts on the even court.
    pub fn configure_doubles(
        &mut self,
        a: TeamLineup,
        b: TeamLineup,
        first_server: Side,
    ) -> CommandOutcome {
        self.configure(Lineup::doubles(a, b, first_server))
    }

    /// Toggle special-score announcements.
    pub fn set_special_scores(&mut self, enabled: bool) -> CommandOutcome {
        self.special_scores_enabled = enabled;
        let message = if enabled {
            "special scores on"
        } else {
            "special scores off"
        };
        CommandOutcome::applied(message).settings_changed()
    }

    /// Delete a stored match and reverse its effect on the lifetime ledger.
    pub fn delete_match(&mut self, started_at: i64) -> Option<CompletedMatch> {
        let removed = self.history.delete(started_at)?;
        self.ledger.remove(&removed);
        info!(started_at, remaining = self.history.len(), "match deleted from history");
        Some(removed)
    }

    /// Forget every stored match; the lifetime ledger is kept.
    pub fn clear_history(&mut self) -> usize {
        let cleared = self.history.len();
        self.history.clear();
        info!(cleared, "history cleared");
        cleared
    }

    fn configure(&mut self, lineup: Lineup) -> CommandOutcome {
        self.engine.configure(lineup);
        self.match_id = Uuid::new_v4();
        CommandOutcome::applied("lineup updated").settings_changed()
    }

    fn finish(&mut self, completed: CompletedMatch, command: &mut CommandOutcome) {
        let winner_id = completed.winner_id();
        info!(
            match_id = %self.match_id,
            winner = %winner_id,
            score_a = completed.score.a,
            score_b = completed.score.b,
            "match won"
        );

        if let Some(previous) = self.history.delete(completed.started_at) {
            self.ledger.remove(&previous);
            debug!(started_at = previous.started_at, "replacing an earlier result of the same match");
        }
        self.ledger.record(&completed);
        if let Some(evicted) = self.history.append(completed.clone()) {
            debug!(started_at = evicted.started_at, "oldest match evicted from history");
        }

        command.message = format!("{winner_id} wins");
        command.events.push(ScoreEvent::MatchWon {
            match_id: self.match_id,
            winner: completed.winner,
            winner_id,
            score: completed.score,
        });
        command.changes.history = true;
        command.changes.ledger = true;
    }

    /// Take back the result of a match reopened by undo.
    fn withdraw_win(&mut self, command: &mut CommandOutcome) {
        let Some(started_at) = self.engine.state().started_at else {
            return;
        };
        let Some(withdrawn) = self.history.delete(started_at) else {
            return;
        };
        self.ledger.remove(&withdrawn);
        info!(
            match_id = %self.match_id,
            started_at,
            winner = %withdrawn.winner_id(),
            "win withdrawn by undo"
        );
        command.changes.history = true;
        command.changes.ledger = true;
    }
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new(
            ScoreboardSettings::default(),
            MatchHistory::default(),
            AllTimeLedger::default(),
            crate::state::undo::DEFAULT_UNDO_CAPACITY,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_match() -> Scoreboard {
        let mut board = Scoreboard::default();
        board.configure_singles("Alice", "Bob");
        board.set_winning_points(3, 0);
        board
    }

    fn win_for(board: &mut Scoreboard, side: Side, start: i64) -> CommandOutcome {
        let mut last = board.score_point(side, start);
        for offset in 1..3 {
            last = board.score_point(side, start + offset);
        }
        last
    }

    #[test]
    fn winning_point_records_history_and_ledger() {
        let mut board = short_match();
        let outcome = win_for(&mut board, Side::A, 100);

        assert!(outcome.is_applied());
        assert_eq!(outcome.message, "Alice wins");
        assert!(outcome.changes.history && outcome.changes.ledger);
        assert!(matches!(
            outcome.events.last(),
            Some(ScoreEvent::MatchWon { winner: Side::A, .. })
        ));

        assert_eq!(board.history().len(), 1);
        assert_eq!(board.ledger().total_games, 1);
        let alice = board.ledger().get(&ParticipantId::player("Alice")).unwrap();
        assert_eq!((alice.games_played, alice.wins), (1, 1));
    }

    #[test]
    fn rejections_carry_the_status_message() {
        let mut board = short_match();
        let outcome = board.remove_point(Side::A);
        assert_eq!(outcome.status, CommandStatus::Rejected);
        assert_eq!(outcome.message, "score cannot go below 0");
        assert!(outcome.changes.is_empty());

        assert_eq!(board.undo().message, "nothing to undo");

        win_for(&mut board, Side::B, 0);
        assert_eq!(board.score_point(Side::A, 10).message, "match is over");
    }

    #[test]
    fn special_scores_follow_the_preference() {
        let mut board = Scoreboard::default();
        for _ in 0..9 {
            board.score_point(Side::B, 0);
        }
        for _ in 0..5 {
            board.score_point(Side::A, 0);
        }
        let outcome = board.score_point(Side::A, 0);
        assert!(outcome.events.iter().any(|event| matches!(
            event,
            ScoreEvent::SpecialScore {
                kind: SpecialScore::SixtyNine,
                ..
            }
        )));

        board.undo();
        board.set_special_scores(false);
        let outcome = board.score_point(Side::A, 0);
        assert_eq!(outcome.events.len(), 1);
        assert!(matches!(
            outcome.events[0],
            ScoreEvent::PointScored { side: Side::A, .. }
        ));
    }

    #[test]
    fn delete_reverses_the_ledger() {
        let mut board = short_match();
        win_for(&mut board, Side::A, 1_000);
        board.reset();
        let before = board.ledger().clone();
        win_for(&mut board, Side::B, 2_000);
        assert_eq!(board.ledger().total_games, 2);

        let removed = board.delete_match(2_000).unwrap();
        assert_eq!(removed.winner, Side::B);
        assert_eq!(board.ledger().records, before.records);
        assert_eq!(board.ledger().total_games, before.total_games);
        assert!(board.delete_match(2_000).is_none());
    }

    #[test]
    fn clearing_history_keeps_the_ledger() {
        let mut board = short_match();
        win_for(&mut board, Side::A, 1);
        assert_eq!(board.clear_history(), 1);
        assert!(board.history().is_empty());
        assert_eq!(board.ledger().total_games, 1);
    }

    #[test]
    fn undoing_a_win_withdraws_the_record() {
        let mut board = short_match();
        win_for(&mut board, Side::A, 1);
        let outcome = board.undo();
        assert!(!board.state().over);
        assert!(outcome.changes.history && outcome.changes.ledger);
        assert!(board.history().is_empty());
        assert_eq!(board.ledger().total_games, 0);

        for offset in 0..4 {
            board.score_point(Side::B, 10 + offset);
        }
        assert!(board.state().over);
        assert_eq!(board.history().len(), 1);
        assert_eq!(board.history().iter().next().unwrap().winner, Side::B);
        assert_eq!(board.ledger().total_games, 1);
        let alice = board.ledger().get(&ParticipantId::player("Alice")).unwrap();
        assert_eq!((alice.games_played, alice.wins), (1, 0));
    }

    #[test]
    fn undoing_a_reset_after_a_win_keeps_the_score_closed() {
        let mut board = short_match();
        win_for(&mut board, Side::A, 1);
        board.reset();
        let outcome = board.undo();
        assert!(outcome.is_applied());
        assert!(board.state().over);
        assert_eq!(board.history().len(), 1);

        let outcome = board.score_point(Side::A, 50);
        assert_eq!(outcome.status, CommandStatus::Rejected);
        assert_eq!(board.state().score.a, 3);
        assert_eq!(board.history().len(), 1);
        assert_eq!(board.ledger().total_games, 1);
    }

    #[test]
    fn repeated_result_of_one_match_replaces_the_record() {
        let mut board = short_match();
        win_for(&mut board, Side::A, 1);
        let first = board.history().iter().next().unwrap().clone();
        let mut command = CommandOutcome::applied("replayed");
        board.finish(first, &mut command);
        assert_eq!(board.history().len(), 1);
        assert_eq!(board.ledger().total_games, 1);
        let alice = board.ledger().get(&ParticipantId::player("Alice")).unwrap();
        assert_eq!((alice.games_played, alice.wins), (1, 1));
    }

    #[test]
    fn new_match_gets_a_new_id() {
        let mut board = Scoreboard::default();
        let first = board.match_id();
        board.reset();
        assert_ne!(board.match_id(), first);

        let second = board.match_id();
        board.configure_doubles(
            TeamLineup::pair("Alice", "Bob"),
            TeamLineup::pair("Carol", "Dave"),
            Side::B,
        );
        assert_ne!(board.match_id(), second);
        assert_eq!(board.state().serving, Side::B);
        assert_eq!(board.settings().lineup.teams.b.label(), "Carol/Dave");
    }

    #[test]
    fn threshold_change_can_finish_the_match() {
        let mut board = Scoreboard::default();
        for _ in 0..8 {
            board.score_point(Side::B, 5);
        }
        let outcome = board.set_winning_points(7, 50);
        assert!(outcome.changes.settings && outcome.changes.history);
        assert_eq!(board.history().len(), 1);
        assert_eq!(board.history().iter().next().map(|m| m.ended_at), Some(50));
    }
}
