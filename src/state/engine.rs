//! Score & serve engine: owns the live [`MatchState`] and its undo log.
//!
//! Every mutating command checkpoints the full state before touching it, so
//! [`ScoreEngine::undo`] restores scores, serve and doubles court positions
//! exactly. Precondition failures are returned as [`Rejection`] values and
//! leave the state untouched.

use thiserror::Error;

use crate::state::{
    game::{CourtPosition, Lineup, MatchState, Mode, PerSide, ServeRecord, Side, WINNING_POINTS_MENU},
    history::CompletedMatch,
    rules::{self, SpecialScore},
    undo::{GameStateSnapshot, UndoLog},
};

/// Reason a command was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Points cannot change once the match has been won.
    #[error("match is over")]
    MatchOver,
    /// The side has no point to take back.
    #[error("score cannot go below 0")]
    ScoreAtZero(Side),
    /// The undo log is empty.
    #[error("nothing to undo")]
    NothingToUndo,
    /// Threshold outside the supported menu.
    #[error("{0} is not an allowed winning-points value")]
    InvalidWinningPoints(u8),
}

/// What happened when a rally was awarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointOutcome {
    /// Side that won the rally.
    pub side: Side,
    /// Whether this point ended the match.
    pub match_over: bool,
    /// Whether the scorer is one rally away from winning.
    pub game_point: bool,
    /// Bonus announcement triggered by the new score.
    pub special: Option<SpecialScore>,
    /// Umpire call for the new score (scorer now serves).
    pub call: String,
    /// Record of the finished match when this point won it.
    pub completed: Option<CompletedMatch>,
}

/// Owner of the authoritative match state.
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    state: MatchState,
    undo: UndoLog,
}

impl ScoreEngine {
    /// Fresh engine for `lineup`, keeping up to `undo_capacity` snapshots.
    pub fn new(lineup: Lineup, winning_points: u8, undo_capacity: usize) -> Self {
        Self {
            state: MatchState::new(lineup, winning_points),
            undo: UndoLog::with_capacity(undo_capacity),
        }
    }

    /// Read-only view of the live state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Points of `side`.
    pub fn score(&self, side: Side) -> u8 {
        self.state.score[side]
    }

    /// Side currently serving.
    pub fn serving(&self) -> Side {
        self.state.serving
    }

    /// Whether the match has been won.
    pub fn is_over(&self) -> bool {
        self.state.over
    }

    /// Threshold in force.
    pub fn winning_points(&self) -> u8 {
        self.state.winning_points
    }

    /// Whether [`ScoreEngine::undo`] would do anything.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Number of stored snapshots.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Whether the next rally won by `side` would end the match.
    pub fn is_game_point(&self, side: Side) -> bool {
        !self.state.over
            && rules::would_next_point_win(self.state.score, side, self.state.winning_points)
    }

    /// Award a rally to `side` (rally-point scoring).
    ///
    /// The scorer keeps or takes the serve. In doubles a serving side that
    /// wins the rally swaps courts; a side that wins serve back keeps its
    /// positions and serves from the court matching its new score.
    pub fn score_point(&mut self, side: Side, now: i64) -> Result<PointOutcome, Rejection> {
        if self.is_decided() {
            return Err(Rejection::MatchOver);
        }
        self.checkpoint();

        let state = &mut self.state;
        if !state.started {
            state.started = true;
            state.started_at = Some(now);
        }
        state.serve_history.push(ServeRecord {
            serving: state.serving,
            courts: state.courts,
        });
        state.score[side] += 1;

        let winner = rules::check_win(state.score, state.winning_points);

        if state.serving == side {
            if state.lineup.mode == Mode::Doubles {
                state.courts[side] = state.courts[side].flipped();
            }
        } else {
            state.serving = side;
        }

        let completed = winner.map(|winner| {
            self.state.over = true;
            self.completed_match(winner, now)
        });

        let scorer = self.state.score[side];
        let other = self.state.score[side.opponent()];
        let match_over = completed.is_some();
        let game_point = self.is_game_point(side);
        let special = if match_over {
            None
        } else {
            rules::special_score(scorer, other)
        };

        Ok(PointOutcome {
            side,
            match_over,
            game_point,
            special,
            call: rules::score_call(scorer, other, game_point),
            completed,
        })
    }

    /// Take back a point from `side`, restoring the serve situation recorded
    /// before the most recent rally.
    pub fn remove_point(&mut self, side: Side) -> Result<(), Rejection> {
        if self.state.over {
            return Err(Rejection::MatchOver);
        }
        if self.state.score[side] == 0 {
            return Err(Rejection::ScoreAtZero(side));
        }
        self.checkpoint();

        let state = &mut self.state;
        state.score[side] -= 1;
        if let Some(record) = state.serve_history.pop() {
            state.serving = record.serving;
            state.courts = record.courts;
        }
        if state.score.a == 0 && state.score.b == 0 {
            state.started = false;
            state.started_at = None;
        }
        Ok(())
    }

    /// Restore the state captured before the last command, `over` flag included.
    ///
    /// Undoing the winning point reopens the match; undoing a reset that
    /// followed a win brings back the finished match, still closed.
    pub fn undo(&mut self) -> Result<(), Rejection> {
        let snapshot = self.undo.pop().ok_or(Rejection::NothingToUndo)?;
        self.state = snapshot.into_state();
        Ok(())
    }

    /// Start over with the configured lineup and serve setup.
    pub fn reset(&mut self) {
        if self.state.has_progress() {
            self.checkpoint();
        }
        self.state = MatchState::new(self.state.lineup.clone(), self.state.winning_points);
    }

    /// Hand the serve to the other side.
    ///
    /// In doubles both sides go back to their starting courts since a manual
    /// override cannot be reconciled with the rotation.
    pub fn swap_serve(&mut self) -> Result<(), Rejection> {
        if self.state.over {
            return Err(Rejection::MatchOver);
        }
        self.checkpoint();

        let state = &mut self.state;
        state.serving = state.serving.opponent();
        if state.lineup.mode == Mode::Doubles {
            state.courts = PerSide::splat(CourtPosition::Even);
        }
        Ok(())
    }

    /// Exchange sides A and B (players changing ends).
    pub fn swap_ends(&mut self) {
        self.checkpoint();
        self.state.swap_ends();
    }

    /// Change the winning threshold, re-evaluating a match in progress.
    ///
    /// Returns the finished match when the new threshold decides it.
    pub fn set_winning_points(
        &mut self,
        points: u8,
        now: i64,
    ) -> Result<Option<CompletedMatch>, Rejection> {
        if !WINNING_POINTS_MENU.contains(&points) {
            return Err(Rejection::InvalidWinningPoints(points));
        }
        if points == self.state.winning_points {
            return Ok(None);
        }

        let in_progress = self.state.in_progress();
        if in_progress {
            self.checkpoint();
        }
        self.state.winning_points = points;

        if !in_progress {
            return Ok(None);
        }
        Ok(
            rules::check_win(self.state.score, points).map(|winner| {
                self.state.over = true;
                self.completed_match(winner, now)
            }),
        )
    }

    /// Replace the lineup, starting a new match.
    pub fn configure(&mut self, lineup: Lineup) {
        if self.state.has_progress() {
            self.checkpoint();
        }
        self.state = MatchState::new(lineup, self.state.winning_points);
    }

    /// Whether the score on the board already decides the match.
    fn is_decided(&self) -> bool {
        self.state.over || rules::check_win(self.state.score, self.state.winning_points).is_some()
    }

    fn checkpoint(&mut self) {
        self.undo.push(GameStateSnapshot::capture(&self.state));
    }

    fn completed_match(&self, winner: Side, now: i64) -> CompletedMatch {
        CompletedMatch {
            mode: self.state.lineup.mode,
            teams: self.state.lineup.teams.clone(),
            score: self.state.score,
            winning_points: self.state.winning_points,
            started_at: self.state.started_at.unwrap_or(now),
            ended_at: now,
            winner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        game::{DEFAULT_WINNING_POINTS, TeamLineup},
        undo::DEFAULT_UNDO_CAPACITY,
    };

    fn singles() -> ScoreEngine {
        ScoreEngine::new(
            Lineup::singles("Alice", "Bob"),
            DEFAULT_WINNING_POINTS,
            DEFAULT_UNDO_CAPACITY,
        )
    }

    fn doubles() -> ScoreEngine {
        ScoreEngine::new(
            Lineup::doubles(
                TeamLineup::pair("Alice", "Bob"),
                TeamLineup::pair("Carol", "Dave"),
                Side::A,
            ),
            DEFAULT_WINNING_POINTS,
            DEFAULT_UNDO_CAPACITY,
        )
    }

    fn play(engine: &mut ScoreEngine, side: Side, rallies: usize) {
        for _ in 0..rallies {
            engine.score_point(side, 1_000).unwrap();
        }
    }

    #[test]
    fn server_keeps_serve_and_receiver_takes_it() {
        let mut engine = singles();
        assert_eq!(engine.serving(), Side::A);

        engine.score_point(Side::A, 1).unwrap();
        assert_eq!(engine.serving(), Side::A);

        engine.score_point(Side::B, 2).unwrap();
        assert_eq!(engine.serving(), Side::B);
        assert_eq!((engine.score(Side::A), engine.score(Side::B)), (1, 1));
    }

    #[test]
    fn doubles_rotation() {
        let mut engine = doubles();
        assert_eq!(engine.state().server_name(), "Alice");

        engine.score_point(Side::A, 1).unwrap();
        assert_eq!(engine.serving(), Side::A);
        assert_eq!(engine.state().courts.a, CourtPosition::Odd);
        assert_eq!(engine.state().server_name(), "Alice");
        assert_eq!(engine.state().receiver_name(), "Dave");

        engine.score_point(Side::B, 2).unwrap();
        assert_eq!(engine.serving(), Side::B);
        assert_eq!(engine.state().courts.b, CourtPosition::Even);
        assert_eq!(engine.state().courts.a, CourtPosition::Odd);
        // B's score is 1 (odd): the player on B's odd court serves.
        assert_eq!(engine.state().server_name(), "Dave");
        assert_eq!(engine.state().receiver_name(), "Alice");

        engine.score_point(Side::B, 3).unwrap();
        assert_eq!(engine.state().courts.b, CourtPosition::Odd);
        assert_eq!(engine.state().server_name(), "Dave");
        assert_eq!(engine.state().receiver_name(), "Bob");

        engine.score_point(Side::A, 4).unwrap();
        assert_eq!(engine.serving(), Side::A);
        assert_eq!(engine.state().courts.a, CourtPosition::Odd);
        assert_eq!(engine.state().courts.b, CourtPosition::Odd);
        // A at 2 (even): whoever stands on A's even court serves, which is Bob.
        assert_eq!(engine.state().server_name(), "Bob");
    }

    #[test]
    fn singles_courts_never_move() {
        let mut engine = singles();
        play(&mut engine, Side::A, 3);
        assert_eq!(engine.state().courts, PerSide::splat(CourtPosition::Even));
    }

    #[test]
    fn win_detection_and_record() {
        let mut engine = singles();
        play(&mut engine, Side::B, 19);
        play(&mut engine, Side::A, 19);
        let outcome = engine.score_point(Side::A, 5_000).unwrap();
        assert!(!outcome.match_over);
        assert!(outcome.game_point);

        let outcome = engine.score_point(Side::A, 9_000).unwrap();
        assert!(outcome.match_over);
        assert!(!outcome.game_point);
        let completed = outcome.completed.unwrap();
        assert_eq!(completed.winner, Side::A);
        assert_eq!(completed.score, PerSide::new(21, 19));
        assert_eq!(completed.started_at, 1_000);
        assert_eq!(completed.ended_at, 9_000);
        assert!(engine.is_over());

        assert_eq!(engine.score_point(Side::B, 1), Err(Rejection::MatchOver));
        assert_eq!(engine.remove_point(Side::A), Err(Rejection::MatchOver));
        assert_eq!(engine.swap_serve(), Err(Rejection::MatchOver));
    }

    #[test]
    fn thirty_point_cap() {
        let mut engine = singles();
        for _ in 0..29 {
            engine.score_point(Side::A, 1).unwrap();
            engine.score_point(Side::B, 1).unwrap();
        }
        assert!(!engine.is_over());
        assert!(engine.is_game_point(Side::A));
        let outcome = engine.score_point(Side::A, 2).unwrap();
        assert!(outcome.match_over);
        assert_eq!(engine.score(Side::A), 30);
    }

    #[test]
    fn undo_restores_every_rotating_field() {
        let mut engine = doubles();
        let mut seed: u32 = 7;
        for step in 0..120 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let side = if (seed >> 16) & 1 == 0 { Side::A } else { Side::B };
            let remove = (seed >> 8) % 4 == 0;

            let before = engine.state().clone();
            let result = if remove {
                engine.remove_point(side)
            } else {
                engine.score_point(side, step).map(|_| ())
            };
            if result.is_err() {
                assert_eq!(engine.state(), &before);
                engine.reset();
                continue;
            }

            let after = engine.state().clone();
            engine.undo().unwrap();
            assert_eq!(engine.state(), &before, "undo after step {step}");

            // Replay so the sequence keeps progressing.
            let replay = if remove {
                engine.remove_point(side)
            } else {
                engine.score_point(side, step).map(|_| ())
            };
            replay.unwrap();
            assert_eq!(engine.state(), &after);
        }
    }

    #[test]
    fn undoing_the_winning_point_reopens_the_match() {
        let mut engine = ScoreEngine::new(Lineup::singles("Alice", "Bob"), 3, 50);
        play(&mut engine, Side::A, 3);
        assert!(engine.is_over());

        engine.undo().unwrap();
        assert!(!engine.is_over());
        assert_eq!(engine.score(Side::A), 2);

        engine.undo().unwrap();
        engine.undo().unwrap();
        assert_eq!(engine.undo(), Err(Rejection::NothingToUndo));
    }

    #[test]
    fn undoing_a_reset_after_a_win_keeps_the_match_closed() {
        let mut engine = singles();
        for _ in 0..28 {
            engine.score_point(Side::A, 1).unwrap();
            engine.score_point(Side::B, 1).unwrap();
        }
        play(&mut engine, Side::A, 2);
        assert!(engine.is_over());
        assert_eq!(engine.score(Side::A), 30);

        engine.reset();
        engine.undo().unwrap();
        assert!(engine.is_over());
        assert_eq!(engine.score_point(Side::A, 2), Err(Rejection::MatchOver));
        assert_eq!(engine.score(Side::A), 30);
    }

    #[test]
    fn decided_score_refuses_points_even_when_not_flagged() {
        let mut engine = ScoreEngine::new(Lineup::singles("Alice", "Bob"), 3, 50);
        play(&mut engine, Side::B, 3);
        engine.state.over = false;
        assert_eq!(engine.score_point(Side::B, 2), Err(Rejection::MatchOver));
        assert_eq!(engine.score(Side::B), 3);
    }

    #[test]
    fn undo_log_is_bounded() {
        let mut engine = singles();
        for _ in 0..26 {
            engine.score_point(Side::A, 1).unwrap();
            engine.score_point(Side::B, 1).unwrap();
        }
        assert_eq!(engine.undo_depth(), 50);
        for _ in 0..50 {
            engine.undo().unwrap();
        }
        assert_eq!(engine.undo(), Err(Rejection::NothingToUndo));
        assert_eq!((engine.score(Side::A), engine.score(Side::B)), (1, 1));
    }

    #[test]
    fn remove_point_restores_serve_from_history() {
        let mut engine = doubles();
        engine.score_point(Side::A, 1).unwrap();
        engine.score_point(Side::B, 2).unwrap();
        assert_eq!(engine.serving(), Side::B);

        engine.remove_point(Side::B).unwrap();
        assert_eq!(engine.serving(), Side::A);
        assert_eq!(engine.state().courts.a, CourtPosition::Odd);

        engine.remove_point(Side::A).unwrap();
        assert_eq!(engine.state().courts.a, CourtPosition::Even);
        assert!(!engine.state().started);
        assert_eq!(engine.state().started_at, None);
        assert_eq!(engine.remove_point(Side::A), Err(Rejection::ScoreAtZero(Side::A)));
    }

    #[test]
    fn reset_reapplies_serve_setup() {
        let mut engine = ScoreEngine::new(
            Lineup::doubles(
                TeamLineup::pair("Alice", "Bob"),
                TeamLineup::pair("Carol", "Dave"),
                Side::B,
            ),
            21,
            50,
        );
        assert_eq!(engine.serving(), Side::B);
        assert_eq!(engine.state().server_name(), "Carol");
        play(&mut engine, Side::A, 3);

        engine.reset();
        assert_eq!(engine.serving(), Side::B);
        assert_eq!(engine.state().courts, PerSide::splat(CourtPosition::Even));
        assert!(!engine.state().started);
        assert!(engine.can_undo());

        engine.undo().unwrap();
        assert_eq!(engine.score(Side::A), 3);
    }

    #[test]
    fn reset_without_progress_is_not_undoable() {
        let mut engine = singles();
        engine.reset();
        assert!(!engine.can_undo());
    }

    #[test]
    fn swap_serve_resets_doubles_courts() {
        let mut engine = doubles();
        engine.score_point(Side::A, 1).unwrap();
        engine.swap_serve().unwrap();
        assert_eq!(engine.serving(), Side::B);
        assert_eq!(engine.state().courts, PerSide::splat(CourtPosition::Even));

        engine.undo().unwrap();
        assert_eq!(engine.serving(), Side::A);
        assert_eq!(engine.state().courts.a, CourtPosition::Odd);
    }

    #[test]
    fn winning_points_menu_and_reevaluation() {
        let mut engine = singles();
        assert_eq!(
            engine.set_winning_points(9, 0),
            Err(Rejection::InvalidWinningPoints(9))
        );

        play(&mut engine, Side::A, 12);
        play(&mut engine, Side::B, 5);
        let completed = engine.set_winning_points(11, 50).unwrap().unwrap();
        assert_eq!(completed.winner, Side::A);
        assert_eq!(completed.winning_points, 11);
        assert!(engine.is_over());

        engine.undo().unwrap();
        assert_eq!(engine.winning_points(), 21);
        assert!(!engine.is_over());
    }

    #[test]
    fn winning_points_before_start_is_not_undoable() {
        let mut engine = singles();
        assert_eq!(engine.set_winning_points(15, 0), Ok(None));
        assert_eq!(engine.winning_points(), 15);
        assert!(!engine.can_undo());
    }

    #[test]
    fn special_scores_only_while_playing() {
        let mut engine = singles();
        play(&mut engine, Side::B, 9);
        play(&mut engine, Side::A, 5);
        let outcome = engine.score_point(Side::A, 1).unwrap();
        assert_eq!(outcome.special, Some(SpecialScore::SixtyNine));
        assert_eq!(outcome.call, "6 serving 9");
    }

    #[test]
    fn swap_ends_is_undoable() {
        let mut engine = singles();
        play(&mut engine, Side::A, 2);
        engine.swap_ends();
        assert_eq!(engine.score(Side::B), 2);
        assert_eq!(engine.state().lineup.teams.b.primary, "Alice");
        assert_eq!(engine.serving(), Side::B);

        engine.undo().unwrap();
        assert_eq!(engine.score(Side::A), 2);
        assert_eq!(engine.state().lineup.teams.a.primary, "Alice");
    }

    #[test]
    fn configure_starts_a_new_match() {
        let mut engine = singles();
        play(&mut engine, Side::A, 4);
        engine.configure(Lineup::singles("Erin", "Frank"));
        assert_eq!(engine.score(Side::A), 0);
        assert_eq!(engine.state().lineup.teams.a.primary, "Erin");

        engine.undo().unwrap();
        assert_eq!(engine.state().lineup.teams.a.primary, "Alice");
        assert_eq!(engine.score(Side::A), 4);
    }
}
