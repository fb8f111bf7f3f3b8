use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Hard cap on a game's length: reaching it wins regardless of the margin.
pub const MAX_POINTS: u8 = 30;

/// Winning-point thresholds offered to the scorer.
pub const WINNING_POINTS_MENU: [u8; 5] = [3, 7, 11, 15, 21];

/// Default winning-point threshold of a regulation game.
pub const DEFAULT_WINNING_POINTS: u8 = 21;

/// One of the two ends of the court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Left-hand side of the scoreboard (first player/team slot).
    A,
    /// Right-hand side of the scoreboard (second player/team slot).
    B,
}

impl Side {
    /// The other side of the net.
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Singles or doubles play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One player per side.
    Singles,
    /// Two players per side, with court rotation.
    Doubles,
}

/// Service court half (right/even or left/odd).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CourtPosition {
    /// Right service court, used when the serving score is even.
    Even,
    /// Left service court, used when the serving score is odd.
    Odd,
}

impl CourtPosition {
    /// Court matching the parity of `score`.
    pub fn for_score(score: u8) -> CourtPosition {
        if score % 2 == 0 {
            CourtPosition::Even
        } else {
            CourtPosition::Odd
        }
    }

    /// The other half of the court.
    pub fn flipped(self) -> CourtPosition {
        match self {
            CourtPosition::Even => CourtPosition::Odd,
            CourtPosition::Odd => CourtPosition::Even,
        }
    }
}

/// A pair of values, one per side, indexable by [`Side`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerSide<T> {
    /// Value for side A.
    pub a: T,
    /// Value for side B.
    pub b: T,
}

impl<T> PerSide<T> {
    /// Build a pair from both values.
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    /// Swap the values of both sides.
    pub fn swapped(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }
}

impl<T: Clone> PerSide<T> {
    /// Same value on both sides.
    pub fn splat(value: T) -> Self {
        Self {
            a: value.clone(),
            b: value,
        }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }
}

/// Players fielded by one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamLineup {
    /// Player starting on the even court; the only player in singles.
    pub primary: String,
    /// Second player in doubles.
    pub partner: Option<String>,
}

impl TeamLineup {
    /// Single-player lineup.
    pub fn solo(name: impl Into<String>) -> Self {
        Self {
            primary: name.into().trim().to_string(),
            partner: None,
        }
    }

    /// Two-player lineup with `primary` starting on the even court.
    pub fn pair(primary: impl Into<String>, partner: impl Into<String>) -> Self {
        Self {
            primary: primary.into().trim().to_string(),
            partner: Some(partner.into().trim().to_string()),
        }
    }

    /// Name of the player standing on `court` when the primary occupies `primary_court`.
    pub fn player_on(&self, court: CourtPosition, primary_court: CourtPosition) -> &str {
        match &self.partner {
            Some(partner) if court != primary_court => partner,
            _ => &self.primary,
        }
    }

    /// Every player of the side, primary first.
    pub fn players(&self) -> Vec<String> {
        let mut players = vec![self.primary.clone()];
        players.extend(self.partner.clone());
        players
    }

    /// Human readable label ("Alice" or "Alice/Bob" in lineup order).
    pub fn label(&self) -> String {
        self.players().join("/")
    }
}

/// Who plays on which side and who serves first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineup {
    /// Singles or doubles.
    pub mode: Mode,
    /// Both sides' players.
    pub teams: PerSide<TeamLineup>,
    /// Side serving the first rally after a reset.
    pub first_server: Side,
}

impl Lineup {
    /// Singles lineup where side A serves first.
    pub fn singles(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            mode: Mode::Singles,
            teams: PerSide::new(TeamLineup::solo(a), TeamLineup::solo(b)),
            first_server: Side::A,
        }
    }

    /// Doubles lineup; each team's first player starts on the even court.
    pub fn doubles(a: TeamLineup, b: TeamLineup, first_server: Side) -> Self {
        Self {
            mode: Mode::Doubles,
            teams: PerSide::new(a, b),
            first_server,
        }
    }

    /// Lineup with both sides exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            mode: self.mode,
            teams: self.teams.clone().swapped(),
            first_server: self.first_server.opponent(),
        }
    }
}

impl Default for Lineup {
    fn default() -> Self {
        Self::singles("Player 1", "Player 2")
    }
}

/// Serve situation captured before a rally, used to take a point back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServeRecord {
    /// Side that served the rally.
    pub serving: Side,
    /// Court of each side's primary player before the rally.
    pub courts: PerSide<CourtPosition>,
}

impl ServeRecord {
    fn swapped(self) -> Self {
        Self {
            serving: self.serving.opponent(),
            courts: self.courts.swapped(),
        }
    }
}

/// Authoritative state of the live match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    /// Players on each side.
    pub lineup: Lineup,
    /// Points won by each side.
    pub score: PerSide<u8>,
    /// Side currently serving.
    pub serving: Side,
    /// Court occupied by each side's primary player (doubles only).
    pub courts: PerSide<CourtPosition>,
    /// Threshold a side must reach (with a two-point margin) to win.
    pub winning_points: u8,
    /// Whether at least one rally has been played.
    pub started: bool,
    /// Whether the match has been won.
    pub over: bool,
    /// Unix timestamp (ms) of the first rally.
    pub started_at: Option<i64>,
    /// Serve situation before each point currently on the board.
    pub serve_history: Vec<ServeRecord>,
}

impl MatchState {
    /// Fresh match for `lineup`.
    pub fn new(lineup: Lineup, winning_points: u8) -> Self {
        let serving = lineup.first_server;
        Self {
            lineup,
            score: PerSide::default(),
            serving,
            courts: PerSide::splat(CourtPosition::Even),
            winning_points,
            started: false,
            over: false,
            started_at: None,
            serve_history: Vec::new(),
        }
    }

    /// Whether anything would be lost by a reset.
    pub fn has_progress(&self) -> bool {
        self.started || self.score.a > 0 || self.score.b > 0
    }

    /// Whether rallies are being played and nobody has won yet.
    pub fn in_progress(&self) -> bool {
        self.started && !self.over
    }

    /// Side currently receiving.
    pub fn receiving(&self) -> Side {
        self.serving.opponent()
    }

    /// Name of the player about to serve.
    pub fn server_name(&self) -> &str {
        let side = self.serving;
        let court = CourtPosition::for_score(self.score[side]);
        self.lineup.teams[side].player_on(court, self.courts[side])
    }

    /// Name of the player about to receive, diagonally opposite the server.
    pub fn receiver_name(&self) -> &str {
        let side = self.receiving();
        let court = CourtPosition::for_score(self.score[self.serving]);
        self.lineup.teams[side].player_on(court, self.courts[side])
    }

    /// Exchange both sides, keeping every rally-derived fact consistent.
    pub fn swap_ends(&mut self) {
        self.lineup = self.lineup.swapped();
        self.score = self.score.swapped();
        self.courts = self.courts.swapped();
        self.serving = self.serving.opponent();
        for record in &mut self.serve_history {
            *record = record.swapped();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_side_indexing() {
        let mut pair = PerSide::new(1, 2);
        pair[Side::B] += 5;
        assert_eq!(pair[Side::A], 1);
        assert_eq!(pair[Side::B], 7);
        assert_eq!(pair.swapped(), PerSide::new(7, 1));
    }

    #[test]
    fn lineup_names_are_trimmed() {
        let lineup = Lineup::singles("  Alice ", "Bob\t");
        assert_eq!(lineup.teams.a.primary, "Alice");
        assert_eq!(lineup.teams.b.primary, "Bob");
    }

    #[test]
    fn singles_player_is_always_on_court() {
        let team = TeamLineup::solo("Alice");
        assert_eq!(team.player_on(CourtPosition::Odd, CourtPosition::Even), "Alice");
        assert_eq!(team.player_on(CourtPosition::Even, CourtPosition::Even), "Alice");
    }

    #[test]
    fn doubles_server_and_receiver_follow_parity() {
        let lineup = Lineup::doubles(
            TeamLineup::pair("Alice", "Bob"),
            TeamLineup::pair("Carol", "Dave"),
            Side::A,
        );
        let mut state = MatchState::new(lineup, DEFAULT_WINNING_POINTS);
        assert_eq!(state.server_name(), "Alice");
        assert_eq!(state.receiver_name(), "Carol");

        state.score.a = 1;
        state.courts.a = CourtPosition::Odd;
        assert_eq!(state.server_name(), "Alice");
        assert_eq!(state.receiver_name(), "Dave");
    }

    #[test]
    fn swap_ends_mirrors_everything() {
        let mut state = MatchState::new(Lineup::singles("Alice", "Bob"), 21);
        state.score = PerSide::new(3, 1);
        state.serve_history.push(ServeRecord {
            serving: Side::A,
            courts: PerSide::new(CourtPosition::Odd, CourtPosition::Even),
        });
        state.swap_ends();

        assert_eq!(state.lineup.teams.a.primary, "Bob");
        assert_eq!(state.score, PerSide::new(1, 3));
        assert_eq!(state.serving, Side::B);
        assert_eq!(state.serve_history[0].serving, Side::B);
        assert_eq!(state.serve_history[0].courts.b, CourtPosition::Odd);
    }
}
