//! DTO definitions for the live match: the scoreboard view and command payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        format_timestamp,
        validation::{validate_player_name, validate_winning_points},
    },
    state::{
        Scoreboard,
        game::{CourtPosition, Mode, Side, TeamLineup},
        scoreboard::{CommandOutcome, CommandStatus},
    },
};

/// One side of the scoreboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SideView {
    /// "Alice" or "Alice/Bob" in lineup order.
    pub label: String,
    pub players: Vec<String>,
    pub score: u8,
    /// Court of the side's first player.
    pub court: CourtPosition,
    /// Whether the next rally won by this side ends the match.
    pub game_point: bool,
}

/// Everything a scoreboard display needs about the live match.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MatchView {
    pub match_id: Uuid,
    pub mode: Mode,
    pub side_a: SideView,
    pub side_b: SideView,
    pub serving: Side,
    /// Player about to serve.
    pub server: String,
    /// Player about to receive.
    pub receiver: String,
    pub winning_points: u8,
    pub started: bool,
    pub over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    pub can_undo: bool,
    pub undo_depth: usize,
    pub special_scores_enabled: bool,
}

impl MatchView {
    /// Project the scoreboard.
    pub fn from_board(board: &Scoreboard) -> Self {
        let engine = board.engine();
        let state = engine.state();
        let side_view = |side: Side| {
            let team = &state.lineup.teams[side];
            SideView {
                label: team.label(),
                players: team.players(),
                score: state.score[side],
                court: state.courts[side],
                game_point: engine.is_game_point(side),
            }
        };

        Self {
            match_id: board.match_id(),
            mode: state.lineup.mode,
            side_a: side_view(Side::A),
            side_b: side_view(Side::B),
            serving: state.serving,
            server: state.server_name().to_string(),
            receiver: state.receiver_name().to_string(),
            winning_points: state.winning_points,
            started: state.started,
            over: state.over,
            started_at: state.started_at.map(format_timestamp),
            can_undo: engine.can_undo(),
            undo_depth: engine.undo_depth(),
            special_scores_enabled: board.special_scores_enabled(),
        }
    }
}

/// Whether a command took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatusDto {
    Applied,
    Rejected,
}

impl From<CommandStatus> for CommandStatusDto {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Applied => CommandStatusDto::Applied,
            CommandStatus::Rejected => CommandStatusDto::Rejected,
        }
    }
}

/// Result of a scoreboard command; rejections are reported here, not as HTTP errors.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommandResponse {
    pub status: CommandStatusDto,
    /// Status line to show to the scorer.
    pub message: String,
    #[serde(rename = "match")]
    pub match_view: MatchView,
}

impl CommandResponse {
    /// Pair an outcome with the scoreboard view after the command.
    pub fn new(outcome: &CommandOutcome, match_view: MatchView) -> Self {
        Self {
            status: outcome.status.into(),
            message: outcome.message.clone(),
            match_view,
        }
    }
}

/// Payload naming the side a point command applies to.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SideRequest {
    pub side: Side,
}

/// Payload selecting a new winning-points threshold.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct WinningPointsRequest {
    /// One of 3, 7, 11, 15 or 21.
    #[validate(custom(function = validate_winning_points))]
    pub points: u8,
}

/// Payload starting a singles match.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SinglesLineupRequest {
    #[validate(custom(function = validate_player_name))]
    pub side_a: String,
    #[validate(custom(function = validate_player_name))]
    pub side_b: String,
}

/// One doubles team and its starting court assignment.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DoublesTeamInput {
    /// Player starting on the even (right) service court.
    #[validate(custom(function = validate_player_name))]
    pub even_court: String,
    /// Player starting on the odd (left) service court.
    #[validate(custom(function = validate_player_name))]
    pub odd_court: String,
}

impl From<DoublesTeamInput> for TeamLineup {
    fn from(input: DoublesTeamInput) -> Self {
        TeamLineup::pair(input.even_court, input.odd_court)
    }
}

/// Payload starting a doubles match.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DoublesLineupRequest {
    #[validate(nested)]
    pub side_a: DoublesTeamInput,
    #[validate(nested)]
    pub side_b: DoublesTeamInput,
    /// Side serving the first rally.
    pub first_server: Side,
}

/// Payload toggling special-score announcements.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AnnouncementsRequest {
    pub special_scores_enabled: bool,
}
