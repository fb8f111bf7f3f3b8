//! Pure badminton scoring rules: win detection, game point lookahead and
//! the special-score predicates consumed by announcement layers.

use serde::Serialize;
use utoipa::ToSchema;

use crate::state::game::{MAX_POINTS, PerSide, Side};

/// Score combinations that trigger a bonus announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpecialScore {
    /// 6-9, 6-19, 16-9 or 16-19 (serving score first).
    SixtyNine,
    /// 9-11 or 11-9.
    NineEleven,
}

/// Return the winning side, if any, for the given score and threshold.
///
/// A side wins once it reaches `winning_points` with a two-point lead, or as
/// soon as it reaches [`MAX_POINTS`] whatever the margin.
pub fn check_win(score: PerSide<u8>, winning_points: u8) -> Option<Side> {
    let margin = score.a.abs_diff(score.b);
    [Side::A, Side::B].into_iter().find(|&side| {
        let points = score[side];
        points > score[side.opponent()]
            && ((points >= winning_points && margin >= 2) || points == MAX_POINTS)
    })
}

/// Whether the next rally won by `side` would end the match.
pub fn would_next_point_win(score: PerSide<u8>, side: Side, winning_points: u8) -> bool {
    if check_win(score, winning_points).is_some() || score[side] >= MAX_POINTS {
        return false;
    }
    let mut next = score;
    next[side] += 1;
    check_win(next, winning_points) == Some(side)
}

/// Special score announced for `serving`-`receiving`, if any.
pub fn special_score(serving: u8, receiving: u8) -> Option<SpecialScore> {
    match (serving, receiving) {
        (6 | 16, 9 | 19) => Some(SpecialScore::SixtyNine),
        (9, 11) | (11, 9) => Some(SpecialScore::NineEleven),
        _ => None,
    }
}

/// Umpire call for the current score, server's points first.
pub fn score_call(serving: u8, receiving: u8, game_point: bool) -> String {
    if game_point {
        format!("Game point, {serving} serving {receiving}")
    } else {
        format!("{serving} serving {receiving}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(a: u8, b: u8) -> PerSide<u8> {
        PerSide::new(a, b)
    }

    #[test]
    fn regulation_wins_need_two_point_margin() {
        assert_eq!(check_win(score(21, 19), 21), Some(Side::A));
        assert_eq!(check_win(score(21, 20), 21), None);
        assert_eq!(check_win(score(20, 22), 21), Some(Side::B));
        assert_eq!(check_win(score(22, 20), 21), Some(Side::A));
        assert_eq!(check_win(score(20, 18), 21), None);
    }

    #[test]
    fn thirty_points_wins_without_margin() {
        assert_eq!(check_win(score(29, 29), 21), None);
        assert_eq!(check_win(score(30, 29), 21), Some(Side::A));
        assert_eq!(check_win(score(29, 30), 21), Some(Side::B));
    }

    #[test]
    fn short_games_use_the_same_rules() {
        assert_eq!(check_win(score(3, 1), 3), Some(Side::A));
        assert_eq!(check_win(score(3, 2), 3), None);
        assert_eq!(check_win(score(5, 3), 3), Some(Side::A));
        assert_eq!(check_win(score(0, 0), 3), None);
    }

    #[test]
    fn game_point_lookahead() {
        assert!(would_next_point_win(score(20, 10), Side::A, 21));
        assert!(!would_next_point_win(score(20, 10), Side::B, 21));
        assert!(!would_next_point_win(score(20, 20), Side::A, 21));
        assert!(would_next_point_win(score(21, 20), Side::A, 21));
        assert!(would_next_point_win(score(29, 29), Side::B, 21));
        assert!(!would_next_point_win(score(21, 19), Side::A, 21));
    }

    #[test]
    fn special_scores() {
        assert_eq!(special_score(6, 9), Some(SpecialScore::SixtyNine));
        assert_eq!(special_score(16, 19), Some(SpecialScore::SixtyNine));
        assert_eq!(special_score(9, 6), None);
        assert_eq!(special_score(9, 11), Some(SpecialScore::NineEleven));
        assert_eq!(special_score(11, 9), Some(SpecialScore::NineEleven));
        assert_eq!(special_score(10, 10), None);
    }

    #[test]
    fn calls() {
        assert_eq!(score_call(5, 3, false), "5 serving 3");
        assert_eq!(score_call(20, 18, true), "Game point, 20 serving 18");
    }
}
