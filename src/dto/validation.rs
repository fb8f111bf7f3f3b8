//! Validation helpers for DTOs.

use std::borrow::Borrow;

use validator::ValidationError;

use crate::state::game::WINNING_POINTS_MENU;

/// Longest accepted player name, after trimming.
pub const MAX_NAME_LENGTH: usize = 40;

/// Validates that a player name is not blank and fits on the scoreboard.
///
/// # Examples
///
/// ```ignore
/// validate_player_name("Alice")  // Ok
/// validate_player_name("   ")    // Err - blank
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("player_name_blank");
        err.message = Some("Player name must not be blank".into());
        return Err(err);
    }

    let length = trimmed.chars().count();
    if length > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!("Player name must be at most {MAX_NAME_LENGTH} characters (got {length})")
                .into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates that a winning-points threshold is one of the supported values.
pub fn validate_winning_points(points: impl Borrow<u8>) -> Result<(), ValidationError> {
    let points = points.borrow();
    if WINNING_POINTS_MENU.contains(points) {
        Ok(())
    } else {
        let mut err = ValidationError::new("winning_points");
        err.message = Some(
            format!("Winning points must be one of {WINNING_POINTS_MENU:?} (got {points})").into(),
        );
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_name() {
        assert!(validate_player_name("Alice").is_ok());
        assert!(validate_player_name("  Bob  ").is_ok());
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name(" \t ").is_err());
        assert!(validate_player_name(&"x".repeat(41)).is_err());
        assert!(validate_player_name(&format!("  {}  ", "x".repeat(40))).is_ok());
    }

    #[test]
    fn test_validate_winning_points() {
        for points in [3, 7, 11, 15, 21] {
            assert!(validate_winning_points(&points).is_ok());
        }
        assert!(validate_winning_points(&0).is_err());
        assert!(validate_winning_points(&9).is_err());
        assert!(validate_winning_points(&30).is_err());
    }
}
