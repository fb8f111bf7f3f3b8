use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::game::TeamLineup;

/// Canonical identity of whoever played on one side of a match.
///
/// Names are trimmed (case is preserved) and doubles pairs are stored sorted,
/// so the same two players map to the same identity whatever slot or order
/// they were recorded in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticipantId {
    /// A singles player.
    Player {
        /// Trimmed player name.
        name: String,
    },
    /// A doubles pair.
    Team {
        /// Lexicographically smaller member name.
        first: String,
        /// Lexicographically larger member name.
        second: String,
    },
}

impl ParticipantId {
    /// Identity of a singles player.
    pub fn player(name: &str) -> Self {
        ParticipantId::Player {
            name: normalize_name(name),
        }
    }

    /// Identity of a doubles pair, independent of member order.
    pub fn team(one: &str, other: &str) -> Self {
        let mut members = [normalize_name(one), normalize_name(other)];
        members.sort();
        let [first, second] = members;
        ParticipantId::Team { first, second }
    }

    /// Identity of the players fielded by `lineup`.
    pub fn from_lineup(lineup: &TeamLineup) -> Self {
        match &lineup.partner {
            Some(partner) => Self::team(&lineup.primary, partner),
            None => Self::player(&lineup.primary),
        }
    }

    /// Whether this identity is a doubles pair.
    pub fn is_team(&self) -> bool {
        matches!(self, ParticipantId::Team { .. })
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantId::Player { name } => f.write_str(name),
            ParticipantId::Team { first, second } => write!(f, "{first}/{second}"),
        }
    }
}

/// Key normalization applied at every insertion and lookup site.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_identity_is_order_independent() {
        assert_eq!(
            ParticipantId::team("Bob", "Alice"),
            ParticipantId::team("Alice", "Bob")
        );
        assert_eq!(ParticipantId::team(" Bob", "Alice ").to_string(), "Alice/Bob");
    }

    #[test]
    fn prefixes_do_not_collide() {
        assert_ne!(ParticipantId::player("Al"), ParticipantId::player("Alice"));
        assert_ne!(
            ParticipantId::team("Al", "Bo"),
            ParticipantId::team("Alice", "Bob")
        );
    }

    #[test]
    fn singles_and_doubles_never_share_identity() {
        let single = ParticipantId::player("Alice/Bob");
        let pair = ParticipantId::team("Alice", "Bob");
        assert_ne!(single, pair);
        assert!(!single.is_team());
        assert!(pair.is_team());
    }

    #[test]
    fn built_from_lineups() {
        assert_eq!(
            ParticipantId::from_lineup(&TeamLineup::pair("Zoe", "Adam")),
            ParticipantId::team("Adam", "Zoe")
        );
        assert_eq!(
            ParticipantId::from_lineup(&TeamLineup::solo("Zoe")),
            ParticipantId::player("Zoe")
        );
    }
}
