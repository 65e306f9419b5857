//! Typed IDs for players and tournaments.
//!
//! Player ids are caller-chosen strings and tournament ids are caller-chosen
//! integers. Wrapping them keeps a player id from being passed where a
//! backer list or a tournament id is expected.

use serde::{Deserialize, Serialize};

/// Unique identifier for a player account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a player ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique identifier for a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TournamentId(pub i64);

impl TournamentId {
    /// Returns the inner integer.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TournamentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TournamentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<i64> for TournamentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_player_id_display() {
        let id = PlayerId::new("Joe");
        assert_eq!(id.to_string(), "Joe");
        assert_eq!(id.as_str(), "Joe");
    }

    #[test]
    fn test_player_id_ordering_is_lexicographic() {
        let mut ids = vec![PlayerId::from("P2"), PlayerId::from("P10"), PlayerId::from("P1")];
        ids.sort();
        assert_eq!(ids, vec![PlayerId::from("P1"), PlayerId::from("P10"), PlayerId::from("P2")]);
    }

    #[test]
    fn test_player_id_serializes_transparently() {
        let json = serde_json::to_string(&PlayerId::new("P1")).unwrap();
        assert_eq!(json, "\"P1\"");
    }

    #[test]
    fn test_tournament_id_from_str() {
        assert_eq!(TournamentId::from_str("42").unwrap(), TournamentId(42));
        assert!(TournamentId::from_str("forty-two").is_err());
        assert!(TournamentId::from_str("").is_err());
    }

    #[test]
    fn test_tournament_id_display() {
        assert_eq!(TournamentId(100_500).to_string(), "100500");
    }
}
