use std::fmt;

use crate::error::{LeaderboardError, Result};

pub const MAX_NAME_LEN: usize = 128;

/// A validated player name, the unique member identifier in the sorted set.
///
/// Names are taken verbatim (no trimming or case folding) since they are
/// compared byte-for-byte by the store.
///
/// # Examples
///
/// ```
/// use leaderboard::models::PlayerName;
///
/// let name = PlayerName::parse("alice").unwrap();
/// assert_eq!(name.as_str(), "alice");
///
/// assert!(PlayerName::parse("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(LeaderboardError::InvalidName(
                "name must not be empty".to_string(),
            ));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(LeaderboardError::InvalidName(format!(
                "name must be at most {} bytes",
                MAX_NAME_LEN
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(LeaderboardError::InvalidName(
                "name must not contain control characters".to_string(),
            ));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
