use std::time::Duration;

use thiserror::Error;

/// Errors raised when a score, timestamp or stored value does not fit the
/// fixed-width composite key.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("User score {0} is outside the representable range 0..=999999")]
    ScoreOutOfRange(i64),

    #[error("Timestamp {0} is outside the representable range 0..9999999999")]
    TimestampOutOfRange(i64),

    #[error("Composite key {0} does not fit the 16-digit key budget")]
    KeyOutOfRange(i64),

    #[error("Composite key {0} cannot be stored exactly as a double")]
    NotExactlyRepresentable(i64),

    #[error("Stored value {0} is not an integral composite key")]
    NotAnIntegerKey(f64),
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("Store unavailable during {operation}: {source}")]
    StoreUnavailable {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Store call {operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Player not found: {0}")]
    NotFound(String),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Concurrent updates to {name} kept conflicting after {attempts} attempts")]
    Conflict { name: String, attempts: u32 },

    #[error("Invalid player name: {0}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;

impl LeaderboardError {
    pub fn store(
        operation: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::StoreUnavailable {
            operation,
            source: Box::new(source),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LeaderboardError::NotFound(_))
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, LeaderboardError::Encoding(_))
    }
}
