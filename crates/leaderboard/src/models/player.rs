use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A leaderboard entry as exposed to callers.
///
/// `rank` is 1-based and computed at query time, it is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Player {
    pub name: String,
    pub score: i64,
    pub rank: i64,
    /// Unix epoch seconds of the last score update
    pub updated_at: i64,
}
