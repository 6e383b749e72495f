use async_trait::async_trait;

use crate::error::Result;

pub mod memory;
pub mod redis_store;

pub use memory::InMemoryRankStore;
pub use redis_store::RedisRankStore;

/// One row of a reverse range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredMember {
    pub member: String,
    pub key: i64,
}

/// Ordered-set store holding one composite key per member of a single
/// leaderboard collection.
///
/// Ranks are zero-based and counted from the highest key. Members with equal
/// keys are ordered by member name, descending (the Redis ZREVRANGE rule).
#[async_trait]
pub trait RankStore: Send + Sync {
    /// Current key of `member`, `None` when absent.
    async fn get_score(&self, member: &str) -> Result<Option<i64>>;

    /// Creates or replaces the key of `member`.
    async fn upsert(&self, member: &str, key: i64) -> Result<()>;

    /// Writes `key` only if the member's current key equals `expected`
    /// (`None` meaning the member must be absent). Returns whether the write
    /// happened.
    async fn compare_and_upsert(&self, member: &str, expected: Option<i64>, key: i64)
    -> Result<bool>;

    async fn reverse_rank(&self, member: &str) -> Result<Option<u64>>;

    /// Members between `start` and `stop` (inclusive, zero-based) in
    /// descending key order.
    async fn reverse_range_with_scores(&self, start: u64, stop: u64) -> Result<Vec<ScoredMember>>;

    /// Number of members in the collection.
    async fn len(&self) -> Result<u64>;
}
