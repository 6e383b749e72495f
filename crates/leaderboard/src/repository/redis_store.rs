use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

use super::{RankStore, ScoredMember};
use crate::error::{LeaderboardError, Result};
use crate::services::score_codec::{key_from_store_value, key_to_store_value};

pub const DEFAULT_LEADERBOARD_KEY: &str = "leaderboard";

// KEYS[1] = sorted set, ARGV[1] = member, ARGV[2] = expected key ("" = absent),
// ARGV[3] = new key
const COMPARE_AND_UPSERT: &str = r#"
local current = redis.call('ZSCORE', KEYS[1], ARGV[1])
if ARGV[2] == '' then
    if current then
        return 0
    end
elseif (not current) or tonumber(current) ~= tonumber(ARGV[2]) then
    return 0
end
redis.call('ZADD', KEYS[1], ARGV[3], ARGV[1])
return 1
"#;

/// Rank store backed by a Redis sorted set.
///
/// Holds a [`ConnectionManager`], a multiplexed connection that reconnects on
/// its own and is cheap to clone, so one store serves the whole process.
///
/// Sorted-set scores are doubles, so only keys up to 2^53 survive the round
/// trip. Scores above [`MAX_REDIS_USER_SCORE`] are rejected with
/// [`EncodingError::NotExactlyRepresentable`] even though the codec itself
/// accepts up to 999_999.
///
/// [`MAX_REDIS_USER_SCORE`]: crate::services::score_codec::MAX_REDIS_USER_SCORE
/// [`EncodingError::NotExactlyRepresentable`]: crate::error::EncodingError::NotExactlyRepresentable
pub struct RedisRankStore {
    conn: ConnectionManager,
    key: String,
    cas_script: Script,
}

impl RedisRankStore {
    pub async fn connect(redis_url: &str, key: impl Into<String>) -> Result<Self> {
        let client =
            redis::Client::open(redis_url).map_err(|e| LeaderboardError::store("CONNECT", e))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| LeaderboardError::store("CONNECT", e))?;

        Ok(Self::new(conn, key))
    }

    pub fn new(conn: ConnectionManager, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
            cas_script: Script::new(COMPARE_AND_UPSERT),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl RankStore for RedisRankStore {
    async fn get_score(&self, member: &str) -> Result<Option<i64>> {
        let mut conn = self.conn.clone();
        let value: Option<f64> = conn
            .zscore(&self.key, member)
            .await
            .map_err(|e| LeaderboardError::store("ZSCORE", e))?;

        tracing::debug!("ZSCORE {} {} -> {:?}", self.key, member, value);

        Ok(value.map(key_from_store_value).transpose()?)
    }

    async fn upsert(&self, member: &str, key: i64) -> Result<()> {
        let value = key_to_store_value(key)?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .zadd(&self.key, member, value)
            .await
            .map_err(|e| LeaderboardError::store("ZADD", e))?;

        tracing::debug!("ZADD {} {} {}", self.key, key, member);
        Ok(())
    }

    async fn compare_and_upsert(
        &self,
        member: &str,
        expected: Option<i64>,
        key: i64,
    ) -> Result<bool> {
        key_to_store_value(key)?;
        let expected = expected.map(|k| k.to_string()).unwrap_or_default();

        let mut conn = self.conn.clone();
        let written: i32 = self
            .cas_script
            .key(&self.key)
            .arg(member)
            .arg(&expected)
            .arg(key)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| LeaderboardError::store("EVALSHA compare_and_upsert", e))?;

        tracing::debug!(
            "compare_and_upsert {} {} expected={:?} -> {}",
            self.key,
            member,
            expected,
            written
        );

        Ok(written == 1)
    }

    async fn reverse_rank(&self, member: &str) -> Result<Option<u64>> {
        let mut conn = self.conn.clone();
        let rank: Option<u64> = conn
            .zrevrank(&self.key, member)
            .await
            .map_err(|e| LeaderboardError::store("ZREVRANK", e))?;

        Ok(rank)
    }

    async fn reverse_range_with_scores(&self, start: u64, stop: u64) -> Result<Vec<ScoredMember>> {
        if stop < start {
            return Ok(Vec::new());
        }

        // Negative indices count from the tail in Redis, so clamp instead of wrapping
        let start = isize::try_from(start).unwrap_or(isize::MAX);
        let stop = isize::try_from(stop).unwrap_or(isize::MAX);

        let mut conn = self.conn.clone();
        let rows: Vec<(String, f64)> = conn
            .zrevrange_withscores(&self.key, start, stop)
            .await
            .map_err(|e| LeaderboardError::store("ZREVRANGE", e))?;

        rows.into_iter()
            .map(|(member, value)| {
                Ok(ScoredMember {
                    member,
                    key: key_from_store_value(value)?,
                })
            })
            .collect()
    }

    async fn len(&self) -> Result<u64> {
        let mut conn = self.conn.clone();
        let count: u64 = conn
            .zcard(&self.key)
            .await
            .map_err(|e| LeaderboardError::store("ZCARD", e))?;

        Ok(count)
    }
}
