use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::error::{LeaderboardError, Result};
use crate::models::{Player, PlayerName};
use crate::repository::{RankStore, ScoredMember};
use crate::services::score_codec::{decode, encode};

#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Read-modify-write attempts per update before giving up with
    /// [`LeaderboardError::Conflict`]. Values below 1 are treated as 1.
    pub max_update_attempts: u32,
    /// Deadline applied to every individual store call.
    pub call_timeout: Option<Duration>,
    /// Neighbourhood size used when a caller does not pick one.
    pub default_window: u32,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            max_update_attempts: 5,
            call_timeout: None,
            default_window: 10,
        }
    }
}

/// Score accumulation and rank queries over a [`RankStore`].
///
/// Stateless apart from its shared handles; clone it freely across tasks.
#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn RankStore>,
    clock: Arc<dyn Clock>,
    options: ServiceOptions,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn RankStore>, options: ServiceOptions) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), options)
    }

    pub fn with_clock(
        store: Arc<dyn RankStore>,
        clock: Arc<dyn Clock>,
        options: ServiceOptions,
    ) -> Self {
        Self {
            store,
            clock,
            options,
        }
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    /// Adds `delta` to the player's accumulated score and refreshes the
    /// update timestamp. Returns the new score.
    ///
    /// The write only lands if the stored key is still the one that was read,
    /// otherwise the whole read-modify-write is retried. Negative deltas are
    /// accepted as long as the resulting score stays encodable.
    pub async fn update_score(&self, delta: i64, name: &str) -> Result<i64> {
        let name = PlayerName::parse(name)?;
        let attempts = self.options.max_update_attempts.max(1);

        for attempt in 1..=attempts {
            let current = self
                .call("get_score", self.store.get_score(name.as_str()))
                .await?;

            let existing = match current {
                Some(key) => decode(key)?.0,
                None => 0,
            };
            let new_score = existing.saturating_add(delta);
            let key = encode(new_score, self.clock.now())?;

            let written = self
                .call(
                    "compare_and_upsert",
                    self.store.compare_and_upsert(name.as_str(), current, key),
                )
                .await?;

            if written {
                tracing::info!("Score of {} updated: {} -> {}", name, existing, new_score);
                return Ok(new_score);
            }

            tracing::debug!(
                "Concurrent update on {} (attempt {}/{}), retrying",
                name,
                attempt,
                attempts
            );
        }

        tracing::warn!("Giving up on {} after {} conflicting attempts", name, attempts);
        Err(LeaderboardError::Conflict {
            name: name.into_inner(),
            attempts,
        })
    }

    /// Overwrites the player's score with an absolute value.
    pub async fn set_score(&self, name: &str, score: i64) -> Result<()> {
        let name = PlayerName::parse(name)?;
        let key = encode(score, self.clock.now())?;

        self.call("upsert", self.store.upsert(name.as_str(), key)).await?;

        tracing::info!("Score of {} set to {}", name, score);
        Ok(())
    }

    /// 1-based rank of the player, highest score first.
    pub async fn get_user_rank(&self, name: &str) -> Result<i64> {
        let name = PlayerName::parse(name)?;
        let rank = self.reverse_rank(&name).await?;
        Ok(rank as i64 + 1)
    }

    /// The player together with up to `window` players on each side.
    pub async fn get_user_rank_and_top_players(
        &self,
        name: &str,
        window: u32,
    ) -> Result<Vec<Player>> {
        let name = PlayerName::parse(name)?;
        let my_rank = self.reverse_rank(&name).await?;

        let window = u64::from(window);
        let start = my_rank.saturating_sub(window);
        let stop = my_rank + window;

        let rows = self
            .call(
                "reverse_range_with_scores",
                self.store.reverse_range_with_scores(start, stop),
            )
            .await?;

        to_players(start, rows)
    }

    pub async fn get_player(&self, name: &str) -> Result<Player> {
        let name = PlayerName::parse(name)?;

        let key = self
            .call("get_score", self.store.get_score(name.as_str()))
            .await?
            .ok_or_else(|| LeaderboardError::NotFound(name.to_string()))?;
        let rank = self.reverse_rank(&name).await?;
        let (score, updated_at) = decode(key)?;

        Ok(Player {
            name: name.into_inner(),
            score,
            rank: rank as i64 + 1,
            updated_at,
        })
    }

    pub async fn top_players(&self, limit: u32) -> Result<Vec<Player>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let rows = self
            .call(
                "reverse_range_with_scores",
                self.store.reverse_range_with_scores(0, u64::from(limit) - 1),
            )
            .await?;

        to_players(0, rows)
    }

    /// Number of ranked players.
    pub async fn size(&self) -> Result<u64> {
        self.call("len", self.store.len()).await
    }

    async fn reverse_rank(&self, name: &PlayerName) -> Result<u64> {
        self.call("reverse_rank", self.store.reverse_rank(name.as_str()))
            .await?
            .ok_or_else(|| LeaderboardError::NotFound(name.to_string()))
    }

    async fn call<T, F>(&self, operation: &'static str, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.options.call_timeout {
            Some(timeout) => tokio::time::timeout(timeout, future)
                .await
                .map_err(|_| LeaderboardError::Timeout { operation, timeout })?,
            None => future.await,
        }
    }
}

fn to_players(start: u64, rows: Vec<ScoredMember>) -> Result<Vec<Player>> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let (score, updated_at) = decode(row.key)?;
            Ok(Player {
                name: row.member,
                score,
                rank: (start + i as u64) as i64 + 1,
                updated_at,
            })
        })
        .collect()
}
