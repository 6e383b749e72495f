use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RankStore, ScoredMember};
use crate::error::Result;

type OrderKey = (Reverse<i64>, Reverse<String>);

#[derive(Debug, Default)]
struct Entries {
    by_member: HashMap<String, i64>,
    ordered: BTreeSet<OrderKey>,
}

impl Entries {
    fn insert(&mut self, member: &str, key: i64) {
        if let Some(previous) = self.by_member.insert(member.to_string(), key) {
            self.ordered
                .remove(&(Reverse(previous), Reverse(member.to_string())));
        }
        self.ordered.insert((Reverse(key), Reverse(member.to_string())));
    }
}

/// Process-local rank store with the same ordering rules as the Redis one.
#[derive(Debug, Default)]
pub struct InMemoryRankStore {
    entries: RwLock<Entries>,
}

impl InMemoryRankStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RankStore for InMemoryRankStore {
    async fn get_score(&self, member: &str) -> Result<Option<i64>> {
        Ok(self.entries.read().await.by_member.get(member).copied())
    }

    async fn upsert(&self, member: &str, key: i64) -> Result<()> {
        self.entries.write().await.insert(member, key);
        Ok(())
    }

    async fn compare_and_upsert(
        &self,
        member: &str,
        expected: Option<i64>,
        key: i64,
    ) -> Result<bool> {
        let mut entries = self.entries.write().await;
        if entries.by_member.get(member).copied() != expected {
            return Ok(false);
        }
        entries.insert(member, key);
        Ok(true)
    }

    async fn reverse_rank(&self, member: &str) -> Result<Option<u64>> {
        let entries = self.entries.read().await;
        let Some(&key) = entries.by_member.get(member) else {
            return Ok(None);
        };

        let position = (Reverse(key), Reverse(member.to_string()));
        Ok(Some(entries.ordered.range(..position).count() as u64))
    }

    async fn reverse_range_with_scores(&self, start: u64, stop: u64) -> Result<Vec<ScoredMember>> {
        if stop < start {
            return Ok(Vec::new());
        }

        let skip = usize::try_from(start).unwrap_or(usize::MAX);
        let count = usize::try_from(stop.saturating_sub(start).saturating_add(1))
            .unwrap_or(usize::MAX);

        let entries = self.entries.read().await;
        let members = entries
            .ordered
            .iter()
            .skip(skip)
            .take(count)
            .map(|(Reverse(key), Reverse(member))| ScoredMember {
                member: member.clone(),
                key: *key,
            })
            .collect();

        Ok(members)
    }

    async fn len(&self) -> Result<u64> {
        Ok(self.entries.read().await.by_member.len() as u64)
    }
}
