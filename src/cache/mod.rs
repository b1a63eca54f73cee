// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Response cache in front of the upstream + mapper + store pipeline.
//!
//! Entries are JSON blobs keyed `"{entity_id}:{operation}"` and expire at
//! the end of the local day unless a TTL is given.

pub mod memory;
pub mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, Result};
use crate::time_utils::ttl_until_end_of_day;

pub use self::memory::MemoryCache;
pub use self::redis::RedisCache;

/// String key-value store with per-key TTL.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Value for `key`, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Keys matching a glob pattern (`*` wildcard).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    async fn flush_all(&self) -> Result<()>;
}

/// Cache operation names.
pub mod ops {
    pub const LEAGUES: &str = "getleagues";
    pub const LEAGUE: &str = "getleague";
    pub const LEAGUE_SETTINGS: &str = "getleaguesettings";
    pub const WEEKLY_STATS: &str = "getweeklystats";
    pub const PLAYER_STATS: &str = "getplayerstats";
    pub const TEAM_ROSTER: &str = "getteamroster";
    pub const LEAGUE_PLAYER_POINTS: &str = "getleagueplayerpoints";
}

/// Typed read-through cache over a [`CacheStore`].
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    zone: Tz,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, zone: Tz) -> Self {
        Self { store, zone }
    }

    pub fn key(entity_id: &str, operation: &str) -> String {
        format!("{}:{}", entity_id, operation)
    }

    /// Cached value, or `None` on a miss. An undecodable entry counts as a miss.
    pub async fn get<T: DeserializeOwned>(&self, entity_id: &str, operation: &str) -> Result<Option<T>> {
        let key = Self::key(entity_id, operation);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(Some(value))
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                Ok(None)
            }
        }
    }

    /// Store until the end of the local day.
    pub async fn set<T: Serialize>(&self, entity_id: &str, operation: &str, value: &T) -> Result<()> {
        let ttl = ttl_until_end_of_day(Utc::now().with_timezone(&self.zone));
        self.set_with_ttl(entity_id, operation, value, ttl).await
    }

    pub async fn set_with_ttl<T: Serialize>(
        &self,
        entity_id: &str,
        operation: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| AppError::Cache(format!("failed to encode cache entry: {}", e)))?;
        self.store
            .set(&Self::key(entity_id, operation), &raw, ttl)
            .await
    }

    /// Drop everything, or only entries of one operation. Returns the
    /// number of keys removed (`None` after a full flush).
    pub async fn clear(&self, operation: Option<&str>) -> Result<Option<usize>> {
        let Some(operation) = operation.filter(|op| !op.is_empty()) else {
            self.store.flush_all().await?;
            tracing::info!("Cache flushed");
            return Ok(None);
        };

        let keys = self.store.keys(&format!("*:{}", operation)).await?;
        for key in &keys {
            self.store.delete(key).await?;
        }
        tracing::info!(operation, removed = keys.len(), "Cache cleared for operation");
        Ok(Some(keys.len()))
    }
}

/// Glob match supporting `*` only, as used for cache patterns.
pub(crate) fn glob_match(pattern: &str, key: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == key;
    }

    let (first, last) = (parts[0], parts[parts.len() - 1]);
    if !key.starts_with(first) || key.len() < first.len() + last.len() || !key.ends_with(last) {
        return false;
    }

    let mut rest = &key[first.len()..key.len() - last.len()];
    for middle in &parts[1..parts.len() - 1] {
        match rest.find(middle) {
            Some(idx) => rest = &rest[idx + middle.len()..],
            None => return false,
        }
    }
    true
}
