// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fantasy Analyzer: fantasy hockey league analytics backend
//!
//! This crate authenticates against the fantasy sports API, pulls league,
//! team and player data from it and from the public stats API, normalizes
//! the payloads into typed records, and serves them with storage and
//! caching in between.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use cache::{CacheStore, ResponseCache};
use config::Config;
use db::Store;
use services::{FantasyService, NhlService, SearchService, SessionService, UpstreamClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub cache: ResponseCache,
    pub sessions: SessionService,
    pub fantasy: FantasyService,
    pub nhl: NhlService,
    pub search: SearchService,
}

impl AppState {
    /// Wire every service over the given storage backends.
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        cache_store: Arc<dyn CacheStore>,
    ) -> error::Result<Self> {
        let client = UpstreamClient::new(&config)?;
        let cache = ResponseCache::new(cache_store.clone(), config.cache_time_zone);

        let sessions = SessionService::new(client.clone(), store.clone(), cache_store);
        let nhl = NhlService::new(client, store.clone(), cache.clone());
        let fantasy = FantasyService::new(
            sessions.clone(),
            store.clone(),
            cache.clone(),
            nhl.clone(),
            config.nhl_game_key.clone(),
            config.pagination_delay,
        );
        let search = SearchService::new(fantasy.clone(), store.clone());

        Ok(Self {
            config,
            store,
            cache,
            sessions,
            fantasy,
            nhl,
            search,
        })
    }
}
