// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fantasy Analyzer API Server
//!
//! Serves fantasy hockey league analytics built from the fantasy sports
//! API and the public stats API.

use fantasy_analyzer::{
    cache::{CacheStore, MemoryCache, RedisCache},
    config::Config,
    db::{MemoryStore, PgStore, Store},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CONNECT_RETRIES: u32 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Fantasy Analyzer API");

    // Relational store
    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let pg = PgStore::connect(url, CONNECT_RETRIES)
                .await
                .expect("Failed to connect to Postgres");
            pg.migrate().await.expect("Failed to run migrations");
            tracing::info!("Postgres store ready");
            Arc::new(pg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    // Cache store
    let cache: Arc<dyn CacheStore> = match &config.redis_url {
        Some(url) => Arc::new(
            RedisCache::connect(url, CONNECT_RETRIES)
                .await
                .expect("Failed to connect to Redis"),
        ),
        None => {
            tracing::warn!("REDIS_URL not set, using in-memory cache");
            Arc::new(MemoryCache::new())
        }
    };

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), store, cache)?);

    // Build router
    let app = fantasy_analyzer::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fantasy_analyzer=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
