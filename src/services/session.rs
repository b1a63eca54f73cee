// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token and session lifecycle.
//!
//! A session is the live access token for a user, kept in the cache store
//! under `session:<key>` for the token's lifetime. The refresh token is
//! durable and lives in the [`Store`]. An absent or expired session is
//! recovered through the refresh grant; a missing refresh token is a
//! `NotFound` so callers can send the user back through login.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use serde_json::Value;

use crate::cache::CacheStore;
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::Session;
use crate::services::mapper;
use crate::services::upstream::{TokenResponse, UpstreamClient};

const USER_PROFILE_PATH: &str = "users;use_login=1";

fn session_key(key: &str) -> String {
    format!("session:{}", key)
}

#[derive(Clone)]
pub struct SessionService {
    client: UpstreamClient,
    store: Arc<dyn Store>,
    cache: Arc<dyn CacheStore>,
}

impl SessionService {
    pub fn new(client: UpstreamClient, store: Arc<dyn Store>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            client,
            store,
            cache,
        }
    }

    pub fn authorize_url(&self) -> String {
        self.client.authorize_url()
    }

    // ─── Login ───────────────────────────────────────────────────────────────

    /// Exchange the authorization code, persist the refresh token and open a
    /// session keyed by the user's GUID.
    pub async fn handle_callback(&self, code: &str) -> Result<Session> {
        let tokens = self.client.exchange_code(code).await?;

        let user_id = match tokens.xoauth_yahoo_guid.as_deref().filter(|g| !g.is_empty()) {
            Some(guid) => guid.to_string(),
            None => {
                let profile = self
                    .client
                    .get_xml(&tokens.access_token, USER_PROFILE_PATH)
                    .await?;
                mapper::map_user_guid(&profile)?
            }
        };

        self.store
            .save_refresh_token(&user_id, &tokens.refresh_token)
            .await?;
        let session = self.save_session(&user_id, &tokens).await?;

        tracing::info!(user_id = %user_id, "Login completed, session created");
        Ok(session)
    }

    // ─── Sessions ────────────────────────────────────────────────────────────

    async fn save_session(&self, user_id: &str, tokens: &TokenResponse) -> Result<Session> {
        let lifetime = tokens.expires_in.max(1);
        let session = Session {
            user_id: user_id.to_string(),
            access_token: tokens.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(lifetime),
        };

        let raw = serde_json::to_string(&session)
            .map_err(|e| AppError::Cache(format!("failed to encode session: {}", e)))?;
        self.cache
            .set(
                &session_key(user_id),
                &raw,
                StdDuration::from_secs(lifetime as u64),
            )
            .await?;
        Ok(session)
    }

    /// Live session for `key`; expired or undecodable sessions count as absent.
    pub async fn session(&self, key: &str) -> Result<Option<Session>> {
        let Some(raw) = self.cache.get(&session_key(key)).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if !session.is_expired(Utc::now()) => Ok(Some(session)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding undecodable session");
                Ok(None)
            }
        }
    }

    /// User id behind a session key. Falls back to the key itself once the
    /// session is gone, since keys are user GUIDs.
    pub async fn resolve_user_id(&self, key: &str) -> Result<String> {
        Ok(self
            .session(key)
            .await?
            .map(|s| s.user_id)
            .unwrap_or_else(|| key.to_string()))
    }

    /// Access token for `key`, refreshing when the session is absent.
    pub async fn access_token(&self, key: &str) -> Result<String> {
        if let Some(session) = self.session(key).await? {
            return Ok(session.access_token);
        }
        tracing::debug!(session = %key, "No live session, refreshing");
        let user_id = self.resolve_user_id(key).await?;
        self.refresh(&user_id).await
    }

    /// Run the refresh grant for `user_id` and replace the session.
    pub async fn refresh(&self, user_id: &str) -> Result<String> {
        let refresh_token = self
            .store
            .refresh_token(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No refresh token found for user: {}", user_id)))?;

        let tokens = self.client.refresh_token(&refresh_token).await?;

        // Upstream rotates refresh tokens
        if !tokens.refresh_token.is_empty() {
            self.store
                .save_refresh_token(user_id, &tokens.refresh_token)
                .await?;
        }
        self.save_session(user_id, &tokens).await?;

        tracing::info!(user_id = %user_id, "Access token refreshed");
        Ok(tokens.access_token)
    }

    // ─── Authenticated calls ─────────────────────────────────────────────────

    /// Authenticated fantasy API read. A 401 forces one refresh and one retry;
    /// a second 401 is returned as is.
    pub async fn fantasy_get(&self, key: &str, path: &str) -> Result<Value> {
        let token = self.access_token(key).await?;
        match self.client.get_xml(&token, path).await {
            Err(e) if e.is_auth_expired() => {
                tracing::info!(session = %key, path, "Upstream rejected token, refreshing once");
                let user_id = self.resolve_user_id(key).await?;
                let token = self.refresh(&user_id).await?;
                self.client.get_xml(&token, path).await
            }
            other => other,
        }
    }
}
