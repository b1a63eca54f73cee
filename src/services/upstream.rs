// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the fantasy API (OAuth + XML data) and the stats API (JSON).
//!
//! Handles:
//! - Authorization URL and token endpoint (code and refresh grants)
//! - Authenticated XML reads, converted to a tree with the envelope removed
//! - Unauthenticated JSON reads from the stats API
//! - Status classification: 401 is reported apart from every other failure

use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::xml::{unwrap_envelope, xml_to_tree};

const SCOPE: &str = "fspt-r";

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub xoauth_yahoo_guid: Option<String>,
}

/// Client for both upstream APIs.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    api_base: String,
    auth_base: String,
    stats_base: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: config.yahoo_api_base.trim_end_matches('/').to_string(),
            auth_base: config.yahoo_auth_base.trim_end_matches('/').to_string(),
            stats_base: config.nhl_api_base.trim_end_matches('/').to_string(),
            client_id: config.yahoo_client_id.clone(),
            client_secret: config.yahoo_client_secret.clone(),
            redirect_uri: config.yahoo_redirect_uri.clone(),
        })
    }

    /// URL the user is sent to for consent.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/request_auth?client_id={}&redirect_uri={}&response_type=code&scope={}",
            self.auth_base,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            SCOPE
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    /// Exchange a refresh token for a new token pair.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let url = format!("{}/get_token", self.auth_base);
        let response = self
            .http
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::UpstreamTransport(format!("token request failed: {}", e)))?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Mapping(format!("invalid token response: {}", e)))
    }

    /// Authenticated GET on the fantasy API. `path` is relative to the API
    /// base, e.g. `league/453.l.1/settings`.
    pub async fn get_xml(&self, access_token: &str, path: &str) -> Result<Value> {
        let url = format!("{}/{}", self.api_base, path);
        tracing::debug!(url = %url, "Fantasy API request");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::UpstreamTransport(format!("GET {}: {}", path, e)))?;

        let response = check_status(response).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::UpstreamTransport(format!("reading {}: {}", path, e)))?;

        unwrap_envelope(xml_to_tree(&body)?)
    }

    /// Unauthenticated GET on the stats API.
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}/{}", self.stats_base, path);
        tracing::debug!(url = %url, "Stats API request");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamTransport(format!("GET {}: {}", path, e)))?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Mapping(format!("invalid JSON from {}: {}", path, e)))
    }
}

/// Pass 2xx through; classify everything else.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 401 {
        return Err(AppError::UpstreamAuthExpired);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "Upstream returned an error");
    Err(AppError::Upstream {
        status: status.as_u16(),
        message: body,
    })
}
