// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth login routes and cache administration.

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::Envelope;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login))
        .route("/yahoo-redirect", get(callback))
        .route("/clear-cache", post(clear_cache))
}

/// Start OAuth flow - redirect to the consent page.
async fn login(State(state): State<Arc<AppState>>) -> Redirect {
    let url = state.sessions.authorize_url();
    tracing::info!("Starting OAuth flow");
    Redirect::temporary(&url)
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange the code, then hand the session key
/// (`userid`) to the frontend.
async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth consent denied");
        return Err(AppError::BadRequest(format!("Authorization failed: {}", error)));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Authorization code missing".to_string()))?;

    let session = state.sessions.handle_callback(&code).await?;

    let frontend = state.config.frontend_url.trim_end_matches('/');
    let url = format!(
        "{}?userid={}",
        frontend,
        urlencoding::encode(&session.user_id)
    );
    Ok(Redirect::temporary(&url))
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearCacheRequest {
    #[serde(default)]
    operation: Option<String>,
}

/// Flush the whole cache, or only entries of one operation.
async fn clear_cache(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Envelope<Option<usize>>>> {
    let request: ClearCacheRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ClearCacheRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?
    };

    let operation = request.operation.filter(|op| !op.is_empty());
    let removed = state.cache.clear(operation.as_deref()).await?;

    let message = match &operation {
        Some(op) => format!("Cache cleared successfully for operation {}", op),
        None => "Cache cleared successfully".to_string(),
    };
    Ok(Json(Envelope::ok(message, removed)))
}
