// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session header middleware.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::AppError;

/// Header carrying the opaque session key (the user's GUID).
pub const SESSION_HEADER: &str = "user-session";

/// Session key extracted from the request.
#[derive(Debug, Clone)]
pub struct UserSession(pub String);

/// Middleware that requires a non-empty `user-session` header.
///
/// The key is not checked here: an unknown key fails later with
/// `NotFound` when no refresh token exists for it.
pub async fn require_session(mut request: Request, next: Next) -> Result<Response, AppError> {
    let session = request
        .headers()
        .get(SESSION_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(UserSession(session));
    Ok(next.run(request).await)
}
