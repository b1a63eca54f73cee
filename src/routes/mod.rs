// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod fantasy;
pub mod nhl;

use crate::middleware::{require_session, SESSION_HEADER};
use crate::models::Envelope;
use crate::AppState;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<Envelope<HealthResponse>> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(Envelope::ok(
        "Service is healthy",
        HealthResponse {
            status: "ok".to_string(),
            build_id,
        },
    ))
}

/// Origins allowed to call the API: the configured frontend plus local
/// dev servers.
fn is_allowed_origin(frontend_url: &str, origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    origin == frontend_url.trim_end_matches('/')
        || origin.starts_with("http://localhost:")
        || origin.starts_with("http://127.0.0.1:")
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _parts| {
            is_allowed_origin(&frontend_url, origin)
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(SESSION_HEADER),
        ]);

    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(nhl::routes());

    // Protected routes (session header required)
    let protected_routes = fantasy::routes().route_layer(middleware::from_fn(require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
