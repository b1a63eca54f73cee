// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token lifecycle tests.
//!
//! These tests verify that:
//! 1. A rejected access token is refreshed and the call retried exactly once
//! 2. A second rejection is surfaced instead of looping
//! 3. A user without a refresh token gets `NotFound`
//! 4. Login stores the refresh token and opens a session keyed by GUID

use fantasy_analyzer::db::Store;
use fantasy_analyzer::error::AppError;
use wiremock::matchers::{body_string_contains, header, method, path, path_regex};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::{spawn_app, token_response, xml_response, USER};

const LEAGUE_XML: &str = "<league><league_key>453.l.1</league_key><league_id>1</league_id></league>";

#[tokio::test]
async fn test_expired_token_refreshed_and_retried_once() {
    let app = spawn_app().await;
    app.login().await;

    Mock::given(method("GET"))
        .and(path("/fantasy/v2/league/453.l.1"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fantasy/v2/league/453.l.1"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(xml_response(LEAGUE_XML))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2/get_token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(token_response("access-2", "refresh-2"))
        .expect(1)
        .mount(&app.server)
        .await;

    let tree = app
        .state
        .sessions
        .fantasy_get(USER, "league/453.l.1")
        .await
        .unwrap();
    assert_eq!(tree["league"]["league_id"], "1");

    // Rotated refresh token persisted, new access token is the live session
    assert_eq!(
        app.store.refresh_token(USER).await.unwrap().as_deref(),
        Some("refresh-2")
    );
    let session = app.state.sessions.session(USER).await.unwrap().unwrap();
    assert_eq!(session.access_token, "access-2");
}

#[tokio::test]
async fn test_second_rejection_is_returned() {
    let app = spawn_app().await;
    app.login().await;

    Mock::given(method("GET"))
        .and(path("/fantasy/v2/league/453.l.1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2/get_token"))
        .respond_with(token_response("access-2", "refresh-2"))
        .expect(1)
        .mount(&app.server)
        .await;

    let err = app
        .state
        .sessions
        .fantasy_get(USER, "league/453.l.1")
        .await
        .unwrap_err();
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_non_auth_error_not_retried() {
    let app = spawn_app().await;
    app.login().await;

    Mock::given(method("GET"))
        .and(path("/fantasy/v2/league/453.l.1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2/get_token"))
        .respond_with(token_response("access-2", "refresh-2"))
        .expect(0)
        .mount(&app.server)
        .await;

    let err = app
        .state
        .sessions
        .fantasy_get(USER, "league/453.l.1")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Upstream { status: 500, .. }));
}

#[tokio::test]
async fn test_missing_refresh_token_is_not_found() {
    let app = spawn_app().await;

    Mock::given(path_regex("^/fantasy/v2/.*"))
        .respond_with(xml_response(LEAGUE_XML))
        .expect(0)
        .mount(&app.server)
        .await;

    let err = app
        .state
        .sessions
        .fantasy_get("unknown-user", "league/453.l.1")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "Resource not found: No refresh token found for user: unknown-user"
    );
}

#[tokio::test]
async fn test_absent_session_refreshes_before_first_call() {
    let app = spawn_app().await;
    app.seed_refresh_token(USER, "refresh-1").await;

    Mock::given(method("POST"))
        .and(path("/oauth2/get_token"))
        .respond_with(token_response("access-2", ""))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fantasy/v2/league/453.l.1"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(xml_response(LEAGUE_XML))
        .expect(1)
        .mount(&app.server)
        .await;

    app.state
        .sessions
        .fantasy_get(USER, "league/453.l.1")
        .await
        .unwrap();

    // An empty rotated token does not overwrite the stored one
    assert_eq!(
        app.store.refresh_token(USER).await.unwrap().as_deref(),
        Some("refresh-1")
    );
}

#[tokio::test]
async fn test_refresh_without_rotated_token_keeps_stored_one() {
    let app = spawn_app().await;
    app.seed_refresh_token(USER, "refresh-1").await;

    Mock::given(method("POST"))
        .and(path("/oauth2/get_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-2",
            "expires_in": 3600,
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let token = app.state.sessions.refresh(USER).await.unwrap();
    assert_eq!(token, "access-2");
    assert_eq!(
        app.store.refresh_token(USER).await.unwrap().as_deref(),
        Some("refresh-1")
    );
}

#[tokio::test]
async fn test_live_session_skips_token_endpoint() {
    let app = spawn_app().await;
    app.login().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/get_token"))
        .respond_with(token_response("access-2", "refresh-2"))
        .expect(0)
        .mount(&app.server)
        .await;

    let token = app.state.sessions.access_token(USER).await.unwrap();
    assert_eq!(token, "access-1");
}

#[tokio::test]
async fn test_callback_uses_guid_from_token_response() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/get_token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "expires_in": 3600,
            "xoauth_yahoo_guid": "GUIDXYZ"
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let session = app.state.sessions.handle_callback("abc").await.unwrap();
    assert_eq!(session.user_id, "GUIDXYZ");
    assert_eq!(session.access_token, "access-1");

    assert_eq!(
        app.store.refresh_token("GUIDXYZ").await.unwrap().as_deref(),
        Some("refresh-1")
    );
    assert!(app.state.sessions.session("GUIDXYZ").await.unwrap().is_some());
}

#[tokio::test]
async fn test_callback_without_guid_reads_profile() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/get_token"))
        .respond_with(token_response("access-1", "refresh-1"))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/fantasy/v2/users.*"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(xml_response(
            r#"<users count="1"><user><guid>PROFILEGUID</guid></user></users>"#,
        ))
        .expect(1)
        .mount(&app.server)
        .await;

    let session = app.state.sessions.handle_callback("abc").await.unwrap();
    assert_eq!(session.user_id, "PROFILEGUID");
    assert_eq!(
        app.state.sessions.resolve_user_id("PROFILEGUID").await.unwrap(),
        "PROFILEGUID"
    );
}
