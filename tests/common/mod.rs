// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fantasy_analyzer::cache::{CacheStore, MemoryCache};
use fantasy_analyzer::config::Config;
use fantasy_analyzer::db::{MemoryStore, Store};
use fantasy_analyzer::models::Session;
use fantasy_analyzer::routes::create_router;
use fantasy_analyzer::AppState;
use serde_json::json;
use wiremock::{MockServer, ResponseTemplate};

/// Session key used by most tests.
#[allow(dead_code)]
pub const USER: &str = "GUID123";

/// App wired to in-memory storage and a stub upstream.
pub struct TestApp {
    pub server: MockServer,
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MemoryCache>,
}

#[allow(dead_code)]
impl TestApp {
    pub fn router(&self) -> axum::Router {
        create_router(self.state.clone())
    }

    /// Durable refresh token, as left behind by a completed login.
    pub async fn seed_refresh_token(&self, user_id: &str, token: &str) {
        self.store
            .save_refresh_token(user_id, token)
            .await
            .expect("Failed to seed refresh token");
    }

    /// Live session holding `access_token`.
    pub async fn seed_session(&self, user_id: &str, access_token: &str) {
        let session = Session {
            user_id: user_id.to_string(),
            access_token: access_token.to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        };
        self.cache
            .set(
                &format!("session:{}", user_id),
                &serde_json::to_string(&session).unwrap(),
                Duration::from_secs(3600),
            )
            .await
            .expect("Failed to seed session");
    }

    /// Refresh token plus live session for [`USER`].
    pub async fn login(&self) {
        self.seed_refresh_token(USER, "refresh-1").await;
        self.seed_session(USER, "access-1").await;
    }
}

/// Create a test app whose upstreams all point at a fresh mock server.
pub async fn spawn_app() -> TestApp {
    let server = MockServer::start().await;
    let config = Config::test_default(&server.uri());

    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(MemoryCache::new());

    let state = AppState::new(config, store.clone(), cache.clone())
        .expect("Failed to build app state");

    TestApp {
        server,
        state: Arc::new(state),
        store,
        cache,
    }
}

/// Fantasy API reply: `inner` wrapped in the response envelope.
#[allow(dead_code)]
pub fn xml_response(inner: &str) -> ResponseTemplate {
    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<fantasy_content xml:lang="en-US" copyright="Data provided by Yahoo! and STATS, LLC">{}</fantasy_content>"#,
        inner
    );
    ResponseTemplate::new(200).set_body_raw(body, "application/xml")
}

/// Token endpoint reply.
#[allow(dead_code)]
pub fn token_response(access_token: &str, refresh_token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_in": 3600,
        "token_type": "bearer"
    }))
}

/// League settings payload (envelope removed), as kept in the store.
#[allow(dead_code)]
pub fn league_settings_tree(league_key: &str, current_week: &str) -> serde_json::Value {
    json!({"league": {
        "league_key": league_key,
        "league_id": league_key.rsplit('.').next().unwrap_or_default(),
        "name": "Tip-Top League",
        "num_teams": "10",
        "current_week": current_week,
        "start_week": "1",
        "end_week": "24",
        "season": "2024",
        "settings": {
            "stat_categories": {"stats": {"stat": [
                {"stat_id": "1", "name": "Goals"},
                {"stat_id": "2", "name": "Assists"}
            ]}},
            "stat_modifiers": {"stats": {"stat": [
                {"stat_id": "1", "value": "6"},
                {"stat_id": "2", "value": "4"}
            ]}}
        }
    }})
}

/// Season stats reply for one player.
#[allow(dead_code)]
pub fn player_xml(player_key: &str, team_abbr: &str) -> String {
    format!(
        r#"<player>
  <player_key>{key}</player_key>
  <player_id>{id}</player_id>
  <name><full>Connor McDavid</full><first>Connor</first><last>McDavid</last>
    <ascii_first>Connor</ascii_first><ascii_last>McDavid</ascii_last></name>
  <editorial_team_full_name>Edmonton Oilers</editorial_team_full_name>
  <editorial_team_abbr>{team}</editorial_team_abbr>
  <display_position>C</display_position>
  <eligible_positions><position>C</position><position>Util</position></eligible_positions>
  <player_stats>
    <stats>
      <stat><stat_id>1</stat_id><value>10</value></stat>
      <stat><stat_id>2</stat_id><value>5</value></stat>
    </stats>
  </player_stats>
</player>"#,
        key = player_key,
        id = player_key.rsplit('.').next().unwrap_or_default(),
        team = team_abbr
    )
}
