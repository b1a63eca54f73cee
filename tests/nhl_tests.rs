// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stats API workflow tests: schedules, rosters, game logs and id mapping.

use fantasy_analyzer::db::Store;
use fantasy_analyzer::models::YahooPlayer;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::spawn_app;

fn roster_body() -> serde_json::Value {
    json!({
        "forwards": [
            {"id": 8478402, "firstName": {"default": "Connor"}, "lastName": {"default": "McDavid"},
             "sweaterNumber": 97, "positionCode": "C", "birthCity": {"default": "Richmond Hill"}},
            {"id": 8477934, "firstName": {"default": "Leon"}, "lastName": {"default": "Draisaitl"},
             "sweaterNumber": 29, "positionCode": "C"}
        ],
        "defensemen": [
            {"id": 8480803, "firstName": {"default": "Evan"}, "lastName": {"default": "Bouchard"},
             "positionCode": "D"}
        ],
        "goalies": []
    })
}

fn yahoo_player(id: &str, name: &str) -> YahooPlayer {
    YahooPlayer {
        id: id.to_string(),
        full_name: name.to_string(),
        team_name: "Edmonton Oilers".to_string(),
        headshot_url: String::new(),
    }
}

#[tokio::test]
async fn test_team_roster_stored_and_cached() {
    let app = spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/v1/roster/EDM/20242025"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster_body()))
        .expect(1)
        .mount(&app.server)
        .await;

    let players = app
        .state
        .nhl
        .team_roster("edm", Some("20242025"))
        .await
        .unwrap();
    assert_eq!(players.len(), 3);
    assert_eq!(players[0].full_name(), "Connor McDavid");
    assert_eq!(players[0].birth_city, "Richmond Hill");
    assert_eq!(players[2].position_code, "D");
    assert!(players.iter().all(|p| p.team == "EDM"));

    assert_eq!(app.store.nhl_players().await.unwrap().len(), 3);

    let cached = app
        .state
        .nhl
        .team_roster("EDM", Some("20242025"))
        .await
        .unwrap();
    assert_eq!(cached, players);
}

#[tokio::test]
async fn test_team_schedule_and_next_game() {
    let app = spawn_app().await;

    let soon = chrono::Utc::now() + chrono::Duration::days(1);
    let later = chrono::Utc::now() + chrono::Duration::days(3);
    let body = json!({"games": [
        {"id": 2024020001, "season": 20242025, "gameType": 2, "gameDate": "2024-10-09",
         "startTimeUTC": "2024-10-09T23:00:00Z",
         "homeTeam": {"abbrev": "NJD"}, "awayTeam": {"abbrev": "BUF"}},
        {"id": 2024020500, "season": 20242025, "gameType": 2, "gameDate": later.format("%Y-%m-%d").to_string(),
         "startTimeUTC": later.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
         "homeTeam": {"abbrev": "PIT"}, "awayTeam": {"abbrev": "NJD"}},
        {"id": 2024020400, "season": 20242025, "gameType": 2, "gameDate": soon.format("%Y-%m-%d").to_string(),
         "startTimeUTC": soon.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
         "homeTeam": {"abbrev": "NJD"}, "awayTeam": {"abbrev": "NYR"}}
    ]});

    Mock::given(method("GET"))
        .and(path("/v1/club-schedule-season/NJD/now"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&app.server)
        .await;

    let games = app.state.nhl.team_schedule("NJ").await.unwrap();
    assert_eq!(games.len(), 3);

    let next = app.state.nhl.next_game("nj").await.unwrap();
    assert_eq!(next.id, 2024020400);
    assert_eq!(next.away_team_abbrev, "NYR");
}

#[tokio::test]
async fn test_next_game_without_schedule_is_not_found() {
    let app = spawn_app().await;
    let err = app.state.nhl.next_game("EDM").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_save_all_schedules_stops_on_first_failure() {
    let app = spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/v1/club-schedule-season/ANA/now"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"games": []})))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/club-schedule-season/BOS/now"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/club-schedule-season/BUF/now"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"games": []})))
        .expect(0)
        .mount(&app.server)
        .await;

    assert!(app.state.nhl.save_all_team_schedules().await.is_err());
}

#[tokio::test]
async fn test_player_game_log_stored() {
    let app = spawn_app().await;

    let body = json!({"gameLog": [
        {"gameId": 2024020010, "teamAbbrev": "EDM", "homeRoadFlag": "H", "gameDate": "2024-10-12",
         "goals": 1, "assists": 2, "points": 3, "plusMinus": 1, "shots": 4, "pim": 2, "toi": "21:30",
         "commonName": {"default": "Oilers"}, "opponentCommonName": {"default": "Flames"}},
        {"gameId": 2024020025, "teamAbbrev": "EDM", "homeRoadFlag": "R", "gameDate": "2024-10-15",
         "goals": 0, "assists": 1, "points": 1}
    ]});

    Mock::given(method("GET"))
        .and(path("/v1/player/8478402/game-log/20242025/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&app.server)
        .await;

    let stats = app
        .state
        .nhl
        .player_game_log("8478402", Some("20242025"))
        .await
        .unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].game_id, "2024020010");
    assert_eq!(stats[0].points, 3);
    assert_eq!(stats[0].opponent, "Flames");
    assert_eq!(app.store.game_stat_count(), 2);
}

#[tokio::test]
async fn test_game_log_upstream_error_propagates() {
    let app = spawn_app().await;

    Mock::given(path_regex("^/v1/player/.*"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.server)
        .await;

    let err = app
        .state
        .nhl
        .player_game_log("1", Some("20242025"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_map_players_by_exact_name() {
    let app = spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/v1/roster/EDM/20242025"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster_body()))
        .mount(&app.server)
        .await;
    app.state
        .nhl
        .team_roster("EDM", Some("20242025"))
        .await
        .unwrap();

    app.store
        .save_yahoo_players(&[
            yahoo_player("453.p.6743", "Connor McDavid"),
            yahoo_player("453.p.5000", "Leon Draisaitl"),
            yahoo_player("453.p.9999", "Nobody Known"),
        ])
        .await
        .unwrap();

    let mappings = app.state.nhl.map_players().await.unwrap();
    assert_eq!(mappings.len(), 2);

    let mcdavid = app
        .store
        .mapping_by_name("Connor McDavid")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mcdavid.yahoo_player_id, "453.p.6743");
    assert_eq!(mcdavid.nhl_player_id, "8478402");
    assert!(app.store.mapping_by_name("Nobody Known").await.unwrap().is_none());
}

#[tokio::test]
async fn test_map_players_drops_ambiguous_names() {
    let app = spawn_app().await;

    let roster = json!({
        "forwards": [
            {"id": 1, "firstName": {"default": "Sebastian"}, "lastName": {"default": "Aho"}},
            {"id": 2, "firstName": {"default": "Sebastian"}, "lastName": {"default": "Aho"}}
        ]
    });
    Mock::given(method("GET"))
        .and(path("/v1/roster/CAR/20242025"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster))
        .mount(&app.server)
        .await;
    app.state
        .nhl
        .team_roster("CAR", Some("20242025"))
        .await
        .unwrap();

    app.store
        .save_yahoo_players(&[yahoo_player("453.p.1", "Sebastian Aho")])
        .await
        .unwrap();

    assert!(app.state.nhl.map_players().await.unwrap().is_empty());
}
