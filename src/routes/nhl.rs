// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stats API routes. These need no session.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::models::{Envelope, NhlPlayer, PlayerGameStat, PlayerIdMapping, ScheduleGame};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/save-all-teams-schedule", get(save_all_schedules))
        .route("/get-next-game/{team}", get(next_game))
        .route("/get-team-roster/{team}", get(team_roster))
        .route("/get-team-roster/{team}/{season}", get(team_roster_season))
        .route("/get-player-game-stats/{player_id}", get(game_stats))
        .route(
            "/get-player-game-stats/{player_id}/season/{season}",
            get(game_stats_season),
        )
        .route("/map-players", post(map_players))
}

async fn save_all_schedules(State(state): State<Arc<AppState>>) -> Result<Json<Envelope<usize>>> {
    let games = state.nhl.save_all_team_schedules().await?;
    Ok(Json(Envelope::ok("All team schedules saved", games)))
}

async fn next_game(
    State(state): State<Arc<AppState>>,
    Path(team): Path<String>,
) -> Result<Json<Envelope<ScheduleGame>>> {
    let game = state.nhl.next_game(&team).await?;
    Ok(Json(Envelope::ok("Next game retrieved", game)))
}

async fn team_roster(
    State(state): State<Arc<AppState>>,
    Path(team): Path<String>,
) -> Result<Json<Envelope<Vec<NhlPlayer>>>> {
    let players = state.nhl.team_roster(&team, None).await?;
    Ok(Json(Envelope::ok("Team roster retrieved", players)))
}

async fn team_roster_season(
    State(state): State<Arc<AppState>>,
    Path((team, season)): Path<(String, String)>,
) -> Result<Json<Envelope<Vec<NhlPlayer>>>> {
    let players = state.nhl.team_roster(&team, Some(&season)).await?;
    Ok(Json(Envelope::ok("Team roster retrieved", players)))
}

async fn game_stats(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> Result<Json<Envelope<Vec<PlayerGameStat>>>> {
    let stats = state.nhl.player_game_log(&player_id, None).await?;
    Ok(Json(Envelope::ok("Player game stats retrieved", stats)))
}

async fn game_stats_season(
    State(state): State<Arc<AppState>>,
    Path((player_id, season)): Path<(String, String)>,
) -> Result<Json<Envelope<Vec<PlayerGameStat>>>> {
    let stats = state.nhl.player_game_log(&player_id, Some(&season)).await?;
    Ok(Json(Envelope::ok("Player game stats retrieved", stats)))
}

async fn map_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<PlayerIdMapping>>>> {
    let mappings = state.nhl.map_players().await?;
    Ok(Json(Envelope::ok("Player id mapping saved", mappings)))
}
