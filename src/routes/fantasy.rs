// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fantasy data routes. All of them need a session.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::middleware::UserSession;
use crate::models::{
    Envelope, League, LeagueSetting, LeagueTeam, MatchupSet, Player, PlayerDetails, PlayerPoints,
    PlayerRank, WeekPoints, YahooPlayer,
};
use crate::AppState;

/// Session-protected routes; the middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get-user-leagues", get(user_leagues))
        .route("/get-league-info/{league_id}", get(league_info))
        .route("/get-league-settings/{league_id}", get(league_settings))
        .route(
            "/get-league-setting/{league_id}/{setting}",
            get(league_setting),
        )
        .route("/get-league-teams/{league_id}", get(league_teams))
        .route("/get-team-weekly/team/{team_id}", get(team_weekly))
        .route("/get-team-matchups/team/{team_id}", get(team_matchups))
        .route("/get-player-stats/player/{player_id}", get(player_stats))
        .route(
            "/get-player-rank/league/{league_id}/player/{player_id}",
            get(player_rank),
        )
        .route("/get-all-players", get(all_players))
        .route(
            "/get-fantasy-league-player-stats/league/{league_id}/player/{player_id}",
            get(league_player_points),
        )
        .route("/get-player-by-name/player/{name}", get(player_by_name))
}

// ─── Leagues ─────────────────────────────────────────────────

async fn user_leagues(
    State(state): State<Arc<AppState>>,
    Extension(UserSession(session)): Extension<UserSession>,
) -> Result<Json<Envelope<Value>>> {
    let leagues = state.fantasy.get_user_leagues(&session).await?;
    Ok(Json(Envelope::ok("User leagues retrieved", leagues)))
}

async fn league_info(
    State(state): State<Arc<AppState>>,
    Extension(UserSession(session)): Extension<UserSession>,
    Path(league_id): Path<String>,
) -> Result<Json<Envelope<Value>>> {
    let league = state.fantasy.get_league(&session, &league_id).await?;
    Ok(Json(Envelope::ok("League retrieved", league)))
}

async fn league_settings(
    State(state): State<Arc<AppState>>,
    Extension(UserSession(session)): Extension<UserSession>,
    Path(league_id): Path<String>,
) -> Result<Json<Envelope<League>>> {
    let league = state.fantasy.get_league_settings(&session, &league_id).await?;
    Ok(Json(Envelope::ok("League settings retrieved", league)))
}

async fn league_setting(
    State(state): State<Arc<AppState>>,
    Extension(UserSession(session)): Extension<UserSession>,
    Path((league_id, setting)): Path<(String, String)>,
) -> Result<Json<Envelope<String>>> {
    let setting: LeagueSetting = setting.parse().map_err(AppError::BadRequest)?;
    let value = state
        .fantasy
        .league_setting(&session, &league_id, setting)
        .await?;
    Ok(Json(Envelope::ok("League setting retrieved", value)))
}

async fn league_teams(
    State(state): State<Arc<AppState>>,
    Extension(UserSession(session)): Extension<UserSession>,
    Path(league_id): Path<String>,
) -> Result<Json<Envelope<Vec<LeagueTeam>>>> {
    let teams = state.fantasy.league_teams(&session, &league_id).await?;
    Ok(Json(Envelope::ok("League teams retrieved", teams)))
}

// ─── Teams ───────────────────────────────────────────────────

async fn team_weekly(
    State(state): State<Arc<AppState>>,
    Extension(UserSession(session)): Extension<UserSession>,
    Path(team_id): Path<String>,
) -> Result<Json<Envelope<BTreeMap<u32, WeekPoints>>>> {
    let weeks = state.fantasy.team_weekly_points(&session, &team_id).await?;
    Ok(Json(Envelope::ok("Team weekly stats retrieved", weeks)))
}

async fn team_matchups(
    State(state): State<Arc<AppState>>,
    Extension(UserSession(session)): Extension<UserSession>,
    Path(team_id): Path<String>,
) -> Result<Json<Envelope<MatchupSet>>> {
    let set = state.fantasy.team_matchups(&session, &team_id).await?;
    Ok(Json(Envelope::ok("Team matchups retrieved", set)))
}

// ─── Players ─────────────────────────────────────────────────

async fn player_stats(
    State(state): State<Arc<AppState>>,
    Extension(UserSession(session)): Extension<UserSession>,
    Path(player_id): Path<String>,
) -> Result<Json<Envelope<Player>>> {
    let player = state.fantasy.player_stats(&session, &player_id).await?;
    Ok(Json(Envelope::ok("Player stats retrieved", player)))
}

async fn player_rank(
    State(state): State<Arc<AppState>>,
    Extension(UserSession(session)): Extension<UserSession>,
    Path((league_id, player_id)): Path<(String, String)>,
) -> Result<Json<Envelope<Vec<PlayerRank>>>> {
    let ranks = state
        .fantasy
        .player_ranks(&session, &league_id, &player_id)
        .await?;
    Ok(Json(Envelope::ok("Player ranks retrieved", ranks)))
}

async fn all_players(
    State(state): State<Arc<AppState>>,
    Extension(UserSession(session)): Extension<UserSession>,
) -> Result<Json<Envelope<Vec<YahooPlayer>>>> {
    let players = state.fantasy.all_yahoo_players(&session).await?;
    Ok(Json(Envelope::ok("All players retrieved", players)))
}

async fn league_player_points(
    State(state): State<Arc<AppState>>,
    Extension(UserSession(session)): Extension<UserSession>,
    Path((league_id, player_id)): Path<(String, String)>,
) -> Result<Json<Envelope<PlayerPoints>>> {
    let points = state
        .fantasy
        .league_player_points(&session, &league_id, &player_id)
        .await?;
    Ok(Json(Envelope::ok("League player stats retrieved", points)))
}

async fn player_by_name(
    State(state): State<Arc<AppState>>,
    Extension(UserSession(session)): Extension<UserSession>,
    Path(name): Path<String>,
) -> Result<Json<Envelope<PlayerDetails>>> {
    let details = state.search.player_by_name(&session, &name).await?;
    Ok(Json(Envelope::ok("Player retrieved", details)))
}
