// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stats API workflows: schedules, rosters, game logs and the
//! fantasy-to-stats player id mapping.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;

use crate::cache::{ops, ResponseCache};
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{NhlPlayer, PlayerGameStat, PlayerIdMapping, ScheduleGame};
use crate::services::mapper;
use crate::services::upstream::UpstreamClient;
use crate::time_utils::current_nhl_season;

/// Club abbreviations used by the stats API.
pub const NHL_TEAMS: [&str; 32] = [
    "ANA", "BOS", "BUF", "CAR", "CBJ", "CGY", "CHI", "COL", "DAL", "DET", "EDM", "FLA", "LAK",
    "MIN", "MTL", "NJD", "NSH", "NYI", "NYR", "OTT", "PHI", "PIT", "SEA", "SJS", "STL", "TBL",
    "TOR", "UTA", "VAN", "VGK", "WPG", "WSH",
];

/// Game type of regular season games in game-log URLs.
const REGULAR_SEASON: u8 = 2;

/// Fantasy team abbreviation to stats API club abbreviation.
pub fn normalize_team_abbrev(abbrev: &str) -> String {
    let upper = abbrev.trim().to_ascii_uppercase();
    let mapped = match upper.as_str() {
        "NJ" => "NJD",
        "LA" => "LAK",
        "SJ" => "SJS",
        "TB" => "TBL",
        "MON" => "MTL",
        "WAS" => "WSH",
        "CLS" => "CBJ",
        "ANH" => "ANA",
        other => other,
    };
    mapped.to_string()
}

#[derive(Clone)]
pub struct NhlService {
    client: UpstreamClient,
    store: Arc<dyn Store>,
    cache: ResponseCache,
}

impl NhlService {
    pub fn new(client: UpstreamClient, store: Arc<dyn Store>, cache: ResponseCache) -> Self {
        Self {
            client,
            store,
            cache,
        }
    }

    // ─── Schedules ───────────────────────────────────────────────────────────

    /// Sync every club's season schedule. Stops at the first failing club.
    pub async fn save_all_team_schedules(&self) -> Result<usize> {
        let mut total = 0;
        for team in NHL_TEAMS {
            match self.team_schedule(team).await {
                Ok(games) => total += games.len(),
                Err(e) => {
                    tracing::error!(team, error = %e, "Schedule sync failed");
                    return Err(e);
                }
            }
        }
        tracing::info!(games = total, "All team schedules saved");
        Ok(total)
    }

    /// Fetch and store one club's season schedule.
    pub async fn team_schedule(&self, team: &str) -> Result<Vec<ScheduleGame>> {
        let abbrev = normalize_team_abbrev(team);
        let tree = self
            .client
            .get_json(&format!("club-schedule-season/{}/now", abbrev))
            .await?;
        let games = mapper::map_schedule(&tree)?;

        for game in &games {
            self.store.save_schedule_game(game).await?;
        }
        tracing::debug!(team = %abbrev, games = games.len(), "Team schedule saved");
        Ok(games)
    }

    /// Next stored game for a club, by either fantasy or stats abbreviation.
    pub async fn next_game(&self, team: &str) -> Result<ScheduleGame> {
        let abbrev = normalize_team_abbrev(team);
        self.store
            .next_game_for_team(&abbrev, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No upcoming game for team: {}", abbrev)))
    }

    // ─── Rosters and game logs ───────────────────────────────────────────────

    /// Club roster for a season (current season when `None`), cached per day.
    pub async fn team_roster(&self, team: &str, season: Option<&str>) -> Result<Vec<NhlPlayer>> {
        let abbrev = normalize_team_abbrev(team);
        let season = season
            .map(str::to_string)
            .unwrap_or_else(|| current_nhl_season(Utc::now()));
        let cache_id = format!("{}-{}", abbrev, season);

        if let Some(players) = self.cache.get(&cache_id, ops::TEAM_ROSTER).await? {
            return Ok(players);
        }

        let tree = self
            .client
            .get_json(&format!("roster/{}/{}", abbrev, season))
            .await?;
        let players = mapper::map_roster(&tree, &abbrev)?;

        self.store.save_nhl_players(&players).await?;
        self.cache.set(&cache_id, ops::TEAM_ROSTER, &players).await?;

        tracing::debug!(team = %abbrev, season = %season, players = players.len(), "Roster loaded");
        Ok(players)
    }

    /// Regular season game log of a player, stored as fetched.
    pub async fn player_game_log(
        &self,
        player_id: &str,
        season: Option<&str>,
    ) -> Result<Vec<PlayerGameStat>> {
        let season = season
            .map(str::to_string)
            .unwrap_or_else(|| current_nhl_season(Utc::now()));

        let tree = self
            .client
            .get_json(&format!(
                "player/{}/game-log/{}/{}",
                player_id, season, REGULAR_SEASON
            ))
            .await?;
        let stats = mapper::map_game_log(&tree, player_id)?;

        self.store.save_player_game_stats(&stats).await?;
        Ok(stats)
    }

    // ─── Id mapping ──────────────────────────────────────────────────────────

    /// Rebuild the fantasy-to-stats id mapping by exact full name.
    ///
    /// Names shared by several stats players are ambiguous and dropped.
    /// Rows are appended on every run.
    pub async fn map_players(&self) -> Result<Vec<PlayerIdMapping>> {
        let nhl_players = self.store.nhl_players().await?;

        let mut by_name: HashMap<String, i64> = HashMap::new();
        let mut ambiguous: HashSet<String> = HashSet::new();
        for player in &nhl_players {
            let name = player.full_name();
            if by_name.insert(name.clone(), player.id).is_some() {
                ambiguous.insert(name);
            }
        }
        for name in &ambiguous {
            tracing::debug!(name = %name, "Ambiguous player name dropped from mapping");
            by_name.remove(name);
        }

        let yahoo_players = self.store.yahoo_players().await?;
        let mappings: Vec<PlayerIdMapping> = yahoo_players
            .iter()
            .filter_map(|yp| {
                by_name.get(&yp.full_name).map(|id| PlayerIdMapping {
                    yahoo_player_id: yp.id.clone(),
                    nhl_player_id: id.to_string(),
                    player_name: yp.full_name.clone(),
                    team_abbr: yp.team_name.clone(),
                })
            })
            .collect();

        self.store.insert_player_mappings(&mappings).await?;

        tracing::info!(
            stats_players = nhl_players.len(),
            fantasy_players = yahoo_players.len(),
            mapped = mappings.len(),
            "Player id mapping rebuilt"
        );
        Ok(mappings)
    }
}
