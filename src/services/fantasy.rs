// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fantasy API workflows.
//!
//! Reads go cache, then store (when the stored copy is still fresh), then
//! upstream. Upstream results are mapped, written back to the store and
//! then to the cache.
//!
//! Freshness of stored copies:
//! - league settings: stored after the start of the current scoring week
//! - player stats: until the morning after the team's next game
//! - weekly team points: once both projected and final points are set

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{json, Value};

use crate::cache::{ops, ResponseCache};
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{
    League, LeagueSetting, LeagueTeam, MatchupSet, Player, PlayerPoints, PlayerRank, TeamWeek,
    WeekPoints, YahooPlayer,
};
use crate::services::mapper;
use crate::services::nhl::NhlService;
use crate::services::scoring;
use crate::services::session::SessionService;
use crate::time_utils::{morning_after, start_of_scoring_week};

/// Page size of the player universe listing.
const PLAYERS_PAGE_SIZE: usize = 25;

const RANK_TYPES: &str = "season,last30days,last14days,last7days,projected_next7days,\
                          projected_next14days,projected_season_remaining";

#[derive(Clone)]
pub struct FantasyService {
    sessions: SessionService,
    store: Arc<dyn Store>,
    cache: ResponseCache,
    nhl: NhlService,
    game_key: String,
    pagination_delay: Duration,
}

impl FantasyService {
    pub fn new(
        sessions: SessionService,
        store: Arc<dyn Store>,
        cache: ResponseCache,
        nhl: NhlService,
        game_key: String,
        pagination_delay: Duration,
    ) -> Self {
        Self {
            sessions,
            store,
            cache,
            nhl,
            game_key,
            pagination_delay,
        }
    }

    // ─── Leagues ─────────────────────────────────────────────────────────────

    /// Every league of the logged-in user, flattened across games.
    pub async fn get_user_leagues(&self, session: &str) -> Result<Value> {
        if let Some(leagues) = self.cache.get(session, ops::LEAGUES).await? {
            return Ok(leagues);
        }

        let tree = self
            .sessions
            .fantasy_get(session, "users;use_login=1/games/leagues")
            .await?;
        let leagues = json!({ "leagues": mapper::extract_leagues(&tree)? });

        self.cache.set(session, ops::LEAGUES, &leagues).await?;
        Ok(leagues)
    }

    /// Raw league payload.
    pub async fn get_league(&self, session: &str, league_id: &str) -> Result<Value> {
        if let Some(league) = self.cache.get(league_id, ops::LEAGUE).await? {
            return Ok(league);
        }

        let tree = self
            .sessions
            .fantasy_get(session, &format!("league/{}", league_id))
            .await?;

        self.cache.set(league_id, ops::LEAGUE, &tree).await?;
        Ok(tree)
    }

    /// League settings; the stored copy is reused within the scoring week
    /// it was written in.
    pub async fn get_league_settings(&self, session: &str, league_id: &str) -> Result<League> {
        let now = Utc::now();
        let week_start = start_of_scoring_week(now);
        if let Some(league) = self
            .cache
            .get::<League>(league_id, ops::LEAGUE_SETTINGS)
            .await?
        {
            if league.last_updated.is_some_and(|t| t > week_start) {
                return Ok(league);
            }
            tracing::debug!(league_id, "Cached league settings predate this scoring week");
        }

        if let Some(stored) = self.store.league_settings(league_id).await? {
            if stored.last_updated > week_start {
                let mut league = mapper::map_to_league(&stored.settings)?;
                league.last_updated = Some(stored.last_updated);
                self.cache.set(league_id, ops::LEAGUE_SETTINGS, &league).await?;
                return Ok(league);
            }
            tracing::debug!(league_id, "Stored league settings predate this scoring week");
        }

        let tree = self
            .sessions
            .fantasy_get(session, &format!("league/{}/settings", league_id))
            .await?;
        let mut league = mapper::map_to_league(&tree)?;

        self.store.save_league_settings(league_id, &tree).await?;
        league.last_updated = Some(now);
        self.cache.set(league_id, ops::LEAGUE_SETTINGS, &league).await?;

        tracing::info!(league_id, "League settings refreshed from upstream");
        Ok(league)
    }

    /// One league setting rendered as a string.
    pub async fn league_setting(
        &self,
        session: &str,
        league_id: &str,
        setting: LeagueSetting,
    ) -> Result<String> {
        let league = self.get_league_settings(session, league_id).await?;
        Ok(setting.read(&league))
    }

    /// League membership; upstream only when nothing is stored yet.
    pub async fn league_teams(&self, session: &str, league_id: &str) -> Result<Vec<LeagueTeam>> {
        match self.store.league_teams(league_id).await {
            Ok(teams) if !teams.is_empty() => return Ok(teams),
            Ok(_) => {}
            Err(e) => tracing::warn!(league_id, error = %e, "Failed to read stored league teams"),
        }

        let tree = self
            .sessions
            .fantasy_get(session, &format!("league/{}/teams", league_id))
            .await?;
        let teams = mapper::map_league_teams(&tree)?;

        if let Err(e) = self.store.save_league_teams(&teams).await {
            tracing::warn!(league_id, error = %e, "Failed to store league teams");
        }
        Ok(teams)
    }

    // ─── Teams ───────────────────────────────────────────────────────────────

    /// A team's figures for a single week.
    pub async fn team_week_stats(&self, session: &str, team_id: &str, week: u32) -> Result<TeamWeek> {
        let tree = self
            .sessions
            .fantasy_get(session, &format!("team/{}/stats;type=week;week={}", team_id, week))
            .await?;
        mapper::map_to_team_week(&tree)
    }

    /// Projected and final points for every week up to the current one.
    ///
    /// Each fetched week is stored before the next is requested, so a
    /// failure part-way keeps the earlier weeks and a later call resumes.
    pub async fn team_weekly_points(
        &self,
        session: &str,
        team_id: &str,
    ) -> Result<BTreeMap<u32, WeekPoints>> {
        if let Some(weeks) = self.cache.get(team_id, ops::WEEKLY_STATS).await? {
            return Ok(weeks);
        }

        let league_id = mapper::league_key_for_team(team_id)?;
        let current = self
            .league_setting(session, &league_id, LeagueSetting::CurrentWeek)
            .await?;

        // Week 1 has no settled projections yet
        if current == "1" {
            return Ok(BTreeMap::new());
        }

        let current_week: u32 = current
            .parse()
            .map_err(|_| AppError::Mapping(format!("invalid current week: {}", current)))?;

        let mut weeks = BTreeMap::new();
        for week in 1..=current_week {
            if let Some(points) = self.store.team_week_points(team_id, week).await? {
                if points.is_complete() {
                    weeks.insert(week, points);
                    continue;
                }
            }

            let stats = self
                .team_week_stats(session, team_id, week)
                .await
                .map_err(|e| AppError::IncompleteSeason {
                    failed_week: week,
                    source: Box::new(e),
                })?;
            let points = WeekPoints {
                expected_points: stats.projected_points,
                final_points: stats.final_points,
            };

            self.store
                .save_team_week_points(team_id, week, &points)
                .await
                .map_err(|e| AppError::IncompleteSeason {
                    failed_week: week,
                    source: Box::new(e),
                })?;
            weeks.insert(week, points);
        }

        self.cache.set(team_id, ops::WEEKLY_STATS, &weeks).await?;
        Ok(weeks)
    }

    /// Matchups, team stats and stat winners of a team, stored together.
    pub async fn team_matchups(&self, session: &str, team_id: &str) -> Result<MatchupSet> {
        let tree = self
            .sessions
            .fantasy_get(session, &format!("team/{}/matchups", team_id))
            .await?;
        let set = mapper::map_team_matchups(&tree)?;

        self.store.save_team_matchups(&set).await?;
        Ok(set)
    }

    // ─── Players ─────────────────────────────────────────────────────────────

    /// Season stats of a player, reused until the morning after the
    /// player's team next plays.
    pub async fn player_stats(&self, session: &str, player_key: &str) -> Result<Player> {
        let now = Utc::now();
        if let Some(player) = self
            .cache
            .get::<Player>(player_key, ops::PLAYER_STATS)
            .await?
        {
            if player.next_update.is_some_and(|next| now < next) {
                return Ok(player);
            }
            tracing::debug!(player_key, "Cached player stats past next update");
        }

        if let Some(player) = self.store.player(player_key).await? {
            if player.next_update.is_some_and(|next| now < next) {
                return Ok(player);
            }
        }

        let tree = self
            .sessions
            .fantasy_get(session, &format!("player/{}/stats;type=season", player_key))
            .await?;
        let mut player = mapper::map_player(&tree)?;

        let next_game = self.nhl.next_game(&player.team_abbreviation).await?;
        player.next_update = Some(morning_after(next_game.start_time_utc));

        self.store.save_player(&player).await?;
        self.cache.set(player_key, ops::PLAYER_STATS, &player).await?;

        tracing::debug!(
            player_key,
            next_update = ?player.next_update,
            "Player stats refreshed from upstream"
        );
        Ok(player)
    }

    /// Season, recent and projected ranks of a player within a league.
    pub async fn player_ranks(
        &self,
        session: &str,
        league_id: &str,
        player_key: &str,
    ) -> Result<Vec<PlayerRank>> {
        let path = format!(
            "leagues;league_keys={}/players;player_keys={};out=ranks;ranks={}",
            league_id, player_key, RANK_TYPES
        );
        let tree = self.sessions.fantasy_get(session, &path).await?;
        mapper::map_to_rank(&tree)
    }

    /// Page through the game's whole player universe and store it.
    pub async fn all_yahoo_players(&self, session: &str) -> Result<Vec<YahooPlayer>> {
        let mut players = Vec::new();
        let mut start = 0;

        loop {
            let path = format!(
                "game/{}/players?start={}&count={}",
                self.game_key, start, PLAYERS_PAGE_SIZE
            );
            let tree = self.sessions.fantasy_get(session, &path).await?;
            let page = mapper::map_yahoo_players(&tree)?;
            if page.is_empty() {
                break;
            }

            tracing::debug!(start, count = page.len(), "Fetched player page");
            players.extend(page);
            start += PLAYERS_PAGE_SIZE;
            tokio::time::sleep(self.pagination_delay).await;
        }

        self.store.save_yahoo_players(&players).await?;
        tracing::info!(players = players.len(), "Player universe stored");
        Ok(players)
    }

    /// A player's season stats scored with a league's modifiers.
    pub async fn league_player_points(
        &self,
        session: &str,
        league_id: &str,
        player_key: &str,
    ) -> Result<PlayerPoints> {
        let cache_id = format!("{}-{}", player_key, league_id);
        if let Some(points) = self.cache.get(&cache_id, ops::LEAGUE_PLAYER_POINTS).await? {
            return Ok(points);
        }

        let league = self.get_league_settings(session, league_id).await?;
        let player = self.player_stats(session, player_key).await?;
        let points = scoring::apply_modifiers(&league.stat_modifiers, player)?;

        self.cache
            .set(&cache_id, ops::LEAGUE_PLAYER_POINTS, &points)
            .await?;
        Ok(points)
    }
}
