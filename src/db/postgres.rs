// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Postgres store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;

use super::{Store, StoredLeague};
use crate::error::{AppError, Result};
use crate::models::{
    LeagueTeam, MatchupSet, NhlPlayer, Player, PlayerGameStat, PlayerIdMapping, ScheduleGame,
    WeekPoints, YahooPlayer,
};

/// Connection pool plus the queries backing [`Store`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect with retry and exponential backoff.
    pub async fn connect(url: &str, max_retries: u32) -> anyhow::Result<Self> {
        let mut attempt = 0;
        loop {
            let result = PgPoolOptions::new()
                .max_connections(10)
                .acquire_timeout(Duration::from_secs(10))
                .connect(url)
                .await;
            match result {
                Ok(pool) => {
                    tracing::info!("Connected to Postgres");
                    return Ok(Self { pool });
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries {
                        return Err(anyhow::anyhow!(
                            "Failed to connect to Postgres after {} attempts: {}",
                            max_retries,
                            e
                        ));
                    }
                    tracing::warn!(attempt, error = %e, "Postgres connection failed, retrying");
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempt))).await;
                }
            }
        }
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn save_refresh_token(&self, user_id: &str, token: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO refresh_tokens (user_id, refresh_token, updated_at)
             VALUES ($1, $2, now())
             ON CONFLICT (user_id)
             DO UPDATE SET refresh_token = EXCLUDED.refresh_token, updated_at = now()",
        )
        .bind(user_id)
        .bind(token)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn refresh_token(&self, user_id: &str) -> Result<Option<String>> {
        let token: Option<(String,)> =
            sqlx::query_as("SELECT refresh_token FROM refresh_tokens WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(token.map(|(t,)| t))
    }

    async fn save_league_settings(&self, league_id: &str, settings: &Value) -> Result<()> {
        sqlx::query(
            "INSERT INTO leagues (league_id, settings, last_updated)
             VALUES ($1, $2, now())
             ON CONFLICT (league_id)
             DO UPDATE SET settings = EXCLUDED.settings, last_updated = now()",
        )
        .bind(league_id)
        .bind(Json(settings))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn league_settings(&self, league_id: &str) -> Result<Option<StoredLeague>> {
        let row: Option<(Json<Value>, DateTime<Utc>)> =
            sqlx::query_as("SELECT settings, last_updated FROM leagues WHERE league_id = $1")
                .bind(league_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(Json(settings), last_updated)| StoredLeague {
            settings,
            last_updated,
        }))
    }

    async fn save_league_teams(&self, teams: &[LeagueTeam]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for team in teams {
            sqlx::query(
                "INSERT INTO league_teams (team_id, league_id, name, logo)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (team_id)
                 DO UPDATE SET league_id = EXCLUDED.league_id, name = EXCLUDED.name,
                               logo = EXCLUDED.logo",
            )
            .bind(&team.team_id)
            .bind(&team.league_id)
            .bind(&team.name)
            .bind(&team.logo)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn league_teams(&self, league_id: &str) -> Result<Vec<LeagueTeam>> {
        Ok(sqlx::query_as::<_, LeagueTeam>(
            "SELECT team_id, league_id, name, logo FROM league_teams
             WHERE league_id = $1 ORDER BY team_id",
        )
        .bind(league_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn save_player(&self, player: &Player) -> Result<()> {
        sqlx::query(
            "INSERT INTO players (player_key, player_id, full_name, team_abbr, data, next_update)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (player_key)
             DO UPDATE SET player_id = EXCLUDED.player_id, full_name = EXCLUDED.full_name,
                           team_abbr = EXCLUDED.team_abbr, data = EXCLUDED.data,
                           next_update = EXCLUDED.next_update",
        )
        .bind(&player.player_key)
        .bind(&player.player_id)
        .bind(&player.name.full)
        .bind(&player.team_abbreviation)
        .bind(Json(player))
        .bind(player.next_update)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn player(&self, player_key: &str) -> Result<Option<Player>> {
        let row: Option<(Json<Player>, Option<DateTime<Utc>>)> =
            sqlx::query_as("SELECT data, next_update FROM players WHERE player_key = $1")
                .bind(player_key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(Json(mut player), next_update)| {
            player.next_update = next_update;
            player
        }))
    }

    async fn save_yahoo_players(&self, players: &[YahooPlayer]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for player in players {
            sqlx::query(
                "INSERT INTO yahoo_players (id, full_name, team_name, headshot_url)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(&player.id)
            .bind(&player.full_name)
            .bind(&player.team_name)
            .bind(&player.headshot_url)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn yahoo_players(&self) -> Result<Vec<YahooPlayer>> {
        Ok(sqlx::query_as::<_, YahooPlayer>(
            "SELECT id, full_name, team_name, headshot_url FROM yahoo_players ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn save_nhl_players(&self, players: &[NhlPlayer]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for p in players {
            sqlx::query(
                "INSERT INTO nhl_players (id, headshot, first_name, last_name, sweater_number,
                     position_code, shoots_catches, height_in_inches, weight_in_pounds,
                     height_in_cm, weight_in_kg, birth_date, birth_city, birth_country,
                     birth_state, team)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(p.id)
            .bind(&p.headshot)
            .bind(&p.first_name)
            .bind(&p.last_name)
            .bind(p.sweater_number)
            .bind(&p.position_code)
            .bind(&p.shoots_catches)
            .bind(p.height_in_inches)
            .bind(p.weight_in_pounds)
            .bind(p.height_in_cm)
            .bind(p.weight_in_kg)
            .bind(&p.birth_date)
            .bind(&p.birth_city)
            .bind(&p.birth_country)
            .bind(&p.birth_state)
            .bind(&p.team)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn nhl_players(&self) -> Result<Vec<NhlPlayer>> {
        Ok(
            sqlx::query_as::<_, NhlPlayer>("SELECT * FROM nhl_players ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn nhl_player(&self, id: i64) -> Result<Option<NhlPlayer>> {
        Ok(
            sqlx::query_as::<_, NhlPlayer>("SELECT * FROM nhl_players WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_player_mappings(&self, mappings: &[PlayerIdMapping]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for m in mappings {
            sqlx::query(
                "INSERT INTO player_id_mappings (yahoo_player_id, nhl_player_id, player_name, team_abbr)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(&m.yahoo_player_id)
            .bind(&m.nhl_player_id)
            .bind(&m.player_name)
            .bind(&m.team_abbr)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn mapping_by_name(&self, name: &str) -> Result<Option<PlayerIdMapping>> {
        Ok(sqlx::query_as::<_, PlayerIdMapping>(
            "SELECT yahoo_player_id, nhl_player_id, player_name, team_abbr
             FROM player_id_mappings WHERE player_name = $1 ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn save_player_game_stats(&self, stats: &[PlayerGameStat]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for s in stats {
            sqlx::query(
                "INSERT INTO player_game_stats (player_id, game_id, team_abbrev, home_road_flag,
                     game_date, goals, assists, points, plus_minus, power_play_goals,
                     power_play_points, game_winning_goals, ot_goals, shots, shifts,
                     shorthanded_goals, shorthanded_points, opponent_abbrev, pim, toi, team,
                     opponent)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                         $16, $17, $18, $19, $20, $21, $22)
                 ON CONFLICT (player_id, game_id) DO NOTHING",
            )
            .bind(&s.player_id)
            .bind(&s.game_id)
            .bind(&s.team_abbrev)
            .bind(&s.home_road_flag)
            .bind(&s.game_date)
            .bind(s.goals)
            .bind(s.assists)
            .bind(s.points)
            .bind(s.plus_minus)
            .bind(s.power_play_goals)
            .bind(s.power_play_points)
            .bind(s.game_winning_goals)
            .bind(s.ot_goals)
            .bind(s.shots)
            .bind(s.shifts)
            .bind(s.shorthanded_goals)
            .bind(s.shorthanded_points)
            .bind(&s.opponent_abbrev)
            .bind(s.pim)
            .bind(&s.toi)
            .bind(&s.team)
            .bind(&s.opponent)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn save_schedule_game(&self, game: &ScheduleGame) -> Result<()> {
        sqlx::query(
            "INSERT INTO schedule_games (id, season, game_type, game_date, start_time_utc,
                 home_team_abbrev, away_team_abbrev)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(game.id)
        .bind(game.season)
        .bind(game.game_type)
        .bind(&game.game_date)
        .bind(game.start_time_utc)
        .bind(&game.home_team_abbrev)
        .bind(&game.away_team_abbrev)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn next_game_for_team(
        &self,
        abbrev: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ScheduleGame>> {
        Ok(sqlx::query_as::<_, ScheduleGame>(
            "SELECT id, season, game_type, game_date, start_time_utc,
                    home_team_abbrev, away_team_abbrev
             FROM schedule_games
             WHERE (home_team_abbrev = $1 OR away_team_abbrev = $1) AND start_time_utc > $2
             ORDER BY start_time_utc
             LIMIT 1",
        )
        .bind(abbrev)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn save_team_matchups(&self, set: &MatchupSet) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for m in &set.matchups {
            sqlx::query(
                "INSERT INTO matchups (matchup_key, week, winning_team, losing_team)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (matchup_key)
                 DO UPDATE SET week = EXCLUDED.week, winning_team = EXCLUDED.winning_team,
                               losing_team = EXCLUDED.losing_team",
            )
            .bind(&m.matchup_key)
            .bind(&m.week)
            .bind(&m.winning_team)
            .bind(&m.losing_team)
            .execute(&mut *tx)
            .await?;
        }

        for s in &set.team_stats {
            sqlx::query(
                "INSERT INTO team_weekly_stats (id, team_key, week, stats, points)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (id)
                 DO UPDATE SET stats = EXCLUDED.stats, points = EXCLUDED.points",
            )
            .bind(&s.id)
            .bind(&s.team_key)
            .bind(&s.week)
            .bind(Json(&s.stats))
            .bind(s.points)
            .execute(&mut *tx)
            .await?;
        }

        for w in &set.stat_winners {
            sqlx::query(
                "INSERT INTO stat_winner_weekly_matchups
                     (matchup_key, stat_id, week, winning_team_key, is_tied)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (matchup_key, stat_id)
                 DO UPDATE SET winning_team_key = EXCLUDED.winning_team_key,
                               is_tied = EXCLUDED.is_tied",
            )
            .bind(&w.matchup_key)
            .bind(&w.stat_id)
            .bind(&w.week)
            .bind(&w.winning_team_key)
            .bind(w.is_tied)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(
            matchups = set.matchups.len(),
            team_stats = set.team_stats.len(),
            stat_winners = set.stat_winners.len(),
            "Saved team matchups"
        );
        Ok(())
    }

    async fn team_week_points(&self, team_key: &str, week: u32) -> Result<Option<WeekPoints>> {
        let week = week_column(week)?;
        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT projected_points, final_points FROM team_week_points
             WHERE team_key = $1 AND week = $2",
        )
        .bind(team_key)
        .bind(week)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(expected_points, final_points)| WeekPoints {
            expected_points,
            final_points,
        }))
    }

    async fn save_team_week_points(
        &self,
        team_key: &str,
        week: u32,
        points: &WeekPoints,
    ) -> Result<()> {
        let week = week_column(week)?;
        sqlx::query(
            "INSERT INTO team_week_points (team_key, week, projected_points, final_points)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (team_key, week)
             DO UPDATE SET projected_points = EXCLUDED.projected_points,
                           final_points = EXCLUDED.final_points",
        )
        .bind(team_key)
        .bind(week)
        .bind(&points.expected_points)
        .bind(&points.final_points)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn week_column(week: u32) -> Result<i32> {
    i32::try_from(week).map_err(|_| AppError::BadRequest(format!("week out of range: {}", week)))
}
