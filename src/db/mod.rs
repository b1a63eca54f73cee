// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer.
//!
//! [`Store`] is implemented by [`PgStore`] (Postgres) and [`MemoryStore`]
//! (local runs and tests). Writes are idempotent upserts keyed by natural
//! keys, except player id mappings which are insert-only.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::Result;
use crate::models::{
    LeagueTeam, MatchupSet, NhlPlayer, Player, PlayerGameStat, PlayerIdMapping, ScheduleGame,
    WeekPoints, YahooPlayer,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Raw league settings payload and when it was stored.
#[derive(Debug, Clone)]
pub struct StoredLeague {
    pub settings: Value,
    pub last_updated: DateTime<Utc>,
}

#[async_trait]
pub trait Store: Send + Sync {
    // ─── Tokens ──────────────────────────────────────────────────────────
    async fn save_refresh_token(&self, user_id: &str, token: &str) -> Result<()>;
    async fn refresh_token(&self, user_id: &str) -> Result<Option<String>>;

    // ─── Leagues ─────────────────────────────────────────────────────────
    /// Overwrite the stored payload and reset `last_updated`.
    async fn save_league_settings(&self, league_id: &str, settings: &Value) -> Result<()>;
    async fn league_settings(&self, league_id: &str) -> Result<Option<StoredLeague>>;
    async fn save_league_teams(&self, teams: &[LeagueTeam]) -> Result<()>;
    async fn league_teams(&self, league_id: &str) -> Result<Vec<LeagueTeam>>;

    // ─── Players ─────────────────────────────────────────────────────────
    async fn save_player(&self, player: &Player) -> Result<()>;
    async fn player(&self, player_key: &str) -> Result<Option<Player>>;
    /// Insert-if-absent by player key.
    async fn save_yahoo_players(&self, players: &[YahooPlayer]) -> Result<()>;
    async fn yahoo_players(&self) -> Result<Vec<YahooPlayer>>;
    /// Insert-if-absent by id.
    async fn save_nhl_players(&self, players: &[NhlPlayer]) -> Result<()>;
    async fn nhl_players(&self) -> Result<Vec<NhlPlayer>>;
    async fn nhl_player(&self, id: i64) -> Result<Option<NhlPlayer>>;
    async fn insert_player_mappings(&self, mappings: &[PlayerIdMapping]) -> Result<()>;
    /// First mapping stored under this exact name.
    async fn mapping_by_name(&self, name: &str) -> Result<Option<PlayerIdMapping>>;
    /// Insert-if-absent by (player, game).
    async fn save_player_game_stats(&self, stats: &[PlayerGameStat]) -> Result<()>;

    // ─── Schedule ────────────────────────────────────────────────────────
    /// Insert-if-absent by game id.
    async fn save_schedule_game(&self, game: &ScheduleGame) -> Result<()>;
    /// Earliest game involving `abbrev` that starts after `now`.
    async fn next_game_for_team(
        &self,
        abbrev: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ScheduleGame>>;

    // ─── Matchups ────────────────────────────────────────────────────────
    /// Upsert matchups, team stats and stat winners together.
    async fn save_team_matchups(&self, set: &MatchupSet) -> Result<()>;
    async fn team_week_points(&self, team_key: &str, week: u32) -> Result<Option<WeekPoints>>;
    async fn save_team_week_points(
        &self,
        team_key: &str,
        week: u32,
        points: &WeekPoints,
    ) -> Result<()>;
}
