// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store for local runs and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Store, StoredLeague};
use crate::error::Result;
use crate::models::{
    LeagueTeam, Matchup, MatchupSet, NhlPlayer, Player, PlayerGameStat, PlayerIdMapping,
    ScheduleGame, StatWinnerWeeklyMatchup, TeamWeeklyStats, WeekPoints, YahooPlayer,
};

/// DashMap-backed [`Store`]; same semantics as the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    refresh_tokens: DashMap<String, String>,
    leagues: DashMap<String, StoredLeague>,
    league_teams: DashMap<String, LeagueTeam>,
    players: DashMap<String, Player>,
    yahoo_players: DashMap<String, YahooPlayer>,
    nhl_players: DashMap<i64, NhlPlayer>,
    mappings: RwLock<Vec<PlayerIdMapping>>,
    game_stats: DashMap<(String, String), PlayerGameStat>,
    schedule: DashMap<i64, ScheduleGame>,
    matchups: DashMap<String, Matchup>,
    team_stats: DashMap<String, TeamWeeklyStats>,
    stat_winners: DashMap<(String, String), StatWinnerWeeklyMatchup>,
    week_points: DashMap<(String, u32), WeekPoints>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store league settings with an explicit timestamp.
    pub fn put_league_settings_at(
        &self,
        league_id: &str,
        settings: Value,
        last_updated: DateTime<Utc>,
    ) {
        self.leagues.insert(
            league_id.to_string(),
            StoredLeague {
                settings,
                last_updated,
            },
        );
    }

    pub fn matchup_count(&self) -> usize {
        self.matchups.len()
    }

    pub fn game_stat_count(&self) -> usize {
        self.game_stats.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn save_refresh_token(&self, user_id: &str, token: &str) -> Result<()> {
        self.refresh_tokens
            .insert(user_id.to_string(), token.to_string());
        Ok(())
    }

    async fn refresh_token(&self, user_id: &str) -> Result<Option<String>> {
        Ok(self.refresh_tokens.get(user_id).map(|t| t.clone()))
    }

    async fn save_league_settings(&self, league_id: &str, settings: &Value) -> Result<()> {
        self.put_league_settings_at(league_id, settings.clone(), Utc::now());
        Ok(())
    }

    async fn league_settings(&self, league_id: &str) -> Result<Option<StoredLeague>> {
        Ok(self.leagues.get(league_id).map(|l| l.clone()))
    }

    async fn save_league_teams(&self, teams: &[LeagueTeam]) -> Result<()> {
        for team in teams {
            self.league_teams.insert(team.team_id.clone(), team.clone());
        }
        Ok(())
    }

    async fn league_teams(&self, league_id: &str) -> Result<Vec<LeagueTeam>> {
        let mut teams: Vec<LeagueTeam> = self
            .league_teams
            .iter()
            .filter(|t| t.league_id == league_id)
            .map(|t| t.clone())
            .collect();
        teams.sort_by(|a, b| a.team_id.cmp(&b.team_id));
        Ok(teams)
    }

    async fn save_player(&self, player: &Player) -> Result<()> {
        self.players
            .insert(player.player_key.clone(), player.clone());
        Ok(())
    }

    async fn player(&self, player_key: &str) -> Result<Option<Player>> {
        Ok(self.players.get(player_key).map(|p| p.clone()))
    }

    async fn save_yahoo_players(&self, players: &[YahooPlayer]) -> Result<()> {
        for player in players {
            self.yahoo_players
                .entry(player.id.clone())
                .or_insert_with(|| player.clone());
        }
        Ok(())
    }

    async fn yahoo_players(&self) -> Result<Vec<YahooPlayer>> {
        let mut players: Vec<YahooPlayer> = self.yahoo_players.iter().map(|p| p.clone()).collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(players)
    }

    async fn save_nhl_players(&self, players: &[NhlPlayer]) -> Result<()> {
        for player in players {
            self.nhl_players
                .entry(player.id)
                .or_insert_with(|| player.clone());
        }
        Ok(())
    }

    async fn nhl_players(&self) -> Result<Vec<NhlPlayer>> {
        let mut players: Vec<NhlPlayer> = self.nhl_players.iter().map(|p| p.clone()).collect();
        players.sort_by_key(|p| p.id);
        Ok(players)
    }

    async fn nhl_player(&self, id: i64) -> Result<Option<NhlPlayer>> {
        Ok(self.nhl_players.get(&id).map(|p| p.clone()))
    }

    async fn insert_player_mappings(&self, mappings: &[PlayerIdMapping]) -> Result<()> {
        self.mappings.write().await.extend_from_slice(mappings);
        Ok(())
    }

    async fn mapping_by_name(&self, name: &str) -> Result<Option<PlayerIdMapping>> {
        Ok(self
            .mappings
            .read()
            .await
            .iter()
            .find(|m| m.player_name == name)
            .cloned())
    }

    async fn save_player_game_stats(&self, stats: &[PlayerGameStat]) -> Result<()> {
        for stat in stats {
            self.game_stats
                .entry((stat.player_id.clone(), stat.game_id.clone()))
                .or_insert_with(|| stat.clone());
        }
        Ok(())
    }

    async fn save_schedule_game(&self, game: &ScheduleGame) -> Result<()> {
        self.schedule.entry(game.id).or_insert_with(|| game.clone());
        Ok(())
    }

    async fn next_game_for_team(
        &self,
        abbrev: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ScheduleGame>> {
        Ok(self
            .schedule
            .iter()
            .filter(|g| g.home_team_abbrev == abbrev || g.away_team_abbrev == abbrev)
            .filter(|g| g.start_time_utc > now)
            .min_by_key(|g| g.start_time_utc)
            .map(|g| g.clone()))
    }

    async fn save_team_matchups(&self, set: &MatchupSet) -> Result<()> {
        for m in &set.matchups {
            self.matchups.insert(m.matchup_key.clone(), m.clone());
        }
        for s in &set.team_stats {
            self.team_stats.insert(s.id.clone(), s.clone());
        }
        for w in &set.stat_winners {
            self.stat_winners
                .insert((w.matchup_key.clone(), w.stat_id.clone()), w.clone());
        }
        Ok(())
    }

    async fn team_week_points(&self, team_key: &str, week: u32) -> Result<Option<WeekPoints>> {
        Ok(self
            .week_points
            .get(&(team_key.to_string(), week))
            .map(|p| p.clone()))
    }

    async fn save_team_week_points(
        &self,
        team_key: &str,
        week: u32,
        points: &WeekPoints,
    ) -> Result<()> {
        self.week_points
            .insert((team_key.to_string(), week), points.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: i64, start: &str, home: &str, away: &str) -> ScheduleGame {
        ScheduleGame {
            id,
            season: 20242025,
            game_type: 2,
            game_date: start[..10].to_string(),
            start_time_utc: start.parse().unwrap(),
            home_team_abbrev: home.to_string(),
            away_team_abbrev: away.to_string(),
        }
    }

    #[tokio::test]
    async fn test_next_game_picks_earliest_future() {
        let store = MemoryStore::new();
        let now: DateTime<Utc> = "2024-10-15T00:00:00Z".parse().unwrap();
        store.save_schedule_game(&game(1, "2024-10-10T23:00:00Z", "EDM", "CGY")).await.unwrap();
        store.save_schedule_game(&game(3, "2024-10-20T23:00:00Z", "VAN", "EDM")).await.unwrap();
        store.save_schedule_game(&game(2, "2024-10-17T23:00:00Z", "EDM", "TOR")).await.unwrap();
        store.save_schedule_game(&game(4, "2024-10-16T23:00:00Z", "TOR", "MTL")).await.unwrap();

        let next = store.next_game_for_team("EDM", now).await.unwrap().unwrap();
        assert_eq!(next.id, 2);
        assert!(store.next_game_for_team("SEA", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_schedule_is_insert_if_absent() {
        let store = MemoryStore::new();
        let now: DateTime<Utc> = "2024-10-01T00:00:00Z".parse().unwrap();
        store.save_schedule_game(&game(1, "2024-10-10T23:00:00Z", "EDM", "CGY")).await.unwrap();
        store.save_schedule_game(&game(1, "2024-10-12T23:00:00Z", "EDM", "CGY")).await.unwrap();

        let next = store.next_game_for_team("EDM", now).await.unwrap().unwrap();
        assert_eq!(next.game_date, "2024-10-10");
    }

    #[tokio::test]
    async fn test_mappings_accumulate_duplicates() {
        let store = MemoryStore::new();
        let mapping = PlayerIdMapping {
            yahoo_player_id: "453.p.6743".into(),
            nhl_player_id: "8478402".into(),
            player_name: "Connor McDavid".into(),
            team_abbr: "Edmonton Oilers".into(),
        };
        store.insert_player_mappings(&[mapping.clone()]).await.unwrap();
        store.insert_player_mappings(&[mapping.clone()]).await.unwrap();

        assert_eq!(store.mappings.read().await.len(), 2);
        assert_eq!(
            store.mapping_by_name("Connor McDavid").await.unwrap(),
            Some(mapping)
        );
    }
}
