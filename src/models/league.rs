// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! League settings and membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fantasy league with its scoring rules and roster composition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub league_id: String,
    pub league_key: String,
    pub name: String,
    pub url: String,
    pub logo_url: String,
    pub draft_status: String,
    pub num_teams: i32,
    pub weekly_deadline: String,
    pub league_update_timestamp: i64,
    pub scoring_type: String,
    pub league_type: String,
    pub felo_tier: String,
    pub allow_add_to_dl_extra_pos: bool,
    pub is_pro_league: bool,
    pub is_cash_league: bool,
    pub is_plus_league: bool,
    pub current_week: i32,
    pub start_week: i32,
    pub start_date: DateTime<Utc>,
    pub end_week: i32,
    pub end_date: DateTime<Utc>,
    pub game_code: String,
    pub season: String,
    pub roster_positions: Vec<RosterPosition>,
    pub stat_modifiers: Vec<StatModifier>,
    /// When the stored copy was written. Unset for freshly mapped payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// One roster slot type (e.g. two `C` starting slots).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPosition {
    pub position: String,
    pub position_type: String,
    pub count: i32,
    pub is_starting_position: bool,
}

/// Points awarded per unit of a stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    pub stat_id: String,
    pub value: f64,
    /// Display name joined from the league's stat categories; empty if unknown.
    pub stat_name: String,
}

/// Team membership row for a league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeagueTeam {
    pub team_id: String,
    pub league_id: String,
    pub name: String,
    pub logo: String,
}

/// Individually addressable league settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueSetting {
    LeagueId,
    LeagueKey,
    Name,
    NumTeams,
    ScoringType,
    LeagueType,
    CurrentWeek,
    StartWeek,
    EndWeek,
    Season,
    GameCode,
    WeeklyDeadline,
}

impl LeagueSetting {
    /// Read this setting from a league, rendered as a string.
    pub fn read(self, league: &League) -> String {
        match self {
            LeagueSetting::LeagueId => league.league_id.clone(),
            LeagueSetting::LeagueKey => league.league_key.clone(),
            LeagueSetting::Name => league.name.clone(),
            LeagueSetting::NumTeams => league.num_teams.to_string(),
            LeagueSetting::ScoringType => league.scoring_type.clone(),
            LeagueSetting::LeagueType => league.league_type.clone(),
            LeagueSetting::CurrentWeek => league.current_week.to_string(),
            LeagueSetting::StartWeek => league.start_week.to_string(),
            LeagueSetting::EndWeek => league.end_week.to_string(),
            LeagueSetting::Season => league.season.clone(),
            LeagueSetting::GameCode => league.game_code.clone(),
            LeagueSetting::WeeklyDeadline => league.weekly_deadline.clone(),
        }
    }
}

impl std::str::FromStr for LeagueSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let setting = match s {
            "LeagueID" | "league_id" => LeagueSetting::LeagueId,
            "LeagueKey" | "league_key" => LeagueSetting::LeagueKey,
            "Name" | "name" => LeagueSetting::Name,
            "NumTeams" | "num_teams" => LeagueSetting::NumTeams,
            "ScoringType" | "scoring_type" => LeagueSetting::ScoringType,
            "LeagueType" | "league_type" => LeagueSetting::LeagueType,
            "CurrentWeek" | "current_week" => LeagueSetting::CurrentWeek,
            "StartWeek" | "start_week" => LeagueSetting::StartWeek,
            "EndWeek" | "end_week" => LeagueSetting::EndWeek,
            "Season" | "season" => LeagueSetting::Season,
            "GameCode" | "game_code" => LeagueSetting::GameCode,
            "WeeklyDeadline" | "weekly_deadline" => LeagueSetting::WeeklyDeadline,
            other => return Err(format!("unknown league setting: {}", other)),
        };
        Ok(setting)
    }
}
