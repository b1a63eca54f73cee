// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Records from the public stats API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct NhlPlayer {
    pub id: i64,
    pub headshot: String,
    pub first_name: String,
    pub last_name: String,
    pub sweater_number: i32,
    pub position_code: String,
    pub shoots_catches: String,
    pub height_in_inches: i32,
    pub weight_in_pounds: i32,
    pub height_in_cm: i32,
    pub weight_in_kg: i32,
    pub birth_date: String,
    pub birth_city: String,
    pub birth_country: String,
    pub birth_state: String,
    /// Club abbreviation the roster was fetched for
    pub team: String,
}

impl NhlPlayer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Scheduled game; immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScheduleGame {
    pub id: i64,
    pub season: i64,
    pub game_type: i32,
    pub game_date: String,
    pub start_time_utc: DateTime<Utc>,
    pub home_team_abbrev: String,
    pub away_team_abbrev: String,
}

/// One row of a player's game log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameStat {
    pub player_id: String,
    pub game_id: String,
    pub team_abbrev: String,
    pub home_road_flag: String,
    pub game_date: String,
    pub goals: i32,
    pub assists: i32,
    pub points: i32,
    pub plus_minus: i32,
    pub power_play_goals: i32,
    pub power_play_points: i32,
    pub game_winning_goals: i32,
    pub ot_goals: i32,
    pub shots: i32,
    pub shifts: i32,
    pub shorthanded_goals: i32,
    pub shorthanded_points: i32,
    pub opponent_abbrev: String,
    pub pim: i32,
    pub toi: String,
    pub team: String,
    pub opponent: String,
}

/// Link between the fantasy and stats identifier spaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlayerIdMapping {
    pub yahoo_player_id: String,
    pub nhl_player_id: String,
    pub player_name: String,
    pub team_abbr: String,
}
