// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fantasy-side player records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NhlPlayer;

/// Fantasy player with season stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: String,
    pub player_key: String,
    pub name: PlayerName,
    pub team_full_name: String,
    pub team_abbreviation: String,
    pub team_url: String,
    pub uniform_number: String,
    pub display_position: String,
    pub headshot_url: String,
    pub image_url: String,
    pub is_undroppable: bool,
    pub position_type: String,
    pub eligible_positions: Vec<String>,
    pub has_player_notes: bool,
    pub has_recent_player_notes: bool,
    pub player_notes_last_timestamp: i64,
    pub stats: Vec<Stat>,
    pub advanced_stats: Vec<Stat>,
    /// Stored stats are reused until this instant passes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_update: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerName {
    pub full: String,
    pub first: String,
    pub last: String,
    pub ascii_first: String,
    pub ascii_last: String,
}

/// Raw stat value as reported upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub stat_id: String,
    pub value: String,
}

/// One ranking of a player (season, last 7 days, projections...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRank {
    pub rank_type: String,
    pub rank_value: i64,
    pub rank_season: String,
}

/// Entry of the fantasy player universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct YahooPlayer {
    /// Player key
    pub id: String,
    pub full_name: String,
    pub team_name: String,
    pub headshot_url: String,
}

/// Player bio merged with fantasy stats.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerDetails {
    pub player: NhlPlayer,
    pub yahoo_player_id: String,
    pub eligible_positions: Vec<String>,
    pub stats: Vec<Stat>,
    pub advanced_stats: Vec<Stat>,
}

/// Player stats weighted by a league's stat modifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPoints {
    pub player: Player,
    pub total_points: f64,
}
