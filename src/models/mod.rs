// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod league;
pub mod matchup;
pub mod nhl;
pub mod player;
pub mod session;
pub mod team;

use serde::Serialize;

pub use league::{League, LeagueSetting, LeagueTeam, RosterPosition, StatModifier};
pub use matchup::{Matchup, MatchupSet, StatWinnerWeeklyMatchup, TeamWeeklyStats};
pub use nhl::{NhlPlayer, PlayerGameStat, PlayerIdMapping, ScheduleGame};
pub use player::{
    Player, PlayerDetails, PlayerName, PlayerPoints, PlayerRank, Stat, YahooPlayer,
};
pub use session::Session;
pub use team::{TeamWeek, WeekPoints};

/// Uniform response envelope for every API reply.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T = serde_json::Value> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<T>,
}

impl<T> Envelope<T> {
    /// 200 envelope carrying a result.
    pub fn ok(message: impl Into<String>, details: T) -> Self {
        Self {
            code: 200,
            message: message.into(),
            details: Some(details),
        }
    }
}
