// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Head-to-head matchup records.

use serde::{Deserialize, Serialize};

use super::Stat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub matchup_key: String,
    pub week: String,
    pub winning_team: String,
    pub losing_team: String,
}

/// One team's stat line within a matchup week. `id` is `{team_key}-{week}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamWeeklyStats {
    pub id: String,
    pub team_key: String,
    pub week: String,
    pub stats: Vec<Stat>,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatWinnerWeeklyMatchup {
    pub week: String,
    pub matchup_key: String,
    pub stat_id: String,
    pub winning_team_key: String,
    pub is_tied: bool,
}

/// Everything produced from one team-matchups payload; persisted together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupSet {
    pub matchups: Vec<Matchup>,
    pub team_stats: Vec<TeamWeeklyStats>,
    pub stat_winners: Vec<StatWinnerWeeklyMatchup>,
}

/// Order-independent key for a pairing in a given week.
pub fn matchup_key(team_a: &str, team_b: &str, week: &str) -> String {
    let (first, second) = if team_a <= team_b {
        (team_a, team_b)
    } else {
        (team_b, team_a)
    };
    format!("{}_{}_{}", first, second, week)
}
