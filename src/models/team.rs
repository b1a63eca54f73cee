// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fantasy team weekly snapshot.

use serde::{Deserialize, Serialize};

/// A team's figures for one scoring week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamWeek {
    pub team_key: String,
    pub team_id: String,
    pub name: String,
    pub url: String,
    pub logo_url: String,
    pub waiver_priority: i32,
    pub number_of_moves: i32,
    pub number_of_trades: i32,
    pub league_scoring_type: String,
    pub draft_position: i32,
    pub projected_points: String,
    pub final_points: String,
    pub remaining_games: i32,
    pub completed_games: i32,
}

/// Projected vs final points for a week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPoints {
    pub expected_points: String,
    pub final_points: String,
}

impl WeekPoints {
    /// Both figures are settled.
    pub fn is_complete(&self) -> bool {
        !self.expected_points.is_empty() && !self.final_points.is_empty()
    }
}
