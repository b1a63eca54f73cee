// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! League scoring: stat modifiers applied to a player's season stats.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::models::{Player, PlayerPoints, StatModifier};

/// Weight each modified stat and total the fantasy points.
///
/// Modified stats are rewritten with two decimals. Stats without a modifier
/// are left as reported. Blank (`""`, `"-"`) values score zero.
pub fn apply_modifiers(modifiers: &[StatModifier], mut player: Player) -> Result<PlayerPoints> {
    let weights: HashMap<&str, f64> = modifiers
        .iter()
        .map(|m| (m.stat_id.as_str(), m.value))
        .collect();

    let mut total_points = 0.0;
    for stat in &mut player.stats {
        let Some(weight) = weights.get(stat.stat_id.as_str()) else {
            continue;
        };

        let raw = stat.value.trim();
        let value: f64 = match raw {
            "" | "-" => 0.0,
            _ => raw.parse().map_err(|_| {
                AppError::Mapping(format!(
                    "unparseable value '{}' for stat {}",
                    stat.value, stat.stat_id
                ))
            })?,
        };

        let adjusted = value * weight;
        stat.value = format!("{:.2}", adjusted);
        total_points += adjusted;
    }

    Ok(PlayerPoints {
        player,
        total_points,
    })
}
