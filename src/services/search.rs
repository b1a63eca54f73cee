// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Player lookup by display name across both identifier spaces.

use std::sync::Arc;

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::PlayerDetails;
use crate::services::fantasy::FantasyService;

#[derive(Clone)]
pub struct SearchService {
    fantasy: FantasyService,
    store: Arc<dyn Store>,
}

impl SearchService {
    pub fn new(fantasy: FantasyService, store: Arc<dyn Store>) -> Self {
        Self { fantasy, store }
    }

    /// Stats-side bio merged with fantasy positions and stats.
    pub async fn player_by_name(&self, session: &str, name: &str) -> Result<PlayerDetails> {
        let mapping = self
            .store
            .mapping_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No player mapped for name: {}", name)))?;

        let player = self
            .fantasy
            .player_stats(session, &mapping.yahoo_player_id)
            .await?;

        let nhl_id: i64 = mapping.nhl_player_id.parse().map_err(|_| {
            AppError::Mapping(format!("invalid stats player id: {}", mapping.nhl_player_id))
        })?;
        let bio = self
            .store
            .nhl_player(nhl_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Stats player {}", nhl_id)))?;

        Ok(PlayerDetails {
            player: bio,
            yahoo_player_id: mapping.yahoo_player_id,
            eligible_positions: player.eligible_positions,
            stats: player.stats,
            advanced_stats: player.advanced_stats,
        })
    }
}
