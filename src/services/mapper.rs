// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Payload normalizer: generic payload trees to typed domain records.
//!
//! Every function takes a tree with the `fantasy_content` envelope already
//! removed (fantasy API) or the raw JSON body (stats API). A missing top
//! container is a [`AppError::Mapping`]; anything missing below it degrades
//! to a zero value or an empty list.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::matchup::matchup_key;
use crate::models::{
    League, LeagueTeam, Matchup, MatchupSet, NhlPlayer, Player, PlayerGameStat, PlayerName,
    PlayerRank, RosterPosition, ScheduleGame, Stat, StatModifier, StatWinnerWeeklyMatchup,
    TeamWeek, TeamWeeklyStats, YahooPlayer,
};
use crate::services::tree::{
    child, default_name, get_bool, get_float, get_int, get_string, num_f64, num_int, opt_str,
    parse_date, path, repeated, repeated_objects,
};

fn top<'a>(tree: &'a Value, key: &str) -> Result<&'a Value> {
    child(tree, key)
        .filter(|v| v.is_object())
        .ok_or_else(|| AppError::Mapping(format!("missing '{}' data", key)))
}

/// League key from a team key (`453.l.1234.t.5` -> `453.l.1234`).
pub fn league_key_for_team(team_key: &str) -> Result<String> {
    team_key
        .split_once(".t.")
        .map(|(league, _)| league.to_string())
        .filter(|league| !league.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("invalid team key: {}", team_key)))
}

// ─── Users / Leagues ─────────────────────────────────────────────────────────

/// Flatten every league of every game of the logged-in user.
///
/// Games and the leagues within each game keep source order.
pub fn extract_leagues(tree: &Value) -> Result<Vec<Value>> {
    let users = top(tree, "users")?;
    let user = repeated_objects(Some(users), "user")
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Mapping("missing 'user' data".to_string()))?;

    let games = repeated_objects(child(user, "games"), "game");
    let leagues = games
        .into_iter()
        .flat_map(|game| repeated_objects(child(game, "leagues"), "league"))
        .cloned()
        .collect();

    Ok(leagues)
}

/// GUID of the logged-in user.
pub fn map_user_guid(tree: &Value) -> Result<String> {
    let users = top(tree, "users")?;
    repeated_objects(Some(users), "user")
        .into_iter()
        .find_map(|user| opt_str(user, "guid").filter(|g| !g.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| AppError::Mapping("missing user guid".to_string()))
}

/// League with settings, roster positions and named stat modifiers.
pub fn map_to_league(tree: &Value) -> Result<League> {
    let data = top(tree, "league")?;

    let mut league = League {
        league_id: get_string(data, "league_id"),
        league_key: get_string(data, "league_key"),
        name: get_string(data, "name"),
        url: get_string(data, "url"),
        logo_url: get_string(data, "logo_url"),
        draft_status: get_string(data, "draft_status"),
        num_teams: get_int(data, "num_teams") as i32,
        weekly_deadline: get_string(data, "weekly_deadline"),
        league_update_timestamp: get_int(data, "league_update_timestamp"),
        scoring_type: get_string(data, "scoring_type"),
        league_type: get_string(data, "league_type"),
        felo_tier: get_string(data, "felo_tier"),
        allow_add_to_dl_extra_pos: get_bool(data, "allow_add_to_dl_extra_pos"),
        is_pro_league: get_bool(data, "is_pro_league"),
        is_cash_league: get_bool(data, "is_cash_league"),
        is_plus_league: get_bool(data, "is_plus_league"),
        current_week: get_int(data, "current_week") as i32,
        start_week: get_int(data, "start_week") as i32,
        start_date: parse_date(&get_string(data, "start_date")),
        end_week: get_int(data, "end_week") as i32,
        end_date: parse_date(&get_string(data, "end_date")),
        game_code: get_string(data, "game_code"),
        season: get_string(data, "season"),
        ..Default::default()
    };

    let Some(settings) = child(data, "settings") else {
        return Ok(league);
    };

    league.roster_positions = repeated_objects(child(settings, "roster_positions"), "roster_position")
        .into_iter()
        .map(|pos| RosterPosition {
            position: get_string(pos, "position"),
            position_type: get_string(pos, "position_type"),
            count: get_int(pos, "count") as i32,
            is_starting_position: get_bool(pos, "is_starting_position"),
        })
        .collect();

    // First pass: stat id -> display name.
    let stat_names: HashMap<String, String> =
        repeated_objects(path(settings, &["stat_categories", "stats"]), "stat")
            .into_iter()
            .filter_map(|stat| {
                let id = opt_str(stat, "stat_id")?;
                let name = opt_str(stat, "name")?;
                Some((id.to_string(), name.to_string()))
            })
            .collect();

    // Second pass: modifiers, named from the first pass. Ids stay unique.
    let mut seen = HashSet::new();
    for stat in repeated_objects(path(settings, &["stat_modifiers", "stats"]), "stat") {
        let stat_id = get_string(stat, "stat_id");
        if !seen.insert(stat_id.clone()) {
            tracing::warn!(stat_id = %stat_id, league = %league.league_key, "Duplicate stat modifier ignored");
            continue;
        }
        league.stat_modifiers.push(StatModifier {
            stat_name: stat_names.get(&stat_id).cloned().unwrap_or_default(),
            value: get_float(stat, "value"),
            stat_id,
        });
    }

    Ok(league)
}

/// Team snapshot for one week (`team/{key}/stats;type=week`).
pub fn map_to_team_week(tree: &Value) -> Result<TeamWeek> {
    let data = top(tree, "team")?;

    let logo_url = repeated_objects(child(data, "team_logos"), "team_logo")
        .first()
        .map(|logo| get_string(logo, "url"))
        .unwrap_or_default();

    let remaining = path(data, &["team_remaining_games", "total"]);

    Ok(TeamWeek {
        team_key: get_string(data, "team_key"),
        team_id: get_string(data, "team_id"),
        name: get_string(data, "name"),
        url: get_string(data, "url"),
        logo_url,
        waiver_priority: get_int(data, "waiver_priority") as i32,
        number_of_moves: get_int(data, "number_of_moves") as i32,
        number_of_trades: get_int(data, "number_of_trades") as i32,
        league_scoring_type: get_string(data, "league_scoring_type"),
        draft_position: get_int(data, "draft_position") as i32,
        projected_points: child(data, "team_projected_points")
            .map(|p| get_string(p, "total"))
            .unwrap_or_default(),
        final_points: child(data, "team_live_projected_points")
            .map(|p| get_string(p, "total"))
            .unwrap_or_default(),
        remaining_games: remaining
            .map(|t| get_int(t, "remaining_games") as i32)
            .unwrap_or_default(),
        completed_games: remaining
            .map(|t| get_int(t, "completed_games") as i32)
            .unwrap_or_default(),
    })
}

// ─── Players ─────────────────────────────────────────────────────────────────

fn stat_list(container: Option<&Value>) -> Vec<Stat> {
    repeated_objects(container.and_then(|c| child(c, "stats")), "stat")
        .into_iter()
        .map(|stat| Stat {
            stat_id: get_string(stat, "stat_id"),
            value: get_string(stat, "value"),
        })
        .collect()
}

/// Player with season and advanced stats (`player/{key}/stats`).
pub fn map_player(tree: &Value) -> Result<Player> {
    let data = top(tree, "player")?;
    let name = child(data, "name")
        .filter(|n| n.is_object())
        .ok_or_else(|| AppError::Mapping("missing player name".to_string()))?;

    let eligible_positions = repeated(path(data, &["eligible_positions", "position"]))
        .into_iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();

    Ok(Player {
        player_id: get_string(data, "player_id"),
        player_key: get_string(data, "player_key"),
        name: PlayerName {
            full: get_string(name, "full"),
            first: get_string(name, "first"),
            last: get_string(name, "last"),
            ascii_first: get_string(name, "ascii_first"),
            ascii_last: get_string(name, "ascii_last"),
        },
        team_full_name: get_string(data, "editorial_team_full_name"),
        team_abbreviation: get_string(data, "editorial_team_abbr"),
        team_url: get_string(data, "editorial_team_url"),
        uniform_number: get_string(data, "uniform_number"),
        display_position: get_string(data, "display_position"),
        headshot_url: child(data, "headshot")
            .map(|h| get_string(h, "url"))
            .unwrap_or_default(),
        image_url: get_string(data, "image_url"),
        is_undroppable: get_bool(data, "is_undroppable"),
        position_type: get_string(data, "position_type"),
        eligible_positions,
        has_player_notes: get_bool(data, "has_player_notes"),
        has_recent_player_notes: get_bool(data, "has_recent_player_notes"),
        player_notes_last_timestamp: get_int(data, "player_notes_last_timestamp"),
        stats: stat_list(child(data, "player_stats")),
        advanced_stats: stat_list(child(data, "player_advanced_stats")),
        next_update: None,
    })
}

/// Ranks of the single player in a `leagues;.../players;...;out=ranks` reply.
pub fn map_to_rank(tree: &Value) -> Result<Vec<PlayerRank>> {
    let leagues = top(tree, "leagues")?;

    let player = repeated_objects(Some(leagues), "league")
        .into_iter()
        .next()
        .and_then(|league| repeated_objects(child(league, "players"), "player").into_iter().next());

    let Some(player) = player else {
        return Ok(Vec::new());
    };

    Ok(repeated_objects(child(player, "player_ranks"), "player_rank")
        .into_iter()
        .map(|rank| PlayerRank {
            rank_type: get_string(rank, "rank_type"),
            rank_value: get_int(rank, "rank_value"),
            rank_season: get_string(rank, "rank_season"),
        })
        .collect())
}

/// One page of the game's player universe. An empty page ends pagination.
pub fn map_yahoo_players(tree: &Value) -> Result<Vec<YahooPlayer>> {
    let game = top(tree, "game")?;

    Ok(repeated_objects(child(game, "players"), "player")
        .into_iter()
        .filter_map(|player| {
            let Some(name) = child(player, "name").filter(|n| n.is_object()) else {
                tracing::debug!(player_key = %get_string(player, "player_key"), "Player without name skipped");
                return None;
            };
            Some(YahooPlayer {
                id: get_string(player, "player_key"),
                full_name: get_string(name, "full"),
                team_name: get_string(player, "editorial_team_full_name"),
                headshot_url: child(player, "headshot")
                    .map(|h| get_string(h, "url"))
                    .unwrap_or_default(),
            })
        })
        .collect())
}

/// Teams of a league (`league/{key}/teams`).
pub fn map_league_teams(tree: &Value) -> Result<Vec<LeagueTeam>> {
    let league = top(tree, "league")?;
    let league_id = opt_str(league, "league_key")
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::Mapping("missing 'league_key' in league data".to_string()))?;

    Ok(repeated_objects(child(league, "teams"), "team")
        .into_iter()
        .map(|team| LeagueTeam {
            team_id: get_string(team, "team_key"),
            league_id: league_id.to_string(),
            name: get_string(team, "name"),
            logo: repeated_objects(child(team, "team_logos"), "team_logo")
                .first()
                .map(|logo| get_string(logo, "url"))
                .unwrap_or_default(),
        })
        .collect())
}

// ─── Matchups ────────────────────────────────────────────────────────────────

fn team_weekly_stats(team: &Value, team_key: &str, week: &str) -> TeamWeeklyStats {
    TeamWeeklyStats {
        id: format!("{}-{}", team_key, week),
        team_key: team_key.to_string(),
        week: week.to_string(),
        stats: stat_list(child(team, "team_stats")),
        points: child(team, "team_points")
            .map(|p| get_float(p, "total"))
            .unwrap_or_default(),
    }
}

fn stat_winners(matchup: &Value, week: &str, key: &str) -> Vec<StatWinnerWeeklyMatchup> {
    repeated_objects(child(matchup, "stat_winners"), "stat_winner")
        .into_iter()
        .map(|winner| StatWinnerWeeklyMatchup {
            week: week.to_string(),
            matchup_key: key.to_string(),
            stat_id: get_string(winner, "stat_id"),
            winning_team_key: get_string(winner, "winner_team_key"),
            is_tied: get_bool(winner, "is_tied"),
        })
        .collect()
}

/// Matchups, per-team weekly stats and stat winners of a team's season.
///
/// Matchups without a declared winner (in progress or tied) are skipped.
pub fn map_team_matchups(tree: &Value) -> Result<MatchupSet> {
    let team = top(tree, "team")?;
    let mut set = MatchupSet::default();

    for matchup in repeated_objects(child(team, "matchups"), "matchup") {
        let week = get_string(matchup, "week");
        let winner = get_string(matchup, "winner_team_key");
        if winner.is_empty() {
            tracing::debug!(week = %week, "Matchup without winner skipped");
            continue;
        }

        let teams = repeated_objects(child(matchup, "teams"), "team");
        let keys: Vec<String> = teams.iter().map(|t| get_string(t, "team_key")).collect();
        let [first, second] = keys.as_slice() else {
            tracing::warn!(week = %week, teams = keys.len(), "Matchup without two teams skipped");
            continue;
        };

        let loser = if *first == winner { second } else { first };
        let key = matchup_key(&winner, loser, &week);

        for (team, team_key) in teams.iter().zip(&keys) {
            set.team_stats.push(team_weekly_stats(team, team_key, &week));
        }
        set.stat_winners.extend(stat_winners(matchup, &week, &key));
        set.matchups.push(Matchup {
            matchup_key: key,
            week,
            winning_team: winner.clone(),
            losing_team: loser.clone(),
        });
    }

    Ok(set)
}

// ─── Stats API ───────────────────────────────────────────────────────────────

/// Roster entry tagged with the club it was fetched for.
pub fn map_nhl_player(node: &Value, team: &str) -> Result<NhlPlayer> {
    let id = child(node, "id")
        .and_then(Value::as_f64)
        .ok_or_else(|| AppError::Mapping("roster entry without numeric id".to_string()))?;

    Ok(NhlPlayer {
        id: id as i64,
        headshot: get_string(node, "headshot"),
        first_name: default_name(node, "firstName"),
        last_name: default_name(node, "lastName"),
        sweater_number: num_int(node, "sweaterNumber") as i32,
        position_code: get_string(node, "positionCode"),
        shoots_catches: get_string(node, "shootsCatches"),
        height_in_inches: num_int(node, "heightInInches") as i32,
        weight_in_pounds: num_int(node, "weightInPounds") as i32,
        height_in_cm: num_int(node, "heightInCentimeters") as i32,
        weight_in_kg: num_int(node, "weightInKilograms") as i32,
        birth_date: get_string(node, "birthDate"),
        birth_city: default_name(node, "birthCity"),
        birth_country: get_string(node, "birthCountry"),
        birth_state: default_name(node, "birthStateProvince"),
        team: team.to_string(),
    })
}

/// Club roster: forwards, defensemen and goalies merged in that order.
pub fn map_roster(tree: &Value, team: &str) -> Result<Vec<NhlPlayer>> {
    if !tree.is_object() {
        return Err(AppError::Mapping("roster payload is not an object".to_string()));
    }

    let mut players = Vec::new();
    for group in ["forwards", "defensemen", "goalies"] {
        for entry in repeated(child(tree, group)) {
            match map_nhl_player(entry, team) {
                Ok(player) => players.push(player),
                Err(e) => tracing::warn!(team, group, error = %e, "Roster entry skipped"),
            }
        }
    }
    Ok(players)
}

/// Club season schedule.
pub fn map_schedule(tree: &Value) -> Result<Vec<ScheduleGame>> {
    let games = child(tree, "games")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::Mapping("missing 'games' list".to_string()))?;

    games
        .iter()
        .filter(|g| g.is_object())
        .map(|game| -> Result<ScheduleGame> {
            let id = num_int(game, "id");
            let start = opt_str(game, "startTimeUTC").unwrap_or_default();
            let start_time_utc = DateTime::parse_from_rfc3339(start)
                .map_err(|e| {
                    AppError::Mapping(format!("bad start time for game {}: {}", id, e))
                })?
                .with_timezone(&Utc);

            Ok(ScheduleGame {
                id,
                season: num_int(game, "season"),
                game_type: num_int(game, "gameType") as i32,
                game_date: get_string(game, "gameDate"),
                start_time_utc,
                home_team_abbrev: child(game, "homeTeam")
                    .map(|t| get_string(t, "abbrev"))
                    .unwrap_or_default(),
                away_team_abbrev: child(game, "awayTeam")
                    .map(|t| get_string(t, "abbrev"))
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// One game-log row.
pub fn map_game_stat(node: &Value, player_id: &str) -> PlayerGameStat {
    PlayerGameStat {
        player_id: player_id.to_string(),
        game_id: child(node, "gameId")
            .and_then(Value::as_f64)
            .map(|id| format!("{:.0}", id))
            .unwrap_or_default(),
        team_abbrev: get_string(node, "teamAbbrev"),
        home_road_flag: get_string(node, "homeRoadFlag"),
        game_date: get_string(node, "gameDate"),
        goals: num_int(node, "goals") as i32,
        assists: num_int(node, "assists") as i32,
        points: num_int(node, "points") as i32,
        plus_minus: num_int(node, "plusMinus") as i32,
        power_play_goals: num_int(node, "powerPlayGoals") as i32,
        power_play_points: num_int(node, "powerPlayPoints") as i32,
        game_winning_goals: num_int(node, "gameWinningGoals") as i32,
        ot_goals: num_int(node, "otGoals") as i32,
        shots: num_int(node, "shots") as i32,
        shifts: num_int(node, "shifts") as i32,
        shorthanded_goals: num_int(node, "shorthandedGoals") as i32,
        shorthanded_points: num_int(node, "shorthandedPoints") as i32,
        opponent_abbrev: get_string(node, "opponentAbbrev"),
        pim: num_f64(node, "pim") as i32,
        toi: get_string(node, "toi"),
        team: default_name(node, "commonName"),
        opponent: default_name(node, "opponentCommonName"),
    }
}

/// Player game log for a season.
pub fn map_game_log(tree: &Value, player_id: &str) -> Result<Vec<PlayerGameStat>> {
    if !tree.is_object() {
        return Err(AppError::Mapping("game log payload is not an object".to_string()));
    }
    Ok(repeated(child(tree, "gameLog"))
        .into_iter()
        .filter(|g| g.is_object())
        .map(|game| map_game_stat(game, player_id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn league_tree(modifiers: Value) -> Value {
        json!({"league": {
            "league_key": "453.l.1234",
            "league_id": "1234",
            "name": "Tip-Top League",
            "num_teams": "10",
            "current_week": "7",
            "is_cash_league": "0",
            "is_pro_league": "1",
            "start_date": "2024-10-04",
            "end_date": "not a date",
            "settings": {
                "roster_positions": {"roster_position": {
                    "position": "C", "position_type": "P", "count": "2", "is_starting_position": "1"
                }},
                "stat_categories": {"stats": {"stat": [
                    {"stat_id": "1", "name": "Goals"},
                    {"stat_id": "2", "name": "Assists"}
                ]}},
                "stat_modifiers": {"stats": {"stat": modifiers}}
            }
        }})
    }

    #[test]
    fn test_map_to_league() {
        let tree = league_tree(json!([
            {"stat_id": "1", "value": "3"},
            {"stat_id": "2", "value": "2"},
            {"stat_id": "99", "value": "0.5"}
        ]));
        let league = map_to_league(&tree).unwrap();

        assert_eq!(league.league_key, "453.l.1234");
        assert_eq!(league.num_teams, 10);
        assert_eq!(league.current_week, 7);
        assert!(league.is_pro_league);
        assert!(!league.is_cash_league);
        assert_eq!(league.roster_positions.len(), 1);
        assert!(league.roster_positions[0].is_starting_position);

        let names: Vec<_> = league.stat_modifiers.iter().map(|m| m.stat_name.as_str()).collect();
        assert_eq!(names, ["Goals", "Assists", ""]);
        assert_eq!(league.stat_modifiers[2].value, 0.5);
    }

    #[test]
    fn test_map_to_league_bad_date_is_zero_date() {
        // Silent degradation: an unparseable end date is indistinguishable
        // from a league that really starts at year 1.
        let league = map_to_league(&league_tree(json!([]))).unwrap();
        assert_eq!(league.end_date, crate::time_utils::zero_date());
        assert_eq!(league.start_date.to_rfc3339(), "2024-10-04T00:00:00+00:00");
    }

    #[test]
    fn test_single_modifier_same_as_list() {
        let single = map_to_league(&league_tree(json!({"stat_id": "1", "value": "3"}))).unwrap();
        let list = map_to_league(&league_tree(json!([{"stat_id": "1", "value": "3"}]))).unwrap();
        assert_eq!(single.stat_modifiers, list.stat_modifiers);
    }

    #[test]
    fn test_duplicate_modifiers_dropped() {
        let league = map_to_league(&league_tree(json!([
            {"stat_id": "1", "value": "3"},
            {"stat_id": "1", "value": "5"}
        ])))
        .unwrap();
        assert_eq!(league.stat_modifiers.len(), 1);
        assert_eq!(league.stat_modifiers[0].value, 3.0);
    }

    #[test]
    fn test_missing_top_container_is_error() {
        assert!(matches!(
            map_to_league(&json!({"team": {}})),
            Err(AppError::Mapping(_))
        ));
        assert!(map_player(&json!({})).is_err());
        assert!(map_team_matchups(&json!({"league": {}})).is_err());
        assert!(map_yahoo_players(&json!({})).is_err());
    }

    #[test]
    fn test_extract_leagues_flattens_games() {
        let tree = json!({"users": {"user": {"games": {"game": [
            {"leagues": {"league": [
                {"league_key": "403.l.84093", "name": "Sad Degens"},
                {"league_key": "411.l.53877", "name": "Another League"}
            ]}},
            {"leagues": {"league": {"league_key": "453.l.29317", "name": "Tip-Top League"}}}
        ]}}}});
        let leagues = extract_leagues(&tree).unwrap();
        let keys: Vec<_> = leagues.iter().map(|l| l["league_key"].as_str().unwrap()).collect();
        assert_eq!(keys, ["403.l.84093", "411.l.53877", "453.l.29317"]);
    }

    #[test]
    fn test_extract_leagues_game_without_leagues() {
        let tree = json!({"users": {"user": {"games": {"game": [{}]}}}});
        assert!(extract_leagues(&tree).unwrap().is_empty());
        assert!(extract_leagues(&json!({"invalid": {}})).is_err());
    }

    #[test]
    fn test_map_player() {
        let tree = json!({"player": {
            "player_key": "453.p.6743",
            "player_id": "6743",
            "name": {"full": "Connor McDavid", "first": "Connor", "last": "McDavid"},
            "editorial_team_abbr": "Edm",
            "headshot": {"url": "https://img/head.png"},
            "eligible_positions": {"position": ["C", "Util"]},
            "is_undroppable": "1",
            "player_stats": {"stats": {"stat": {"stat_id": "1", "value": "20"}}}
        }});
        let player = map_player(&tree).unwrap();
        assert_eq!(player.name.full, "Connor McDavid");
        assert_eq!(player.eligible_positions, ["C", "Util"]);
        assert!(player.is_undroppable);
        assert_eq!(player.headshot_url, "https://img/head.png");
        assert_eq!(
            player.stats,
            vec![Stat { stat_id: "1".into(), value: "20".into() }]
        );
        assert!(player.advanced_stats.is_empty());
    }

    #[test]
    fn test_map_to_rank_single_and_many() {
        let rank = json!({"rank_type": "S", "rank_value": "3", "rank_season": "2024"});
        let wrap = |ranks: Value| {
            json!({"leagues": {"league": {"players": {"player": {
                "player_ranks": {"player_rank": ranks}
            }}}}})
        };
        let one = map_to_rank(&wrap(rank.clone())).unwrap();
        let many = map_to_rank(&wrap(json!([rank.clone(), rank]))).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].rank_value, 3);
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn test_map_yahoo_players_empty_page() {
        assert!(map_yahoo_players(&json!({"game": {"game_key": "453"}}))
            .unwrap()
            .is_empty());
        assert!(map_yahoo_players(&json!({"game": {"players": ""}}))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_map_team_matchups() {
        let tree = json!({"team": {"matchups": {"matchup": [
            {
                "week": "1",
                "winner_team_key": "453.l.1.t.2",
                "teams": {"team": [
                    {"team_key": "453.l.1.t.1", "team_points": {"total": "40.5"},
                     "team_stats": {"stats": {"stat": [{"stat_id": "1", "value": "4"}]}}},
                    {"team_key": "453.l.1.t.2", "team_points": {"total": "52"}}
                ]},
                "stat_winners": {"stat_winner": {"stat_id": "1", "winner_team_key": "453.l.1.t.2", "is_tied": "0"}}
            },
            {
                "week": "2",
                "teams": {"team": [{"team_key": "453.l.1.t.1"}, {"team_key": "453.l.1.t.3"}]}
            }
        ]}}});
        let set = map_team_matchups(&tree).unwrap();

        assert_eq!(set.matchups.len(), 1);
        let m = &set.matchups[0];
        assert_eq!(m.winning_team, "453.l.1.t.2");
        assert_eq!(m.losing_team, "453.l.1.t.1");
        assert_eq!(m.matchup_key, matchup_key("453.l.1.t.1", "453.l.1.t.2", "1"));

        assert_eq!(set.team_stats.len(), 2);
        assert_eq!(set.team_stats[0].id, "453.l.1.t.1-1");
        assert_eq!(set.team_stats[0].points, 40.5);
        assert_eq!(set.team_stats[0].stats.len(), 1);
        assert_eq!(set.stat_winners.len(), 1);
        assert_eq!(set.stat_winners[0].matchup_key, m.matchup_key);
    }

    #[test]
    fn test_map_roster_merges_groups() {
        let tree = json!({
            "forwards": [{"id": 8478402.0, "firstName": {"default": "Connor"}, "lastName": {"default": "McDavid"}, "sweaterNumber": 97}],
            "defensemen": [{"id": 8477934, "firstName": {"default": "Evan"}, "lastName": {"default": "Bouchard"}}],
            "goalies": [{"firstName": {"default": "No"}, "lastName": {"default": "Id"}}]
        });
        let players = map_roster(&tree, "EDM").unwrap();
        assert_eq!(players.len(), 2);
        assert!(players.iter().all(|p| p.team == "EDM"));
        assert_eq!(players[0].full_name(), "Connor McDavid");
        assert_eq!(players[0].sweater_number, 97);
    }

    #[test]
    fn test_map_schedule() {
        let tree = json!({"games": [{
            "id": 2024020001.0, "season": 20242025.0, "gameType": 2.0,
            "gameDate": "2024-10-12", "startTimeUTC": "2024-10-12T23:00:00Z",
            "homeTeam": {"abbrev": "EDM"}, "awayTeam": {"abbrev": "CGY"}
        }]});
        let games = map_schedule(&tree).unwrap();
        assert_eq!(games[0].id, 2024020001);
        assert_eq!(games[0].home_team_abbrev, "EDM");
        assert!(map_schedule(&json!({})).is_err());
    }

    #[test]
    fn test_map_game_stat() {
        let node = json!({"gameId": 2024020001.0, "goals": 2.0, "assists": 1.0,
            "toi": "21:04", "commonName": {"default": "Oilers"}});
        let stat = map_game_stat(&node, "8478402");
        assert_eq!(stat.game_id, "2024020001");
        assert_eq!(stat.goals, 2);
        assert_eq!(stat.team, "Oilers");
        assert_eq!(stat.player_id, "8478402");
    }

    #[test]
    fn test_league_key_for_team() {
        assert_eq!(league_key_for_team("453.l.1234.t.5").unwrap(), "453.l.1234");
        assert!(league_key_for_team("453.l.1234").is_err());
    }
}
