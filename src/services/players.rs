use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use crate::models::{Game, PlayerGameStat, PlayerImpactChart, PlayerSeasonLine};
use crate::services::insights;
use crate::utils::{median, percentage};

pub const TOP_PERFORMERS: usize = 10;

#[derive(Default)]
struct PlayerAccum {
    game_ids: HashSet<i64>,
    fga: f64,
    fgm: f64,
    pts: f64,
    ast: f64,
    reb: f64,
}

/// Season totals for every player who appears in a game of `season`,
/// ordered by player name.
pub fn season_player_totals(
    games: &[Game],
    stats: &[PlayerGameStat],
    season: i32,
) -> Vec<PlayerSeasonLine> {
    let season_games: HashSet<i64> = games
        .iter()
        .filter(|g| g.season == season)
        .map(|g| g.game_id)
        .collect();

    let mut by_player: BTreeMap<&str, PlayerAccum> = BTreeMap::new();
    for stat in stats.iter().filter(|s| season_games.contains(&s.game_id)) {
        let Some(name) = stat.player_name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        let acc = by_player.entry(name).or_default();
        acc.game_ids.insert(stat.game_id);
        acc.fga += stat.field_goal_attempts;
        acc.fgm += stat.field_goals_made;
        acc.pts += stat.points;
        acc.ast += stat.assists;
        acc.reb += stat.rebounds;
    }

    by_player
        .into_iter()
        .map(|(name, acc)| {
            let games_played = acc.game_ids.len() as u32;
            let games = games_played as f64;
            PlayerSeasonLine {
                player_name: name.to_string(),
                games_played,
                total_fga: acc.fga,
                total_fgm: acc.fgm,
                total_pts: acc.pts,
                total_ast: acc.ast,
                total_reb: acc.reb,
                fg_pct: percentage(acc.fgm, acc.fga).unwrap_or(0.0),
                ppg: acc.pts / games,
                usage_rate: acc.fga / games,
            }
        })
        .collect()
}

/// Players meeting both the games and the attempts threshold.
pub fn qualified_players(
    totals: Vec<PlayerSeasonLine>,
    min_games: u32,
    min_fga: f64,
) -> Vec<PlayerSeasonLine> {
    totals
        .into_iter()
        .filter(|p| p.games_played >= min_games && p.total_fga >= min_fga)
        .collect()
}

/// Qualified players strictly above both medians, best scorers first.
pub fn top_performers(
    qualified: &[PlayerSeasonLine],
    median_usage: f64,
    median_ppg: f64,
) -> Vec<PlayerSeasonLine> {
    let mut top: Vec<PlayerSeasonLine> = qualified
        .iter()
        .filter(|p| p.usage_rate > median_usage && p.ppg > median_ppg)
        .cloned()
        .collect();
    top.sort_by(|a, b| b.ppg.partial_cmp(&a.ppg).unwrap_or(Ordering::Equal));
    top.truncate(TOP_PERFORMERS);
    top
}

/// Usage vs output view for one season. `None` when nobody qualifies.
pub fn player_impact(
    games: &[Game],
    stats: &[PlayerGameStat],
    season: i32,
    min_games: u32,
    min_fga: f64,
) -> Option<PlayerImpactChart> {
    let qualified = qualified_players(season_player_totals(games, stats, season), min_games, min_fga);
    if qualified.is_empty() {
        return None;
    }

    let usage: Vec<f64> = qualified.iter().map(|p| p.usage_rate).collect();
    let ppg: Vec<f64> = qualified.iter().map(|p| p.ppg).collect();
    let median_usage = median(&usage)?;
    let median_ppg = median(&ppg)?;

    let top_performers = top_performers(&qualified, median_usage, median_ppg);
    let insight = top_performers
        .first()
        .map(|leader| insights::player_summary(&leader.player_name, season));

    Some(PlayerImpactChart {
        season,
        min_games,
        min_fga,
        qualified,
        median_usage,
        median_ppg,
        top_performers,
        insight,
    })
}
