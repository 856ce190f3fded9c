use std::collections::BTreeMap;

use crate::models::{Game, HomeAdvantageSummary, SeasonHomeWins, SeasonScoring};
use crate::utils::percentage;

#[derive(Default)]
struct ScoringAccum {
    games: usize,
    home: f64,
    away: f64,
    total: f64,
}

#[derive(Default)]
struct HomeWinAccum {
    games: usize,
    home_wins: usize,
}

fn in_season(game: &Game, season: Option<i32>) -> bool {
    season.map_or(true, |s| game.season == s)
}

/// Mean home/away/total points per season, oldest season first.
pub fn scoring_trend(games: &[Game], season: Option<i32>) -> Vec<SeasonScoring> {
    let mut by_season: BTreeMap<i32, ScoringAccum> = BTreeMap::new();
    for game in games.iter().filter(|g| in_season(g, season)) {
        let acc = by_season.entry(game.season).or_default();
        acc.games += 1;
        acc.home += game.pts_home;
        acc.away += game.pts_away;
        acc.total += game.total_points;
    }

    by_season
        .into_iter()
        .map(|(season, acc)| {
            let n = acc.games as f64;
            SeasonScoring {
                season,
                games: acc.games,
                avg_home_points: acc.home / n,
                avg_away_points: acc.away / n,
                avg_total_points: acc.total / n,
            }
        })
        .collect()
}

/// Home-win percentage per season. Only games with a known result count;
/// a season without any is left out.
pub fn home_win_by_season(games: &[Game], season: Option<i32>) -> Vec<SeasonHomeWins> {
    let mut by_season: BTreeMap<i32, HomeWinAccum> = BTreeMap::new();
    for game in games.iter().filter(|g| in_season(g, season)) {
        let Some(home_won) = game.home_team_wins else {
            continue;
        };
        let acc = by_season.entry(game.season).or_default();
        acc.games += 1;
        if home_won {
            acc.home_wins += 1;
        }
    }

    by_season
        .into_iter()
        .filter_map(|(season, acc)| {
            let home_win_pct = percentage(acc.home_wins as f64, acc.games as f64)?;
            Some(SeasonHomeWins {
                season,
                home_wins: acc.home_wins,
                games: acc.games,
                home_win_pct,
            })
        })
        .collect()
}

/// Home vs away win split across every game with a known result.
pub fn home_advantage(games: &[Game], season: Option<i32>) -> Option<HomeAdvantageSummary> {
    let decided: Vec<bool> = games
        .iter()
        .filter(|g| in_season(g, season))
        .filter_map(|g| g.home_team_wins)
        .collect();

    let total_games = decided.len();
    let home_wins = decided.iter().filter(|&&won| won).count();
    let away_wins = total_games - home_wins;

    Some(HomeAdvantageSummary {
        total_games,
        home_wins,
        away_wins,
        home_win_pct: percentage(home_wins as f64, total_games as f64)?,
        away_win_pct: percentage(away_wins as f64, total_games as f64)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn game(
        game_id: i64,
        season: i32,
        home: i64,
        visitor: i64,
        pts: (f64, f64),
        home_won: Option<bool>,
    ) -> Game {
        Game {
            game_id,
            date: None,
            season,
            home_team_id: home,
            visitor_team_id: visitor,
            pts_home: pts.0,
            pts_away: pts.1,
            total_points: pts.0 + pts.1,
            home_team_wins: home_won,
            home: None,
            visitor: None,
        }
    }

    fn sample() -> Vec<Game> {
        vec![
            game(1, 2019, 1, 2, (100.0, 90.0), Some(true)),
            game(2, 2019, 2, 1, (110.0, 120.0), Some(false)),
            game(3, 2020, 1, 2, (120.0, 100.0), Some(true)),
            game(4, 2020, 2, 1, (100.0, 100.0), None),
            game(5, 2020, 2, 3, (105.0, 95.0), Some(true)),
        ]
    }

    #[test]
    fn scoring_means_per_season() {
        let trend = scoring_trend(&sample(), None);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].season, 2019);
        assert_eq!(trend[0].avg_home_points, 105.0);
        assert_eq!(trend[0].avg_away_points, 105.0);
        assert_eq!(trend[0].avg_total_points, 210.0);
        assert_eq!(trend[1].games, 3);
        assert!((trend[1].avg_total_points - 620.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn season_filter_restricts_trend() {
        let trend = scoring_trend(&sample(), Some(2020));
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].season, 2020);
    }

    #[test]
    fn home_win_pct_ignores_unknown_results() {
        let by_season = home_win_by_season(&sample(), None);
        assert_eq!(by_season[0].home_win_pct, 50.0);
        assert_eq!(by_season[1].games, 2);
        assert_eq!(by_season[1].home_win_pct, 100.0);
    }

    #[test]
    fn home_and_away_split_sums_to_100() {
        let summary = home_advantage(&sample(), None).unwrap();
        assert_eq!(summary.total_games, 4);
        assert_eq!(summary.home_wins, 3);
        assert_eq!(summary.away_wins, 1);
        assert!((0.0..=100.0).contains(&summary.home_win_pct));
        assert!((summary.home_win_pct + summary.away_win_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn no_decided_games_means_no_output() {
        let games = vec![game(1, 2020, 1, 2, (100.0, 99.0), None)];
        assert!(home_advantage(&games, None).is_none());
        assert!(home_win_by_season(&games, None).is_empty());
        assert!(home_advantage(&[], None).is_none());
    }
}
