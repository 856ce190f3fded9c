use crate::models::{Game, GameLogEntry, Record, Team, TeamPerformance};
use crate::services::insights;
use crate::utils::{calculate_win_percentage, results_to_form};

pub const WIN_PCT_BASELINE: f64 = 50.0;

/// Did `team_id` win this game? `None` when the result flag is unknown.
pub fn team_won(game: &Game, team_id: i64) -> Option<bool> {
    let home_won = game.home_team_wins?;
    if game.home_team_id == team_id {
        Some(home_won)
    } else if game.visitor_team_id == team_id {
        Some(!home_won)
    } else {
        None
    }
}

/// Home/away split of one team's season.
pub fn season_records(games: &[Game], team_id: i64, season: i32) -> (Record, Record) {
    let mut home = Record::default();
    let mut away = Record::default();

    for game in games.iter().filter(|g| g.season == season) {
        let Some(home_won) = game.home_team_wins else {
            continue;
        };
        if game.home_team_id == team_id {
            if home_won {
                home.wins += 1;
            } else {
                home.losses += 1;
            }
        } else if game.visitor_team_id == team_id {
            if home_won {
                away.losses += 1;
            } else {
                away.wins += 1;
            }
        }
    }

    (home, away)
}

/// Chronological game log with a running win count. Games without a date
/// sort last; equal dates keep their input order.
pub fn game_log(games: &[Game], team_id: i64, season: i32) -> Vec<GameLogEntry> {
    let mut team_games: Vec<(&Game, bool)> = games
        .iter()
        .filter(|g| g.season == season && g.involves(team_id))
        .filter_map(|g| team_won(g, team_id).map(|won| (g, won)))
        .collect();
    team_games.sort_by_key(|(g, _)| (g.date.is_none(), g.date));

    let mut cumulative_wins = 0u32;
    team_games
        .into_iter()
        .enumerate()
        .map(|(idx, (game, won))| {
            let game_number = idx as u32 + 1;
            if won {
                cumulative_wins += 1;
            }

            let is_home = game.home_team_id == team_id;
            let (opponent_id, opponent, points_for, points_against) = if is_home {
                (
                    game.visitor_team_id,
                    game.visitor.as_ref().map(|l| l.abbreviation.clone()),
                    game.pts_home,
                    game.pts_away,
                )
            } else {
                (
                    game.home_team_id,
                    game.home.as_ref().map(|l| l.abbreviation.clone()),
                    game.pts_away,
                    game.pts_home,
                )
            };

            GameLogEntry {
                game_number,
                game_id: game.game_id,
                date: game.date,
                is_home,
                opponent_id,
                opponent,
                points_for,
                points_against,
                won,
                cumulative_wins,
                win_pct: cumulative_wins as f64 / game_number as f64,
            }
        })
        .collect()
}

/// Record, game log and summary for one team-season. `None` when the team
/// has no decided games that season.
pub fn team_performance(games: &[Game], team: &Team, season: i32) -> Option<TeamPerformance> {
    let log = game_log(games, team.team_id, season);
    if log.is_empty() {
        return None;
    }

    let (home_record, away_record) = season_records(games, team.team_id, season);
    let total_wins = home_record.wins + away_record.wins;
    let total_losses = home_record.losses + away_record.losses;
    let final_win_pct = calculate_win_percentage(total_wins, total_losses)?;

    let results: Vec<bool> = log.iter().map(|entry| entry.won).collect();

    Some(TeamPerformance {
        team_id: team.team_id,
        nickname: team.nickname.clone(),
        season,
        total_wins,
        total_losses,
        home_record,
        away_record,
        recent_form: results_to_form(&results),
        final_win_pct,
        insight: insights::team_summary(
            &team.nickname,
            season,
            total_wins,
            total_losses,
            final_win_pct,
        ),
        game_log: log,
        baseline: WIN_PCT_BASELINE,
    })
}
