use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_MIN_FGA, DEFAULT_MIN_GAMES, MIN_FGA_BOUNDS, MIN_GAMES_BOUNDS};
use crate::data::Dataset;
use crate::models::*;
use crate::services::{conference, insights, players, season, team_performance};
use crate::utils::mean;

/// Sidebar sentinel meaning "no team selected".
pub const ALL_TEAMS: &str = "All Teams";

const SUGGESTION_THRESHOLD: f64 = 0.75;
const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    ScoringTrend,
    HomeAdvantage,
    ConferenceTrend,
    ConferenceDistribution,
    TeamPerformance,
    PlayerImpact,
}

impl View {
    pub const ALL: [View; 6] = [
        View::ScoringTrend,
        View::HomeAdvantage,
        View::ConferenceTrend,
        View::ConferenceDistribution,
        View::TeamPerformance,
        View::PlayerImpact,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            View::ScoringTrend => "scoring-trend",
            View::HomeAdvantage => "home-advantage",
            View::ConferenceTrend => "conference-trend",
            View::ConferenceDistribution => "conference-distribution",
            View::TeamPerformance => "team-performance",
            View::PlayerImpact => "player-impact",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.slug() == s)
            .ok_or_else(|| format!("unknown view '{}'", s))
    }
}

/// Current sidebar selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Filters {
    pub season: Option<i32>,
    pub team: Option<String>,
    pub min_games: u32,
    pub min_fga: f64,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            season: None,
            team: None,
            min_games: DEFAULT_MIN_GAMES,
            min_fga: DEFAULT_MIN_FGA,
        }
    }
}

impl Filters {
    pub fn for_season(season: Option<i32>) -> Self {
        Self {
            season,
            ..Self::default()
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }
}

pub enum TeamLookup<'a> {
    NotSelected,
    Found(&'a Team),
    NotFound { suggestions: Vec<String> },
}

/// Resolve a team by id, abbreviation, nickname or "City Nickname"
/// (case-insensitive). Misses come back with the closest nicknames.
pub fn find_team<'a>(teams: &'a [Team], query: Option<&str>) -> TeamLookup<'a> {
    let Some(query) = query.map(str::trim).filter(|q| !q.is_empty() && *q != ALL_TEAMS) else {
        return TeamLookup::NotSelected;
    };

    if let Ok(team_id) = query.parse::<i64>() {
        if let Some(team) = teams.iter().find(|t| t.team_id == team_id) {
            return TeamLookup::Found(team);
        }
    }

    let found = teams.iter().find(|t| {
        t.nickname.eq_ignore_ascii_case(query)
            || t.abbreviation.eq_ignore_ascii_case(query)
            || format!("{} {}", t.city, t.nickname).eq_ignore_ascii_case(query)
    });
    if let Some(team) = found {
        return TeamLookup::Found(team);
    }

    let needle = query.to_lowercase();
    let mut scored: Vec<(f64, &str)> = teams
        .iter()
        .map(|t| {
            (
                strsim::jaro_winkler(&needle, &t.nickname.to_lowercase()),
                t.nickname.as_str(),
            )
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    TeamLookup::NotFound {
        suggestions: scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, name)| name.to_string())
            .collect(),
    }
}

pub fn filter_options(dataset: &Dataset) -> FilterOptions {
    let seasons = dataset.seasons();
    let mut teams: Vec<String> = dataset
        .teams
        .iter()
        .map(|t| t.nickname.clone())
        .filter(|n| !n.is_empty())
        .collect();
    teams.sort();
    teams.dedup();
    teams.insert(0, ALL_TEAMS.to_string());

    FilterOptions {
        default_season: seasons.first().copied(),
        seasons,
        teams,
        min_games: SliderBounds {
            min: MIN_GAMES_BOUNDS.0,
            max: MIN_GAMES_BOUNDS.1,
            default: DEFAULT_MIN_GAMES,
        },
        min_fga: SliderBounds {
            min: MIN_FGA_BOUNDS.0,
            max: MIN_FGA_BOUNDS.1,
            default: DEFAULT_MIN_FGA,
        },
    }
}

pub fn quick_stats(dataset: &Dataset) -> QuickStats {
    let seasons = dataset.seasons();
    let totals: Vec<f64> = dataset.games.iter().map(|g| g.total_points).collect();

    QuickStats {
        total_games: dataset.games.len(),
        seasons_covered: seasons.len(),
        avg_total_points: mean(&totals),
        first_season: seasons.last().copied(),
        last_season: seasons.first().copied(),
    }
}

/// Compute one view from the snapshot and the current filters.
pub fn aggregate(view: View, filters: &Filters, dataset: &Dataset) -> ChartData {
    match view {
        View::ScoringTrend => scoring_trend_view(filters, dataset),
        View::HomeAdvantage => home_advantage_view(filters, dataset),
        View::ConferenceTrend => conference_trend_view(dataset),
        View::ConferenceDistribution => conference_distribution_view(filters, dataset),
        View::TeamPerformance => team_performance_view(filters, dataset),
        View::PlayerImpact => player_impact_view(filters, dataset),
    }
}

fn selected_season(filters: &Filters, dataset: &Dataset) -> Option<i32> {
    filters.season.or_else(|| dataset.latest_season())
}

fn scoring_trend_view(filters: &Filters, dataset: &Dataset) -> ChartData {
    let points = season::scoring_trend(&dataset.games, filters.season);
    if points.is_empty() {
        return ChartData::no_data("No scored games available for this selection");
    }

    ChartData::ScoringTrend(ScoringTrendChart {
        annotation: insights::three_point_annotation(&points),
        insight: insights::scoring_insight(&points),
        points,
    })
}

fn home_advantage_view(filters: &Filters, dataset: &Dataset) -> ChartData {
    let Some(global) = season::home_advantage(&dataset.games, filters.season) else {
        return ChartData::no_data("No decided games available for this selection");
    };

    ChartData::HomeAdvantage(HomeAdvantageChart {
        insight: insights::home_advantage_summary(&global),
        by_season: season::home_win_by_season(&dataset.games, filters.season),
        baseline: team_performance::WIN_PCT_BASELINE,
        global,
    })
}

fn conference_trend_view(dataset: &Dataset) -> ChartData {
    let latest = conference::latest_rankings(&dataset.rankings);
    let series = conference::conference_trend(&latest);
    if series.is_empty() {
        return ChartData::no_data("No ranking data available");
    }
    ChartData::ConferenceTrend(ConferenceTrendChart { series })
}

fn conference_distribution_view(filters: &Filters, dataset: &Dataset) -> ChartData {
    let Some(season_year) = selected_season(filters, dataset) else {
        return ChartData::no_data("No seasons loaded");
    };

    let latest = conference::latest_rankings(&dataset.rankings);
    let conferences = conference::conference_distribution(&latest, season_year, &dataset.teams);
    if conferences.is_empty() {
        return ChartData::no_data(format!("No ranking data available for {}", season_year));
    }

    ChartData::ConferenceDistribution(ConferenceDistributionChart {
        season_year,
        conferences,
    })
}

fn team_performance_view(filters: &Filters, dataset: &Dataset) -> ChartData {
    let team = match find_team(&dataset.teams, filters.team.as_deref()) {
        TeamLookup::Found(team) => team,
        TeamLookup::NotSelected => {
            return ChartData::no_data(
                "Select a specific team to view detailed performance analysis",
            )
        }
        TeamLookup::NotFound { suggestions } if suggestions.is_empty() => {
            return ChartData::no_data("Team not found in database")
        }
        TeamLookup::NotFound { suggestions } => {
            return ChartData::no_data(format!(
                "Team not found in database. Did you mean: {}?",
                suggestions.join(", ")
            ))
        }
    };

    let Some(season) = selected_season(filters, dataset) else {
        return ChartData::no_data("No seasons loaded");
    };

    match team_performance::team_performance(&dataset.games, team, season) {
        Some(performance) => ChartData::TeamPerformance(performance),
        None => ChartData::no_data(format!(
            "No game data found for {} in {}",
            team.nickname, season
        )),
    }
}

fn player_impact_view(filters: &Filters, dataset: &Dataset) -> ChartData {
    let Some(season) = selected_season(filters, dataset) else {
        return ChartData::no_data("No seasons loaded");
    };

    match players::player_impact(
        &dataset.games,
        &dataset.player_stats,
        season,
        filters.min_games,
        filters.min_fga,
    ) {
        Some(chart) => ChartData::PlayerImpact(chart),
        None => {
            ChartData::no_data("No players meet the minimum criteria. Try lowering the filters.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;
    use crate::data::{load_dataset, tests::write_fixture};

    fn fixture_dataset(name: &str) -> Dataset {
        let dir = write_fixture(name);
        let dataset = load_dataset(&DataConfig::default().with_data_dir(&dir)).unwrap();
        let _ = std::fs::remove_dir_all(&dir);
        dataset
    }

    #[test]
    fn view_slugs_round_trip() {
        for view in View::ALL {
            assert_eq!(view.slug().parse::<View>().unwrap(), view);
        }
        assert!("box-score".parse::<View>().is_err());
    }

    #[test]
    fn find_team_by_any_label() {
        let dataset = fixture_dataset("views_find");
        let teams = &dataset.teams;

        assert!(matches!(find_team(teams, Some("lakers")), TeamLookup::Found(t) if t.team_id == 1));
        assert!(matches!(find_team(teams, Some("BOS")), TeamLookup::Found(t) if t.team_id == 2));
        assert!(matches!(find_team(teams, Some("3")), TeamLookup::Found(t) if t.nickname == "Bulls"));
        assert!(matches!(
            find_team(teams, Some("Los Angeles Lakers")),
            TeamLookup::Found(t) if t.team_id == 1
        ));
        assert!(matches!(find_team(teams, Some(ALL_TEAMS)), TeamLookup::NotSelected));
        assert!(matches!(find_team(teams, None), TeamLookup::NotSelected));

        match find_team(teams, Some("Laker")) {
            TeamLookup::NotFound { suggestions } => assert_eq!(suggestions[0], "Lakers"),
            _ => panic!("expected a miss"),
        }
    }

    #[test]
    fn team_view_defaults_to_latest_season() {
        let dataset = fixture_dataset("views_team");

        let filters = Filters::for_season(Some(2020)).with_team("Lakers");
        match aggregate(View::TeamPerformance, &filters, &dataset) {
            ChartData::TeamPerformance(perf) => {
                assert_eq!(perf.total_wins, 2);
                assert_eq!(perf.total_losses, 1);
                assert_eq!(perf.home_record.to_string(), "2-0");
                assert_eq!(perf.away_record.to_string(), "0-1");
            }
            other => panic!("unexpected {:?}", other),
        }

        // latest season is 2021, where the Lakers won their only game
        let filters = Filters::default().with_team("Lakers");
        match aggregate(View::TeamPerformance, &filters, &dataset) {
            ChartData::TeamPerformance(perf) => assert_eq!(perf.season, 2021),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn team_view_without_team_has_no_data() {
        let dataset = fixture_dataset("views_no_team");
        assert!(aggregate(View::TeamPerformance, &Filters::default(), &dataset).is_empty());
        let filters = Filters::default().with_team("Sonics");
        assert!(aggregate(View::TeamPerformance, &filters, &dataset).is_empty());
    }

    #[test]
    fn league_views_are_populated() {
        let dataset = fixture_dataset("views_league");
        let filters = Filters::default();

        match aggregate(View::ScoringTrend, &filters, &dataset) {
            ChartData::ScoringTrend(chart) => assert_eq!(chart.points.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        match aggregate(View::HomeAdvantage, &filters, &dataset) {
            ChartData::HomeAdvantage(chart) => {
                assert_eq!(chart.global.total_games, 4);
                assert_eq!(chart.global.home_wins, 3);
                assert_eq!(chart.baseline, 50.0);
            }
            other => panic!("unexpected {:?}", other),
        }
        match aggregate(View::ConferenceTrend, &filters, &dataset) {
            ChartData::ConferenceTrend(chart) => assert_eq!(chart.series.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        let season_2020 = Filters::for_season(Some(2020));
        match aggregate(View::ConferenceDistribution, &season_2020, &dataset) {
            ChartData::ConferenceDistribution(chart) => {
                assert_eq!(chart.season_year, 2020);
                assert_eq!(chart.conferences.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
        let season_2015 = Filters::for_season(Some(2015));
        assert!(aggregate(View::ConferenceDistribution, &season_2015, &dataset).is_empty());
    }

    #[test]
    fn player_view_respects_thresholds() {
        let dataset = fixture_dataset("views_players");
        let mut filters = Filters::for_season(Some(2020));
        assert!(aggregate(View::PlayerImpact, &filters, &dataset).is_empty());

        filters.min_games = 1;
        filters.min_fga = 10.0;
        match aggregate(View::PlayerImpact, &filters, &dataset) {
            ChartData::PlayerImpact(chart) => {
                let names: Vec<&str> =
                    chart.qualified.iter().map(|p| p.player_name.as_str()).collect();
                assert_eq!(names, vec!["Jayson Tatum", "LeBron James"]);
                let lebron = &chart.qualified[1];
                assert_eq!(lebron.games_played, 2);
                assert_eq!(lebron.total_pts, 50.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn sidebar_options_and_quick_stats() {
        let dataset = fixture_dataset("views_sidebar");
        let options = filter_options(&dataset);
        assert_eq!(options.seasons, vec![2021, 2020]);
        assert_eq!(options.default_season, Some(2021));
        assert_eq!(options.teams, vec![ALL_TEAMS, "Bulls", "Celtics", "Lakers"]);
        assert_eq!(options.min_games.default, 20);

        let stats = quick_stats(&dataset);
        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.seasons_covered, 2);
        assert_eq!(stats.first_season, Some(2020));
        assert_eq!(stats.last_season, Some(2021));
        assert!((stats.avg_total_points.unwrap() - 208.5).abs() < 1e-9);
    }
}
