use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One payload per dashboard view. `NoData` is what a view returns when its
/// filtered slice is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    ScoringTrend(ScoringTrendChart),
    HomeAdvantage(HomeAdvantageChart),
    ConferenceTrend(ConferenceTrendChart),
    ConferenceDistribution(ConferenceDistributionChart),
    TeamPerformance(TeamPerformance),
    PlayerImpact(PlayerImpactChart),
    NoData { message: String },
}

impl ChartData {
    pub fn no_data(message: impl Into<String>) -> Self {
        Self::NoData {
            message: message.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

// ── League trends ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonScoring {
    pub season: i32,
    pub games: usize,
    pub avg_home_points: f64,
    pub avg_away_points: f64,
    pub avg_total_points: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Upward,
    Downward,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Upward => write!(f, "Upward Trend"),
            TrendDirection::Downward => write!(f, "Downward Trend"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringInsight {
    pub early_avg: f64,
    pub recent_avg: f64,
    pub pct_change: f64,
    pub direction: TrendDirection,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringTrendChart {
    pub points: Vec<SeasonScoring>,
    pub annotation: Option<Annotation>,
    pub insight: Option<ScoringInsight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonHomeWins {
    pub season: i32,
    pub home_wins: usize,
    pub games: usize,
    pub home_win_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeAdvantageSummary {
    pub total_games: usize,
    pub home_wins: usize,
    pub away_wins: usize,
    pub home_win_pct: f64,
    pub away_win_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeAdvantageChart {
    pub global: HomeAdvantageSummary,
    pub by_season: Vec<SeasonHomeWins>,
    pub baseline: f64,
    pub insight: String,
}

// ── Conferences ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferencePoint {
    pub season_year: i32,
    pub avg_w_pct: f64,
    pub teams: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceSeries {
    pub conference: String,
    pub points: Vec<ConferencePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceTrendChart {
    pub series: Vec<ConferenceSeries>,
}

/// Five-number summary used for boxplots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamWinPct {
    pub team_id: i64,
    pub abbreviation: Option<String>,
    pub w_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceDistribution {
    pub conference: String,
    pub teams: Vec<TeamWinPct>,
    pub summary: BoxSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceDistributionChart {
    pub season_year: i32,
    pub conferences: Vec<ConferenceDistribution>,
}

// ── Team performance ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLogEntry {
    pub game_number: u32,
    pub game_id: i64,
    pub date: Option<NaiveDate>,
    pub is_home: bool,
    pub opponent_id: i64,
    pub opponent: Option<String>,
    pub points_for: f64,
    pub points_against: f64,
    pub won: bool,
    pub cumulative_wins: u32,
    /// Fraction in [0, 1].
    pub win_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPerformance {
    pub team_id: i64,
    pub nickname: String,
    pub season: i32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub home_record: Record,
    pub away_record: Record,
    /// Last five results, most recent first ("WWLWL").
    pub recent_form: String,
    /// Percentage in [0, 100].
    pub final_win_pct: f64,
    pub game_log: Vec<GameLogEntry>,
    pub baseline: f64,
    pub insight: String,
}

// ── Players ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonLine {
    pub player_name: String,
    pub games_played: u32,
    pub total_fga: f64,
    pub total_fgm: f64,
    pub total_pts: f64,
    pub total_ast: f64,
    pub total_reb: f64,
    pub fg_pct: f64,
    pub ppg: f64,
    pub usage_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerImpactChart {
    pub season: i32,
    pub min_games: u32,
    pub min_fga: f64,
    pub qualified: Vec<PlayerSeasonLine>,
    pub median_usage: f64,
    pub median_ppg: f64,
    pub top_performers: Vec<PlayerSeasonLine>,
    pub insight: Option<String>,
}

// ── Sidebar ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderBounds<T> {
    pub min: T,
    pub max: T,
    pub default: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub seasons: Vec<i32>,
    pub default_season: Option<i32>,
    pub teams: Vec<String>,
    pub min_games: SliderBounds<u32>,
    pub min_fga: SliderBounds<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickStats {
    pub total_games: usize,
    pub seasons_covered: usize,
    pub avg_total_points: Option<f64>,
    pub first_season: Option<i32>,
    pub last_season: Option<i32>,
}
