use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod charts;

pub use charts::*;

// ── Raw rows, as they appear in the CSV sources ─────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct GameRecord {
    #[serde(rename = "GAME_DATE_EST")]
    pub game_date_est: Option<String>,
    #[serde(rename = "GAME_ID")]
    pub game_id: i64,
    #[serde(rename = "HOME_TEAM_ID")]
    pub home_team_id: i64,
    #[serde(rename = "VISITOR_TEAM_ID")]
    pub visitor_team_id: i64,
    #[serde(rename = "SEASON")]
    pub season: i32,
    #[serde(rename = "PTS_home", deserialize_with = "csv::invalid_option")]
    pub pts_home: Option<f64>,
    #[serde(rename = "PTS_away", deserialize_with = "csv::invalid_option")]
    pub pts_away: Option<f64>,
    #[serde(rename = "HOME_TEAM_WINS", deserialize_with = "csv::invalid_option")]
    pub home_team_wins: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingRecord {
    #[serde(rename = "TEAM_ID")]
    pub team_id: i64,
    #[serde(rename = "SEASON_ID")]
    pub season_id: String,
    #[serde(rename = "STANDINGSDATE")]
    pub standings_date: Option<String>,
    #[serde(rename = "CONFERENCE")]
    pub conference: Option<String>,
    #[serde(rename = "W_PCT", deserialize_with = "csv::invalid_option")]
    pub w_pct: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerStatRecord {
    #[serde(rename = "GAME_ID")]
    pub game_id: i64,
    #[serde(rename = "PLAYER_NAME")]
    pub player_name: Option<String>,
    #[serde(rename = "PTS", deserialize_with = "csv::invalid_option")]
    pub pts: Option<f64>,
    #[serde(rename = "FGA", deserialize_with = "csv::invalid_option")]
    pub fga: Option<f64>,
    #[serde(rename = "FGM", deserialize_with = "csv::invalid_option")]
    pub fgm: Option<f64>,
    #[serde(rename = "AST", deserialize_with = "csv::invalid_option")]
    pub ast: Option<f64>,
    #[serde(rename = "REB", deserialize_with = "csv::invalid_option")]
    pub reb: Option<f64>,
}

// ── Cleaned tables ──────────────────────────────────────────────────────────

/// Team reference row. Read straight from the teams source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename(deserialize = "TEAM_ID"))]
    pub team_id: i64,
    #[serde(rename(deserialize = "ABBREVIATION"))]
    pub abbreviation: String,
    #[serde(rename(deserialize = "NICKNAME"))]
    pub nickname: String,
    #[serde(rename(deserialize = "CITY"))]
    pub city: String,
}

/// The team columns joined onto each side of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamLabel {
    pub abbreviation: String,
    pub nickname: String,
    pub city: String,
}

impl From<&Team> for TeamLabel {
    fn from(team: &Team) -> Self {
        Self {
            abbreviation: team.abbreviation.clone(),
            nickname: team.nickname.clone(),
            city: team.city.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: i64,
    pub date: Option<NaiveDate>,
    pub season: i32,
    pub home_team_id: i64,
    pub visitor_team_id: i64,
    pub pts_home: f64,
    pub pts_away: f64,
    pub total_points: f64,
    /// `None` when the source had no usable result flag.
    pub home_team_wins: Option<bool>,
    pub home: Option<TeamLabel>,
    pub visitor: Option<TeamLabel>,
}

impl Game {
    pub fn involves(&self, team_id: i64) -> bool {
        self.home_team_id == team_id || self.visitor_team_id == team_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    pub team_id: i64,
    /// Season type digit(s) followed by the four-digit year, e.g. "22022".
    pub season_id: String,
    pub season_year: i32,
    pub conference: Option<String>,
    pub w_pct: Option<f64>,
    pub standings_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameStat {
    pub game_id: i64,
    pub player_name: Option<String>,
    pub points: f64,
    pub field_goal_attempts: f64,
    pub field_goals_made: f64,
    pub assists: f64,
    pub rebounds: f64,
}

// API Response types
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}
