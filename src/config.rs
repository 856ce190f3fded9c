use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_MIN_SEASON: i32 = 2004;

pub const DEFAULT_MIN_GAMES: u32 = 20;
pub const MIN_GAMES_BOUNDS: (u32, u32) = (10, 50);
pub const DEFAULT_MIN_FGA: f64 = 200.0;
pub const MIN_FGA_BOUNDS: (f64, f64) = (50.0, 500.0);

/// Where the four sources live and how the loader filters them.
#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub games_file: String,
    pub teams_file: String,
    pub ranking_file: String,
    pub details_file: String,
    pub min_season: i32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            games_file: "games.csv".to_string(),
            teams_file: "teams.csv".to_string(),
            ranking_file: "ranking.csv".to_string(),
            details_file: "games_details.csv".to_string(),
            min_season: DEFAULT_MIN_SEASON,
        }
    }
}

impl DataConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let min_season = match env::var("STATISTELLA_MIN_SEASON") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "Ignoring STATISTELLA_MIN_SEASON={:?}, using {}",
                    raw,
                    defaults.min_season
                );
                defaults.min_season
            }),
            Err(_) => defaults.min_season,
        };

        Self {
            data_dir: env::var("STATISTELLA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            games_file: env::var("STATISTELLA_GAMES_FILE").unwrap_or(defaults.games_file),
            teams_file: env::var("STATISTELLA_TEAMS_FILE").unwrap_or(defaults.teams_file),
            ranking_file: env::var("STATISTELLA_RANKING_FILE").unwrap_or(defaults.ranking_file),
            details_file: env::var("STATISTELLA_DETAILS_FILE").unwrap_or(defaults.details_file),
            min_season,
        }
    }

    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn games_path(&self) -> PathBuf {
        self.data_dir.join(&self.games_file)
    }

    pub fn teams_path(&self) -> PathBuf {
        self.data_dir.join(&self.teams_file)
    }

    pub fn ranking_path(&self) -> PathBuf {
        self.data_dir.join(&self.ranking_file)
    }

    pub fn details_path(&self) -> PathBuf {
        self.data_dir.join(&self.details_file)
    }

    /// File names as shown to the user when the load fails.
    pub fn expected_files(&self) -> String {
        [
            &self.games_file,
            &self.teams_file,
            &self.ranking_file,
            &self.details_file,
        ]
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub port: u16,
    /// Front-end assets served at `/` when set.
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env(port: u16) -> Self {
        Self {
            port,
            static_dir: env::var("STATISTELLA_STATIC_DIR").ok().map(PathBuf::from),
        }
    }
}
