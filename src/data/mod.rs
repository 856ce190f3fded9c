pub mod archive;
pub mod cache;

pub use cache::*;

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;

use crate::config::DataConfig;
use crate::error::LoadError;
use crate::models::*;

const GAMES_COLUMNS: &[&str] = &[
    "GAME_DATE_EST",
    "GAME_ID",
    "HOME_TEAM_ID",
    "VISITOR_TEAM_ID",
    "SEASON",
    "PTS_home",
    "PTS_away",
    "HOME_TEAM_WINS",
];
const TEAMS_COLUMNS: &[&str] = &["TEAM_ID", "ABBREVIATION", "NICKNAME", "CITY"];
const RANKING_COLUMNS: &[&str] = &["TEAM_ID", "SEASON_ID", "STANDINGSDATE", "CONFERENCE", "W_PCT"];
const DETAILS_COLUMNS: &[&str] = &["GAME_ID", "PLAYER_NAME", "PTS", "FGA", "FGM", "AST", "REB"];

/// Read-only snapshot of the four cleaned tables.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub games: Vec<Game>,
    pub teams: Vec<Team>,
    pub rankings: Vec<RankingSnapshot>,
    pub player_stats: Vec<PlayerGameStat>,
    pub fingerprint: SourceFingerprint,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Seasons present in the games table, newest first.
    pub fn seasons(&self) -> Vec<i32> {
        let seasons: BTreeSet<i32> = self.games.iter().map(|g| g.season).collect();
        seasons.into_iter().rev().collect()
    }

    pub fn latest_season(&self) -> Option<i32> {
        self.games.iter().map(|g| g.season).max()
    }
}

/// Load and clean every source. Any failure aborts the whole load.
pub fn load_dataset(config: &DataConfig) -> Result<Dataset, LoadError> {
    let games_path = config.games_path();
    let teams_path = config.teams_path();
    let ranking_path = config.ranking_path();
    let details_path = config.details_path();

    let fingerprint = prepare_sources(config)?;

    let teams = read_teams(open_source(&teams_path)?)?;
    let game_records = read_game_records(open_source(&games_path)?)?;
    let games = clean_games(game_records, &teams, config.min_season);
    let rankings = clean_rankings(
        read_ranking_records(open_source(&ranking_path)?)?,
        config.min_season,
    )?;
    let player_stats = clean_player_stats(read_player_records(open_source(&details_path)?)?);

    tracing::info!(
        "Loaded {} games, {} teams, {} ranking snapshots, {} player box scores from {}",
        games.len(),
        teams.len(),
        rankings.len(),
        player_stats.len(),
        config.data_dir.display()
    );

    Ok(Dataset {
        games,
        teams,
        rankings,
        player_stats,
        fingerprint,
        loaded_at: Utc::now(),
    })
}

/// Decompress any archived source and fingerprint the plain files.
pub fn prepare_sources(config: &DataConfig) -> Result<SourceFingerprint, LoadError> {
    archive::ensure_plain(&config.games_path(), "games")?;
    archive::ensure_plain(&config.teams_path(), "teams")?;
    archive::ensure_plain(&config.ranking_path(), "ranking")?;
    archive::ensure_plain(&config.details_path(), "games_details")?;
    SourceFingerprint::of(config)
}

fn open_source(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|e| LoadError::io(path, e))
}

fn read_table<T: DeserializeOwned>(
    reader: impl io::Read,
    table: &'static str,
    required: &[&'static str],
) -> Result<Vec<T>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| LoadError::csv(table, e))?.clone();
    for &column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn { table, column });
        }
    }

    rdr.deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| LoadError::csv(table, e))
}

pub fn read_teams(reader: impl io::Read) -> Result<Vec<Team>, LoadError> {
    read_table(reader, "teams", TEAMS_COLUMNS)
}

pub fn read_game_records(reader: impl io::Read) -> Result<Vec<GameRecord>, LoadError> {
    read_table(reader, "games", GAMES_COLUMNS)
}

pub fn read_ranking_records(reader: impl io::Read) -> Result<Vec<RankingRecord>, LoadError> {
    read_table(reader, "ranking", RANKING_COLUMNS)
}

pub fn read_player_records(reader: impl io::Read) -> Result<Vec<PlayerStatRecord>, LoadError> {
    read_table(reader, "games_details", DETAILS_COLUMNS)
}

/// Lenient date parsing: anything unrecognised becomes `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}

/// Season year is the last four characters of the season id ("22022" -> 2022).
pub fn season_year_from_id(season_id: &str) -> Result<i32, LoadError> {
    let trimmed = season_id.trim();
    let digits = match trimmed.char_indices().rev().nth(3) {
        Some((idx, _)) => &trimmed[idx..],
        None => trimmed,
    };
    digits.parse().map_err(|_| LoadError::InvalidSeasonId {
        value: season_id.to_string(),
    })
}

fn indicator(value: Option<f64>) -> Option<bool> {
    match value {
        Some(v) if v == 1.0 => Some(true),
        Some(v) if v == 0.0 => Some(false),
        _ => None,
    }
}

fn date_or_warn(raw: Option<&str>, unparsed: &mut usize) -> Option<NaiveDate> {
    let raw = raw?;
    let parsed = parse_date(raw);
    if parsed.is_none() {
        *unparsed += 1;
    }
    parsed
}

pub fn clean_games(records: Vec<GameRecord>, teams: &[Team], min_season: i32) -> Vec<Game> {
    let labels: HashMap<i64, TeamLabel> = teams
        .iter()
        .map(|t| (t.team_id, TeamLabel::from(t)))
        .collect();

    let mut unparsed_dates = 0usize;
    let mut unmatched_teams = 0usize;

    let games: Vec<Game> = records
        .into_iter()
        .filter(|r| r.season >= min_season)
        .filter_map(|r| {
            let (pts_home, pts_away) = (r.pts_home?, r.pts_away?);
            let home = labels.get(&r.home_team_id).cloned();
            let visitor = labels.get(&r.visitor_team_id).cloned();
            if home.is_none() || visitor.is_none() {
                unmatched_teams += 1;
            }

            Some(Game {
                game_id: r.game_id,
                date: date_or_warn(r.game_date_est.as_deref(), &mut unparsed_dates),
                season: r.season,
                home_team_id: r.home_team_id,
                visitor_team_id: r.visitor_team_id,
                pts_home,
                pts_away,
                total_points: pts_home + pts_away,
                home_team_wins: indicator(r.home_team_wins),
                home,
                visitor,
            })
        })
        .collect();

    if unparsed_dates > 0 {
        tracing::warn!("{} games have an unparseable GAME_DATE_EST", unparsed_dates);
    }
    if unmatched_teams > 0 {
        tracing::warn!("{} games reference a team id missing from teams", unmatched_teams);
    }

    games
}

pub fn clean_rankings(
    records: Vec<RankingRecord>,
    min_season: i32,
) -> Result<Vec<RankingSnapshot>, LoadError> {
    let mut unparsed_dates = 0usize;
    let mut rankings = Vec::with_capacity(records.len());

    for r in records {
        let season_year = season_year_from_id(&r.season_id)?;
        if season_year < min_season {
            continue;
        }
        rankings.push(RankingSnapshot {
            team_id: r.team_id,
            season_year,
            conference: r.conference,
            w_pct: r.w_pct,
            standings_date: date_or_warn(r.standings_date.as_deref(), &mut unparsed_dates),
            season_id: r.season_id,
        });
    }

    if unparsed_dates > 0 {
        tracing::warn!("{} ranking rows have an unparseable STANDINGSDATE", unparsed_dates);
    }

    Ok(rankings)
}

pub fn clean_player_stats(records: Vec<PlayerStatRecord>) -> Vec<PlayerGameStat> {
    records
        .into_iter()
        .map(|r| PlayerGameStat {
            game_id: r.game_id,
            player_name: r.player_name,
            points: r.pts.unwrap_or(0.0),
            field_goal_attempts: r.fga.unwrap_or(0.0),
            field_goals_made: r.fgm.unwrap_or(0.0),
            assists: r.ast.unwrap_or(0.0),
            rebounds: r.reb.unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    pub const TEAMS_CSV: &str = "\
LEAGUE_ID,TEAM_ID,MIN_YEAR,MAX_YEAR,ABBREVIATION,NICKNAME,YEARFOUNDED,CITY
0,1,1949,2019,LAL,Lakers,1948,Los Angeles
0,2,1946,2019,BOS,Celtics,1946,Boston
0,3,1966,2019,CHI,Bulls,1966,Chicago
";

    pub const GAMES_CSV: &str = "\
GAME_DATE_EST,GAME_ID,GAME_STATUS_TEXT,HOME_TEAM_ID,VISITOR_TEAM_ID,SEASON,PTS_home,PTS_away,HOME_TEAM_WINS
2020-12-22,101,Final,1,2,2020,110,100,1
2020-12-25,102,Final,2,1,2020,105,99,1
2021-01-02,103,Final,1,3,2020,120,90,1
2003-11-01,104,Final,1,2,2003,90,88,1
2020-12-30,105,Final,3,2,2020,,101,0
not-a-date,106,Final,9,1,2021,100,110,0
";

    pub const RANKING_CSV: &str = "\
TEAM_ID,LEAGUE_ID,SEASON_ID,STANDINGSDATE,CONFERENCE,TEAM,G,W,L,W_PCT
1,0,22020,2021-01-01,West,Los Angeles,5,4,1,0.8
1,0,22020,2021-05-16,West,Los Angeles,72,42,30,0.583
2,0,22020,2021-05-16,East,Boston,72,36,36,0.5
3,0,22020,2021-05-16,East,Chicago,72,31,41,0.431
1,0,22003,2004-04-14,West,Los Angeles,82,56,26,0.683
";

    pub const DETAILS_CSV: &str = "\
GAME_ID,TEAM_ID,PLAYER_NAME,MIN,FGM,FGA,PTS,AST,REB
101,1,LeBron James,35:00,10,20,28,8,7
101,2,Jayson Tatum,38:00,9,21,25,4,9
102,1,LeBron James,34:00,8,18,22,10,6
102,2,Jayson Tatum,,,,,,
";

    pub fn write_fixture(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("statistella_data_{}", name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("teams.csv"), TEAMS_CSV).unwrap();
        fs::write(dir.join("games.csv"), GAMES_CSV).unwrap();
        fs::write(dir.join("ranking.csv"), RANKING_CSV).unwrap();
        fs::write(dir.join("games_details.csv"), DETAILS_CSV).unwrap();
        dir
    }

    #[test]
    fn season_year_takes_last_four_characters() {
        assert_eq!(season_year_from_id("22022").unwrap(), 2022);
        assert_eq!(season_year_from_id("12009").unwrap(), 2009);
        assert_eq!(season_year_from_id("42019").unwrap(), 2019);
        assert_eq!(season_year_from_id("812").unwrap(), 812);
        assert!(matches!(
            season_year_from_id("2x"),
            Err(LoadError::InvalidSeasonId { .. })
        ));
    }

    #[test]
    fn parse_date_is_lenient() {
        let expected = NaiveDate::from_ymd_opt(2022, 12, 22);
        assert_eq!(parse_date("2022-12-22"), expected);
        assert_eq!(parse_date("2022-12-22 00:00:00"), expected);
        assert_eq!(parse_date("12/22/2022"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn games_are_filtered_scored_and_joined() {
        let teams = read_teams(TEAMS_CSV.as_bytes()).unwrap();
        let records = read_game_records(GAMES_CSV.as_bytes()).unwrap();
        let games = clean_games(records, &teams, 2004);

        // 2003 season and the row without PTS_home are dropped
        assert_eq!(games.len(), 4);
        for game in &games {
            assert!(game.season >= 2004);
            assert_eq!(game.total_points, game.pts_home + game.pts_away);
        }

        let first = &games[0];
        assert_eq!(first.total_points, 210.0);
        assert_eq!(first.home_team_wins, Some(true));
        assert_eq!(first.home.as_ref().unwrap().abbreviation, "LAL");
        assert_eq!(first.visitor.as_ref().unwrap().nickname, "Celtics");

        let orphan = games.iter().find(|g| g.game_id == 106).unwrap();
        assert!(orphan.date.is_none());
        assert!(orphan.home.is_none());
        assert_eq!(orphan.visitor.as_ref().unwrap().city, "Los Angeles");
    }

    #[test]
    fn rankings_derive_season_year() {
        let records = read_ranking_records(RANKING_CSV.as_bytes()).unwrap();
        let rankings = clean_rankings(records, 2004).unwrap();
        assert_eq!(rankings.len(), 4);
        assert!(rankings.iter().all(|r| r.season_year == 2020));
    }

    #[test]
    fn player_stats_coerce_blanks_to_zero() {
        let stats = clean_player_stats(read_player_records(DETAILS_CSV.as_bytes()).unwrap());
        assert_eq!(stats.len(), 4);
        let dnp = &stats[3];
        assert_eq!(dnp.player_name.as_deref(), Some("Jayson Tatum"));
        assert_eq!(dnp.points, 0.0);
        assert_eq!(dnp.field_goal_attempts, 0.0);
        assert_eq!(dnp.rebounds, 0.0);
    }

    #[test]
    fn non_numeric_box_score_cells_become_zero() {
        let csv = "GAME_ID,PLAYER_NAME,PTS,FGA,FGM,AST,REB\n\
101,Bench Guy,DNP,x,0,abc,2\n";
        let stats = clean_player_stats(read_player_records(csv.as_bytes()).unwrap());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].points, 0.0);
        assert_eq!(stats[0].field_goal_attempts, 0.0);
        assert_eq!(stats[0].assists, 0.0);
        assert_eq!(stats[0].rebounds, 2.0);
    }

    #[test]
    fn non_numeric_score_drops_the_game() {
        let csv = "GAME_DATE_EST,GAME_ID,HOME_TEAM_ID,VISITOR_TEAM_ID,SEASON,PTS_home,PTS_away,HOME_TEAM_WINS\n\
2020-12-22,1,1,2,2020,abc,90,1\n\
2020-12-23,2,2,1,2020,101,99,yes\n";
        let teams = read_teams(TEAMS_CSV.as_bytes()).unwrap();
        let games = clean_games(read_game_records(csv.as_bytes()).unwrap(), &teams, 2004);

        let ids: Vec<i64> = games.iter().map(|g| g.game_id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(games[0].home_team_wins, None);
    }

    #[test]
    fn missing_required_column_fails() {
        let csv = "TEAM_ID,ABBREVIATION,CITY\n1,LAL,Los Angeles\n";
        let err = read_teams(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn {
                table: "teams",
                column: "NICKNAME"
            }
        ));
    }

    #[test]
    fn unparsable_season_fails_games_load() {
        let csv = "GAME_DATE_EST,GAME_ID,HOME_TEAM_ID,VISITOR_TEAM_ID,SEASON,PTS_home,PTS_away,HOME_TEAM_WINS\n\
2020-12-22,1,1,2,twenty,100,90,1\n";
        assert!(matches!(
            read_game_records(csv.as_bytes()),
            Err(LoadError::Csv { table: "games", .. })
        ));
    }

    #[test]
    fn load_dataset_reads_all_sources() {
        let dir = write_fixture("full");
        let config = DataConfig::default().with_data_dir(&dir);

        let dataset = load_dataset(&config).unwrap();
        assert_eq!(dataset.games.len(), 4);
        assert_eq!(dataset.teams.len(), 3);
        assert_eq!(dataset.rankings.len(), 4);
        assert_eq!(dataset.player_stats.len(), 4);
        assert_eq!(dataset.seasons(), vec![2021, 2020]);
        assert_eq!(dataset.latest_season(), Some(2021));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_dataset_fails_without_partial_result() {
        let dir = write_fixture("missing_details");
        fs::remove_file(dir.join("games_details.csv")).unwrap();
        let config = DataConfig::default().with_data_dir(&dir);

        let err = load_dataset(&config).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingSource {
                table: "games_details",
                ..
            }
        ));

        let _ = fs::remove_dir_all(&dir);
    }
}
