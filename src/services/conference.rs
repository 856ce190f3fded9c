use std::collections::BTreeMap;

use crate::models::{
    ConferenceDistribution, ConferencePoint, ConferenceSeries, RankingSnapshot, Team, TeamWinPct,
};
use crate::utils::{box_summary, mean};

/// Keep the snapshot with the latest standings date for every
/// (season id, team) pair. When several rows share that date the last one in
/// input order wins. Output is ordered by season id, then team id.
pub fn latest_rankings(rankings: &[RankingSnapshot]) -> Vec<RankingSnapshot> {
    let mut latest: BTreeMap<(&str, i64), &RankingSnapshot> = BTreeMap::new();
    for snapshot in rankings {
        let key = (snapshot.season_id.as_str(), snapshot.team_id);
        let replace = latest
            .get(&key)
            .map_or(true, |current| snapshot.standings_date >= current.standings_date);
        if replace {
            latest.insert(key, snapshot);
        }
    }
    latest.into_values().cloned().collect()
}

/// Average season-end win percentage per conference and season year.
pub fn conference_trend(latest: &[RankingSnapshot]) -> Vec<ConferenceSeries> {
    let mut grouped: BTreeMap<&str, BTreeMap<i32, Vec<f64>>> = BTreeMap::new();
    for snapshot in latest {
        let (Some(conference), Some(w_pct)) = (snapshot.conference.as_deref(), snapshot.w_pct)
        else {
            continue;
        };
        grouped
            .entry(conference)
            .or_default()
            .entry(snapshot.season_year)
            .or_default()
            .push(w_pct);
    }

    grouped
        .into_iter()
        .map(|(conference, seasons)| ConferenceSeries {
            conference: conference.to_string(),
            points: seasons
                .into_iter()
                .filter_map(|(season_year, values)| {
                    Some(ConferencePoint {
                        season_year,
                        avg_w_pct: mean(&values)?,
                        teams: values.len(),
                    })
                })
                .collect(),
        })
        .collect()
}

/// Per-team win percentages and their five-number summary, per conference,
/// for one season year.
pub fn conference_distribution(
    latest: &[RankingSnapshot],
    season_year: i32,
    teams: &[Team],
) -> Vec<ConferenceDistribution> {
    let mut grouped: BTreeMap<&str, Vec<TeamWinPct>> = BTreeMap::new();
    for snapshot in latest.iter().filter(|s| s.season_year == season_year) {
        let (Some(conference), Some(w_pct)) = (snapshot.conference.as_deref(), snapshot.w_pct)
        else {
            continue;
        };
        grouped.entry(conference).or_default().push(TeamWinPct {
            team_id: snapshot.team_id,
            abbreviation: teams
                .iter()
                .find(|t| t.team_id == snapshot.team_id)
                .map(|t| t.abbreviation.clone()),
            w_pct,
        });
    }

    grouped
        .into_iter()
        .filter_map(|(conference, teams)| {
            let values: Vec<f64> = teams.iter().map(|t| t.w_pct).collect();
            Some(ConferenceDistribution {
                conference: conference.to_string(),
                summary: box_summary(&values)?,
                teams,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snapshot(
        team_id: i64,
        season_id: &str,
        date: Option<(i32, u32, u32)>,
        conference: &str,
        w_pct: f64,
    ) -> RankingSnapshot {
        RankingSnapshot {
            team_id,
            season_id: season_id.to_string(),
            season_year: season_id[season_id.len() - 4..].parse().unwrap(),
            conference: Some(conference.to_string()),
            w_pct: Some(w_pct),
            standings_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
    }

    fn sample() -> Vec<RankingSnapshot> {
        vec![
            snapshot(1, "22020", Some((2021, 1, 1)), "West", 0.8),
            snapshot(1, "22020", Some((2021, 5, 16)), "West", 0.6),
            snapshot(2, "22020", Some((2021, 5, 16)), "East", 0.5),
            snapshot(2, "22020", Some((2021, 3, 1)), "East", 0.7),
            snapshot(3, "22020", Some((2021, 5, 16)), "East", 0.3),
            snapshot(4, "22020", Some((2021, 5, 16)), "West", 0.4),
            snapshot(1, "22021", Some((2022, 4, 10)), "West", 0.7),
            snapshot(2, "22021", Some((2022, 4, 10)), "East", 0.45),
        ]
    }

    #[test]
    fn latest_snapshot_wins_per_team_season() {
        let latest = latest_rankings(&sample());
        assert_eq!(latest.len(), 6);
        let lakers_2020 = latest
            .iter()
            .find(|r| r.team_id == 1 && r.season_id == "22020")
            .unwrap();
        assert_eq!(lakers_2020.w_pct, Some(0.6));
        let celtics_2020 = latest
            .iter()
            .find(|r| r.team_id == 2 && r.season_id == "22020")
            .unwrap();
        assert_eq!(celtics_2020.w_pct, Some(0.5));
    }

    #[test]
    fn tie_on_date_keeps_last_row() {
        let rows = vec![
            snapshot(1, "22020", Some((2021, 5, 16)), "West", 0.55),
            snapshot(1, "22020", Some((2021, 5, 16)), "West", 0.6),
        ];
        let latest = latest_rankings(&rows);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].w_pct, Some(0.6));
    }

    #[test]
    fn dated_rows_beat_undated_rows() {
        let rows = vec![
            snapshot(1, "22020", Some((2021, 1, 1)), "West", 0.8),
            snapshot(1, "22020", None, "West", 0.1),
        ];
        assert_eq!(latest_rankings(&rows)[0].w_pct, Some(0.8));
    }

    #[test]
    fn latest_selection_is_idempotent() {
        let once = latest_rankings(&sample());
        let twice = latest_rankings(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn trend_averages_per_conference() {
        let series = conference_trend(&latest_rankings(&sample()));
        assert_eq!(series.len(), 2);

        let east = &series[0];
        assert_eq!(east.conference, "East");
        assert_eq!(east.points[0].season_year, 2020);
        assert!((east.points[0].avg_w_pct - 0.4).abs() < 1e-9);
        assert_eq!(east.points[0].teams, 2);

        let west = &series[1];
        assert!((west.points[0].avg_w_pct - 0.5).abs() < 1e-9);
        assert_eq!(west.points[1].season_year, 2021);
        assert!((west.points[1].avg_w_pct - 0.7).abs() < 1e-9);
    }

    #[test]
    fn distribution_for_one_season() {
        let latest = latest_rankings(&sample());
        let dist = conference_distribution(&latest, 2020, &[]);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].conference, "East");
        assert_eq!(dist[0].summary.count, 2);
        assert_eq!(dist[0].summary.min, 0.3);
        assert_eq!(dist[0].summary.max, 0.5);
        assert!((dist[0].summary.median - 0.4).abs() < 1e-9);

        assert!(conference_distribution(&latest, 1999, &[]).is_empty());
    }
}
