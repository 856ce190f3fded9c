//! Narrative text shown next to each chart.

use crate::models::{
    Annotation, HomeAdvantageSummary, ScoringInsight, SeasonScoring, TrendDirection,
};
use crate::utils::mean;

pub const EARLY_ERA_LAST_SEASON: i32 = 2010;
pub const RECENT_ERA_FIRST_SEASON: i32 = 2018;
pub const THREE_POINT_ERA_SEASON: i32 = 2015;

/// Compare mean scoring of the early era against the recent era.
pub fn scoring_insight(points: &[SeasonScoring]) -> Option<ScoringInsight> {
    let early: Vec<f64> = points
        .iter()
        .filter(|p| p.season <= EARLY_ERA_LAST_SEASON)
        .map(|p| p.avg_total_points)
        .collect();
    let recent: Vec<f64> = points
        .iter()
        .filter(|p| p.season >= RECENT_ERA_FIRST_SEASON)
        .map(|p| p.avg_total_points)
        .collect();

    let early_avg = mean(&early)?;
    let recent_avg = mean(&recent)?;
    if early_avg == 0.0 {
        return None;
    }

    let pct_change = (recent_avg - early_avg) / early_avg * 100.0;
    let direction = if pct_change > 0.0 {
        TrendDirection::Upward
    } else {
        TrendDirection::Downward
    };

    Some(ScoringInsight {
        early_avg,
        recent_avg,
        pct_change,
        direction,
        text: format!(
            "NBA scoring has changed by {:.1}% from the early 2000s to recent seasons. \
             Note the spike in scoring post-2015, correlating with the league-wide shift \
             to perimeter shooting and pace-and-space offense.",
            pct_change
        ),
    })
}

/// Marker on the scoring chart at the start of the three-point era.
pub fn three_point_annotation(points: &[SeasonScoring]) -> Option<Annotation> {
    let season = points.iter().find(|p| p.season == THREE_POINT_ERA_SEASON)?;
    Some(Annotation {
        x: season.season as f64,
        y: season.avg_total_points + 5.0,
        text: "3-Point Revolution Era Begins".to_string(),
    })
}

pub fn home_advantage_summary(summary: &HomeAdvantageSummary) -> String {
    format!(
        "Historically, home teams win approximately {:.1}% of games, representing a {:.1}% \
         advantage over pure chance. Teams should prioritize securing home court advantage \
         in playoff positioning.",
        summary.home_win_pct,
        summary.home_win_pct - 50.0
    )
}

pub fn team_verdict(final_win_pct: f64) -> &'static str {
    if final_win_pct >= 60.0 {
        "Strong playoff contender status maintained."
    } else if final_win_pct >= 45.0 {
        "Reliable mid-tier performance."
    } else {
        "Rebuilding phase indicated."
    }
}

pub fn team_summary(
    nickname: &str,
    season: i32,
    wins: u32,
    losses: u32,
    final_win_pct: f64,
) -> String {
    format!(
        "The {} finished the {} season with a {:.1}% win rate ({}-{}). {}",
        nickname,
        season,
        final_win_pct,
        wins,
        losses,
        team_verdict(final_win_pct)
    )
}

pub fn player_summary(player_name: &str, season: i32) -> String {
    format!(
        "{} leads as the most impactful scorer in {}, combining elite volume shooting \
         with exceptional efficiency.",
        player_name, season
    )
}
