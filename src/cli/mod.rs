use anyhow::Result;

use crate::config::DataConfig;
use crate::data::{load_dataset, Dataset};
use crate::models::*;
use crate::services::{aggregate, filter_options, quick_stats, Filters, View};
use crate::utils::format_thousands;

fn load(config: &DataConfig) -> Result<Dataset> {
    match load_dataset(config) {
        Ok(dataset) => Ok(dataset),
        Err(e) => {
            println!("❌ Error loading data: {}", e);
            println!(
                "💡 Expected {} in {}",
                config.expected_files(),
                config.data_dir.display()
            );
            Err(e.into())
        }
    }
}

fn emit(charts: &[ChartData], json: bool) -> Result<()> {
    if json {
        let out = match charts {
            [single] => serde_json::to_string_pretty(single)?,
            _ => serde_json::to_string_pretty(charts)?,
        };
        println!("{}", out);
        return Ok(());
    }

    for (i, chart) in charts.iter().enumerate() {
        if i > 0 {
            println!();
        }
        render(chart);
    }
    Ok(())
}

pub fn show_overview(config: &DataConfig) -> Result<()> {
    let dataset = load(config)?;
    let stats = quick_stats(&dataset);
    let options = filter_options(&dataset);

    println!("🏀 Statistella: NBA Analytics Overview\n");
    println!("📊 Quick Stats:");
    println!("   Total Games: {}", format_thousands(stats.total_games));
    match (stats.first_season, stats.last_season) {
        (Some(first), Some(last)) => println!(
            "   Seasons Covered: {} ({}-{})",
            stats.seasons_covered, first, last
        ),
        _ => println!("   Seasons Covered: 0"),
    }
    if let Some(avg) = stats.avg_total_points {
        println!("   Avg Points/Game: {:.1}", avg);
    }
    println!("   Teams: {}", dataset.teams.len());
    if let Some(season) = options.default_season {
        println!("   Default Season: {}", season);
    }
    println!("   Player Box Scores: {}", format_thousands(dataset.player_stats.len()));
    println!("   Loaded: {}", dataset.loaded_at.format("%Y-%m-%d %H:%M:%S UTC"));

    println!("\n📋 Views:");
    for view in View::ALL {
        println!("   • {}", view);
    }

    println!("\n💡 Use 'statistella team --name <team>' for a season breakdown");
    println!("💡 Use 'statistella serve' to start the dashboard API");

    Ok(())
}

pub fn show_trends(config: &DataConfig, season: Option<i32>, json: bool) -> Result<()> {
    let dataset = load(config)?;
    let filters = Filters::for_season(season);
    let charts = [
        aggregate(View::ScoringTrend, &filters, &dataset),
        aggregate(View::HomeAdvantage, &filters, &dataset),
    ];
    emit(&charts, json)
}

pub fn show_conference(config: &DataConfig, season: Option<i32>, json: bool) -> Result<()> {
    let dataset = load(config)?;
    let filters = Filters::for_season(season);
    let charts = [
        aggregate(View::ConferenceTrend, &filters, &dataset),
        aggregate(View::ConferenceDistribution, &filters, &dataset),
    ];
    emit(&charts, json)
}

pub fn query_team(
    config: &DataConfig,
    team_name: &str,
    season: Option<i32>,
    json: bool,
) -> Result<()> {
    let dataset = load(config)?;
    if !json {
        println!("🔍 Searching for team: {}\n", team_name);
    }
    let filters = Filters::for_season(season).with_team(team_name);
    let chart = aggregate(View::TeamPerformance, &filters, &dataset);
    emit(std::slice::from_ref(&chart), json)?;

    if chart.is_empty() && !json {
        println!("\n💡 Available teams:");
        for team in &dataset.teams {
            println!("   • {} ({})", team.nickname, team.abbreviation);
        }
    }
    Ok(())
}

pub fn show_players(
    config: &DataConfig,
    season: Option<i32>,
    min_games: u32,
    min_fga: f64,
    json: bool,
) -> Result<()> {
    let dataset = load(config)?;
    let filters = Filters {
        season,
        team: None,
        min_games,
        min_fga,
    };
    emit(&[aggregate(View::PlayerImpact, &filters, &dataset)], json)
}

fn render(chart: &ChartData) {
    match chart {
        ChartData::ScoringTrend(chart) => render_scoring(chart),
        ChartData::HomeAdvantage(chart) => render_home_advantage(chart),
        ChartData::ConferenceTrend(chart) => render_conference_trend(chart),
        ChartData::ConferenceDistribution(chart) => render_distribution(chart),
        ChartData::TeamPerformance(perf) => render_team(perf),
        ChartData::PlayerImpact(chart) => render_players(chart),
        ChartData::NoData { message } => println!("📭 {}", message),
    }
}

fn render_scoring(chart: &ScoringTrendChart) {
    println!("📈 Scoring Evolution:");
    for point in &chart.points {
        println!(
            "   {}  {:.1} pts (home {:.1} | away {:.1}) over {} games",
            point.season,
            point.avg_total_points,
            point.avg_home_points,
            point.avg_away_points,
            format_thousands(point.games)
        );
    }

    if let Some(annotation) = &chart.annotation {
        println!("\n📌 {}: {}", annotation.x, annotation.text);
    }
    if let Some(insight) = &chart.insight {
        println!(
            "\n💡 {}: {:.1} → {:.1} ({:+.1}%)",
            insight.direction, insight.early_avg, insight.recent_avg, insight.pct_change
        );
        println!("   {}", insight.text);
    }
}

fn render_home_advantage(chart: &HomeAdvantageChart) {
    let global = &chart.global;
    println!("🏠 Home Court Advantage:");
    println!(
        "   Home wins: {} ({:.1}%) | Away wins: {} ({:.1}%)",
        format_thousands(global.home_wins),
        global.home_win_pct,
        format_thousands(global.away_wins),
        global.away_win_pct
    );

    println!("\n📅 By Season (baseline {:.0}%):", chart.baseline);
    for season in &chart.by_season {
        println!(
            "   {}  {:.1}% ({}/{})",
            season.season, season.home_win_pct, season.home_wins, season.games
        );
    }

    println!("\n💡 {}", chart.insight);
}

fn render_conference_trend(chart: &ConferenceTrendChart) {
    println!("🏆 Conference Win % Over Time:");
    for series in &chart.series {
        println!("\n📊 {}:", series.conference);
        for point in &series.points {
            println!(
                "   {}  {:.3} ({} teams)",
                point.season_year, point.avg_w_pct, point.teams
            );
        }
    }
}

fn render_distribution(chart: &ConferenceDistributionChart) {
    println!("🏆 Conference Standings {}:", chart.season_year);
    for conference in &chart.conferences {
        let s = &conference.summary;
        println!(
            "\n📊 {} ({} teams): min {:.3} | q1 {:.3} | median {:.3} | q3 {:.3} | max {:.3}",
            conference.conference, s.count, s.min, s.q1, s.median, s.q3, s.max
        );
        for team in &conference.teams {
            let label = team
                .abbreviation
                .clone()
                .unwrap_or_else(|| team.team_id.to_string());
            println!("   • {} {:.3}", label, team.w_pct);
        }
    }
}

fn render_team(perf: &TeamPerformance) {
    println!("📊 {} {} Season:", perf.nickname, perf.season);
    println!(
        "   Record: {}-{} ({:.1}%)",
        perf.total_wins, perf.total_losses, perf.final_win_pct
    );
    println!("   Home: {} | Away: {}", perf.home_record, perf.away_record);
    println!("   Recent Form: {}", perf.recent_form);

    println!("\n📅 Game Log:");
    for entry in &perf.game_log {
        let date = entry
            .date
            .map(|d| d.format("%m/%d").to_string())
            .unwrap_or_else(|| "--/--".to_string());
        let venue = if entry.is_home { "vs" } else { "at" };
        let opponent = entry
            .opponent
            .clone()
            .unwrap_or_else(|| entry.opponent_id.to_string());
        println!(
            "   {:>3}. {} {} {} ({}-{}) {}  {:.3}",
            entry.game_number,
            date,
            venue,
            opponent,
            entry.points_for,
            entry.points_against,
            if entry.won { "W" } else { "L" },
            entry.win_pct
        );
    }

    println!("\n💡 {}", perf.insight);
}

fn render_players(chart: &PlayerImpactChart) {
    println!(
        "🏀 Player Impact {} (min {} games, {} FGA):",
        chart.season, chart.min_games, chart.min_fga
    );
    println!(
        "   {} qualified players | median FGA/game {:.1} | median PPG {:.1}",
        chart.qualified.len(),
        chart.median_usage,
        chart.median_ppg
    );

    if chart.top_performers.is_empty() {
        println!("\n📭 Nobody is above both medians");
    } else {
        println!("\n⭐ High Volume & High Efficiency:");
        for (i, player) in chart.top_performers.iter().enumerate() {
            println!(
                "{:>2}. {}: {:.1} PPG | {:.1} FGA/game | FG {:.1}% | {} games",
                i + 1,
                player.player_name,
                player.ppg,
                player.usage_rate,
                player.fg_pct,
                player.games_played
            );
        }
    }

    if let Some(insight) = &chart.insight {
        println!("\n💡 {}", insight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::write_fixture;

    #[test]
    fn missing_data_is_an_error() {
        let dir = std::env::temp_dir().join("statistella_cli_missing");
        let _ = std::fs::remove_dir_all(&dir);
        let config = DataConfig::default().with_data_dir(&dir);
        assert!(show_overview(&config).is_err());
        assert!(show_trends(&config, None, true).is_err());
    }

    #[test]
    fn reports_run_over_fixture() {
        let dir = write_fixture("cli_reports");
        let config = DataConfig::default().with_data_dir(&dir);

        show_overview(&config).unwrap();
        show_trends(&config, None, false).unwrap();
        show_conference(&config, Some(2020), false).unwrap();
        query_team(&config, "Lakers", Some(2020), false).unwrap();
        query_team(&config, "Laker", None, false).unwrap();
        show_players(&config, Some(2020), 1, 10.0, true).unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }
}
