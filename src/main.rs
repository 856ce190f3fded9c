mod api;
mod cli;
mod config;
mod data;
mod error;
mod models;
mod services;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{DataConfig, ServerConfig, DEFAULT_MIN_FGA, DEFAULT_MIN_GAMES};

#[derive(Parser)]
#[command(name = "statistella")]
#[command(about = "NBA analytics dashboard backend over the Kaggle box-score tables")]
struct Cli {
    /// Directory holding games.csv, teams.csv, ranking.csv and games_details.csv
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Headline numbers for the loaded dataset
    Overview,
    /// Scoring evolution and home court advantage
    Trends {
        #[arg(short, long)]
        season: Option<i32>,
        #[arg(long)]
        json: bool,
    },
    /// Conference win percentage over time and per-season spread
    Conference {
        #[arg(short, long)]
        season: Option<i32>,
        #[arg(long)]
        json: bool,
    },
    /// Season breakdown for one team
    Team {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        season: Option<i32>,
        #[arg(long)]
        json: bool,
    },
    /// Volume vs efficiency for qualified players
    Players {
        #[arg(short, long)]
        season: Option<i32>,
        #[arg(long, default_value_t = DEFAULT_MIN_GAMES)]
        min_games: u32,
        #[arg(long, default_value_t = DEFAULT_MIN_FGA)]
        min_fga: f64,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing on stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut data_config = DataConfig::from_env();
    if let Some(dir) = cli.data_dir {
        data_config = data_config.with_data_dir(dir);
    }

    match cli.command {
        Some(Commands::Serve { port }) => {
            tracing::info!("Starting Statistella API server on port {}", port);
            api::serve(ServerConfig::from_env(port), data_config).await?;
        }
        Some(Commands::Overview) => {
            cli::show_overview(&data_config)?;
        }
        Some(Commands::Trends { season, json }) => {
            tracing::info!("Building scoring and home advantage trends");
            cli::show_trends(&data_config, season, json)?;
        }
        Some(Commands::Conference { season, json }) => {
            tracing::info!("Building conference reports");
            cli::show_conference(&data_config, season, json)?;
        }
        Some(Commands::Team { name, season, json }) => {
            tracing::info!("Querying team: {}", name);
            cli::query_team(&data_config, &name, season, json)?;
        }
        Some(Commands::Players {
            season,
            min_games,
            min_fga,
            json,
        }) => {
            tracing::info!("Ranking players (min {} games, {} FGA)", min_games, min_fga);
            cli::show_players(&data_config, season, min_games, min_fga, json)?;
        }
        None => {
            // Default to serving
            tracing::info!("Starting Statistella API server on port 3000");
            api::serve(ServerConfig::from_env(3000), data_config).await?;
        }
    }

    Ok(())
}
