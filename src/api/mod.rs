use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::{DataConfig, ServerConfig};
use crate::data::{Dataset, DatasetCache};
use crate::models::{ApiResponse, ChartData, FilterOptions, QuickStats, Team};
use crate::services::{aggregate, filter_options, quick_stats, Filters, View};

type ApiError = (StatusCode, Json<ApiResponse<()>>);
type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Clone)]
pub struct AppState {
    cache: Arc<DatasetCache>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl AppState {
    pub fn new(cache: DatasetCache) -> Self {
        Self {
            cache: Arc::new(cache),
            last_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Current snapshot, loading it off the async runtime when stale.
    async fn snapshot(&self) -> Result<Arc<Dataset>, ApiError> {
        let cache = Arc::clone(&self.cache);
        let result = tokio::task::spawn_blocking(move || cache.get_or_load()).await;

        let message = match result {
            Ok(Ok(dataset)) => {
                self.set_last_error(None);
                return Ok(dataset);
            }
            Ok(Err(e)) => format!("Error loading data: {}", e),
            Err(e) => format!("Error loading data: loader task failed: {}", e),
        };

        // Report a given load failure once, not on every request.
        if self.set_last_error(Some(message.clone())) {
            tracing::error!(
                "{} (expected {} in {})",
                message,
                self.cache.config().expected_files(),
                self.cache.config().data_dir.display()
            );
        }
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error(message)),
        ))
    }

    /// Returns true when the stored error changed.
    fn set_last_error(&self, error: Option<String>) -> bool {
        let mut last = self.last_error.lock().unwrap_or_else(PoisonError::into_inner);
        if *last == error {
            return false;
        }
        *last = error;
        true
    }
}

pub async fn serve(server: ServerConfig, data: DataConfig) -> anyhow::Result<()> {
    let state = AppState::new(DatasetCache::new(data));

    // Warm the cache so a broken dataset shows up in the logs at start-up
    if let Ok(dataset) = state.snapshot().await {
        tracing::info!("Dataset ready: {} games", dataset.games.len());
    }

    let mut app = create_router().with_state(state);
    if let Some(dir) = server.static_dir {
        tracing::info!("Serving dashboard assets from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", server.port)).await?;
    tracing::info!("Statistella API server listening on port {}", server.port);

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/filters", get(get_filters_handler))
        .route("/stats/quick", get(get_quick_stats_handler))
        .route("/teams", get(get_teams_handler))
        .route("/views/{view}", get(get_view_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

// Health check endpoint
async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("Statistella API is running"))
}

// GET /filters - Sidebar options (seasons, teams, slider bounds)
async fn get_filters_handler(State(state): State<AppState>) -> ApiResult<FilterOptions> {
    let dataset = state.snapshot().await?;
    Ok(Json(ApiResponse::success(filter_options(&dataset))))
}

// GET /stats/quick - Sidebar quick stats
async fn get_quick_stats_handler(State(state): State<AppState>) -> ApiResult<QuickStats> {
    let dataset = state.snapshot().await?;
    Ok(Json(ApiResponse::success(quick_stats(&dataset))))
}

// GET /teams - Team reference table
async fn get_teams_handler(State(state): State<AppState>) -> ApiResult<Vec<Team>> {
    let dataset = state.snapshot().await?;
    Ok(Json(ApiResponse::success(dataset.teams.clone())))
}

/// Raw query string. Every field is text so a blank selector (`?season=`)
/// reads as "not set" instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
struct ViewQuery {
    season: Option<String>,
    team: Option<String>,
    min_games: Option<String>,
    min_fga: Option<String>,
}

fn parse_param<T: std::str::FromStr>(
    name: &str,
    raw: Option<String>,
) -> Result<Option<T>, String> {
    match raw.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| format!("invalid {} '{}'", name, value)),
    }
}

impl TryFrom<ViewQuery> for Filters {
    type Error = String;

    fn try_from(query: ViewQuery) -> Result<Self, Self::Error> {
        let defaults = Filters::default();
        Ok(Filters {
            season: parse_param("season", query.season)?,
            team: query.team.filter(|t| !t.trim().is_empty()),
            min_games: parse_param("min_games", query.min_games)?.unwrap_or(defaults.min_games),
            min_fga: parse_param("min_fga", query.min_fga)?.unwrap_or(defaults.min_fga),
        })
    }
}

// GET /views/{view} - Chart payload for one dashboard view
async fn get_view_handler(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Query(params): Query<ViewQuery>,
) -> ApiResult<ChartData> {
    let view: View = view.parse().map_err(|message: String| {
        (StatusCode::NOT_FOUND, Json(ApiResponse::error(message)))
    })?;
    let filters = Filters::try_from(params).map_err(|message| {
        (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
    })?;

    let dataset = state.snapshot().await?;
    Ok(Json(ApiResponse::success(aggregate(view, &filters, &dataset))))
}
