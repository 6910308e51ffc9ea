// In crates/web-server/src/lib.rs

use std::sync::Arc;

use app_config::{DashboardSettings, ServerSettings};
use axum::{
    Router,
    extract::{Query, State},
    response::{Html, Json},
    routing::get,
};
use core_types::{Interval, Symbol};
use engine::Pipeline;
use tokio::net::TcpListener;

pub mod error;
pub mod types;

use types::{DashboardQuery, DashboardResponse, OptionsResponse};

// Re-export our custom error type for convenience.
pub use error::{Error, Result};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// The shared application state that is available to all handlers.
///
/// Both fields are immutable; every request runs its own pipeline pass.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub dashboard: Arc<DashboardSettings>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, dashboard: DashboardSettings) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            dashboard: Arc::new(dashboard),
        }
    }
}

/// Creates the main application router with all routes and middleware.
pub fn create_router(app_state: AppState) -> Router {
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let api_router = Router::new()
        .route("/options", get(options_handler))
        .route("/dashboard", get(dashboard_handler));

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_check_handler))
        .nest("/api", api_router)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Serves the single-page dashboard.
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_check_handler() -> &'static str {
    "OK"
}

/// Handler for `GET /api/options`
async fn options_handler(State(state): State<AppState>) -> Json<OptionsResponse> {
    let dashboard = &state.dashboard;
    Json(OptionsResponse {
        symbols: dashboard.symbols.clone(),
        intervals: Interval::ALL.iter().map(Interval::as_str).collect(),
        default_symbol: dashboard.default_symbol.clone(),
        default_interval: dashboard.default_interval.clone(),
        table_rows: dashboard.table_rows,
    })
}

/// Handler for `GET /api/dashboard`
///
/// Runs one fetch → indicators → signal pass. Fetch problems are not HTTP
/// errors: they come back as an empty `bars` array with a `warning`.
async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>> {
    let (symbol, interval) = resolve_selection(&state.dashboard, query)?;
    let snapshot = state.pipeline.run(&symbol, interval).await;
    Ok(Json(DashboardResponse::from_snapshot(
        snapshot,
        state.dashboard.table_rows,
    )))
}

fn resolve_selection(
    dashboard: &DashboardSettings,
    query: DashboardQuery,
) -> Result<(Symbol, Interval)> {
    let symbol = match query.symbol {
        Some(s) if dashboard.offers(&s) => Symbol(s),
        Some(s) => return Err(Error::BadRequest(format!("Unsupported symbol '{s}'"))),
        None => dashboard.default_symbol(),
    };
    let raw_interval = query
        .interval
        .unwrap_or_else(|| dashboard.default_interval.clone());
    let interval = raw_interval
        .parse::<Interval>()
        .map_err(|e| Error::BadRequest(e.to_string()))?;
    Ok((symbol, interval))
}

/// The main entry point for running the web server.
///
/// This function sets up the TCP listener and serves the application router.
/// It will run forever until the process is terminated.
pub async fn run(settings: &ServerSettings, app_state: AppState) -> Result<()> {
    let app = create_router(app_state);

    let address = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(Error::ServerBindError)?;
    tracing::info!("Dashboard listening on http://{}", address);

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(Error::Serve)
}
