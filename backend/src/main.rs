//! Weather Forecast - Backend Server
//!
//! Fetches daily history for a fixed location, trains ridge regressions on
//! it and serves tomorrow's predicted tmax, tmin and prcp with a chart.

use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::MeteostatClient;
use services::{ForecastService, ForecastSettings};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub forecast: ForecastService,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = MeteostatClient::with_base_url(
            config.meteostat.api_key.clone(),
            config.meteostat.api_endpoint.clone(),
        );
        let forecast = ForecastService::new(client, ForecastSettings::from_config(&config));

        Self {
            config: Arc::new(config),
            forecast,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wf_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Weather Forecast Server");
    tracing::info!("Environment: {}", config.environment);
    if config.meteostat.api_key.is_empty() {
        tracing::warn!("WF_METEOSTAT__API_KEY is not set, data source requests will be rejected");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state
    let state = AppState::new(config);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::app_routes(&state.config.chart.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
