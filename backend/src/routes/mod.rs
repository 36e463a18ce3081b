//! Route definitions for the weather forecast server

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use crate::{handlers, AppState};

/// Page, chart and health routes
pub fn app_routes(static_dir: &str) -> Router<AppState> {
    Router::new()
        // Forecast page (runs the full pipeline)
        .route("/", get(handlers::index))
        // Health check
        .route("/health", get(handlers::health_check))
        // Generated chart
        .nest_service("/static", ServeDir::new(static_dir))
}
