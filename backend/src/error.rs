//! Error handling for the weather forecast server
//!
//! Any failure aborts the whole request; there are no partial results.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::ForecastError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // External service errors
    #[error("Weather data source error: {0}")]
    DataSource(String),

    // Persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Modeling errors
    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),

    // Rendering errors
    #[error("Chart error: {0}")]
    Chart(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// HTTP status and stable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::DataSource(_) => (StatusCode::BAD_GATEWAY, "DATA_SOURCE_ERROR"),
            AppError::Storage(_) | AppError::Csv(_) | AppError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
            AppError::Forecast(_) => (StatusCode::INTERNAL_SERVER_ERROR, "FORECAST_ERROR"),
            AppError::Chart(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CHART_ERROR"),
            AppError::Internal(_) | AppError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            AppError::InternalError(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (
            status,
            Json(ErrorResponse {
                error: ErrorDetail {
                    code: code.to_string(),
                    message,
                },
            }),
        )
            .into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_maps_to_bad_gateway() {
        let err = AppError::DataSource("timeout".to_string());
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_GATEWAY, "DATA_SOURCE_ERROR")
        );
    }

    #[test]
    fn test_forecast_error_conversion() {
        let err: AppError = ForecastError::EmptySeries.into();
        assert_eq!(err.status_and_code().1, "FORECAST_ERROR");
        assert_eq!(
            err.to_string(),
            "Forecast error: Series has no observations"
        );
    }

    #[test]
    fn test_response_status() {
        let response = AppError::Chart("no data".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
