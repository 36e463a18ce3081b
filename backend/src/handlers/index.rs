//! Forecast page handler

use axum::{extract::State, response::Html};

use crate::error::AppResult;
use crate::services::chart::PLOT_FILE;
use crate::services::ForecastReport;
use crate::AppState;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Run the whole pipeline and render the page
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    tracing::info!(
        lat = state.config.location.latitude,
        lon = state.config.location.longitude,
        "Forecast requested"
    );
    let report = state.forecast.run().await?;
    Ok(Html(render_index(&report, &plot_url())))
}

/// URL the chart is served under
pub fn plot_url() -> String {
    format!("/static/{}", PLOT_FILE)
}

pub fn render_index(report: &ForecastReport, plot_url: &str) -> String {
    INDEX_TEMPLATE
        .replace("{{ next_date }}", &report.next_date.format("%Y-%m-%d").to_string())
        .replace("{{ tmax }}", &format!("{:?}", report.prediction.tmax))
        .replace("{{ tmin }}", &format!("{:?}", report.prediction.tmin))
        .replace("{{ prcp }}", &format!("{:?}", report.prediction.prcp))
        .replace("{{ plot_url }}", plot_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::Prediction;
    use std::path::PathBuf;

    #[test]
    fn test_render_index_fills_placeholders() {
        let report = ForecastReport {
            prediction: Prediction {
                tmax: 21.37,
                tmin: 9.5,
                prcp: 0.0,
            },
            predictors: vec!["tavg".to_string()],
            last_date: NaiveDate::from_ymd_opt(2024, 5, 29).unwrap(),
            next_date: NaiveDate::from_ymd_opt(2024, 5, 30).unwrap(),
            observations: 30,
            csv_path: None,
            plot_path: PathBuf::from("static/plot.svg"),
        };

        let html = render_index(&report, &plot_url());
        assert!(html.contains("<td>21.37</td>"));
        assert!(html.contains("<td>9.5</td>"));
        assert!(html.contains("<td>0.0</td>"));
        assert!(html.contains("src=\"/static/plot.svg\""));
        assert!(html.contains("2024-05-30"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_render_index_keeps_float_form() {
        let report = ForecastReport {
            prediction: Prediction {
                tmax: 18.0,
                tmin: -0.0,
                prcp: 0.0,
            },
            predictors: vec![],
            last_date: NaiveDate::from_ymd_opt(2024, 5, 29).unwrap(),
            next_date: NaiveDate::from_ymd_opt(2024, 5, 30).unwrap(),
            observations: 30,
            csv_path: None,
            plot_path: PathBuf::from("static/plot.svg"),
        };

        let html = render_index(&report, &plot_url());
        assert!(html.contains("<td>18.0</td>"));
        assert!(html.contains("<td>-0.0</td>"));
        assert!(html.contains("<td>0.0</td>"));
    }
}
