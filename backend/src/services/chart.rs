//! Chart of recent observations and the next-day prediction

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use shared::{ChartWindow, Target};

use crate::error::{AppError, AppResult};

/// File name of the chart inside the static directory
pub const PLOT_FILE: &str = "plot.svg";

const CAPTION: &str = "Today's Actual Weather and Tomorrow's Predicted Weather";

/// Renders the chart to a fixed path, replacing the previous one
#[derive(Debug, Clone)]
pub struct ChartService {
    static_dir: PathBuf,
}

struct TargetStyle {
    target: Target,
    actual: RGBColor,
    predicted: RGBColor,
}

const STYLES: [TargetStyle; 3] = [
    TargetStyle {
        target: Target::Tmax,
        actual: RGBColor(31, 119, 180),
        predicted: RED,
    },
    TargetStyle {
        target: Target::Tmin,
        actual: RGBColor(255, 127, 14),
        predicted: BLUE,
    },
    TargetStyle {
        target: Target::Prcp,
        actual: RGBColor(44, 160, 44),
        predicted: GREEN,
    },
];

impl ChartService {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
        }
    }

    pub fn plot_path(&self) -> PathBuf {
        self.static_dir.join(PLOT_FILE)
    }

    /// Draw `window` and return the written file
    pub fn render(&self, window: &ChartWindow) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.static_dir)?;
        let path = self.plot_path();
        draw(&path, window).map_err(|e| AppError::Chart(e.to_string()))?;
        tracing::debug!(path = %path.display(), points = window.history.len(), "Rendered chart");
        Ok(path)
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn value_range(window: &ChartWindow) -> (f64, f64) {
    let values = window
        .history
        .iter()
        .flat_map(|p| Target::ALL.map(|t| p.get(t)))
        .chain(Target::ALL.map(|t| window.prediction.get(t)));

    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    });
    let padding = if (max - min).abs() > 1e-6 {
        (max - min) * 0.1
    } else {
        1.0
    };
    (min - padding, max + padding)
}

fn draw(path: &Path, window: &ChartWindow) -> Result<(), Box<dyn Error>> {
    let first = window.history.first().ok_or("chart window has no observations")?;
    let last = window.last_point().ok_or("chart window has no observations")?;

    let x_start = midnight(first.date);
    let x_end = midnight(window.next_date + chrono::Duration::days(1));
    let last_x = midnight(window.last_date);
    let next_x = midnight(window.next_date);
    let (y_min, y_max) = value_range(window);

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(CAPTION, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(RangedDateTime::from(x_start..x_end), y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Value")
        .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%m-%d").to_string())
        .light_line_style(BLACK.mix(0.1))
        .draw()?;

    // dashed marker at the last observed day
    let step = (y_max - y_min) / 40.0;
    chart.draw_series((0..40).step_by(2).map(|i| {
        let y0 = y_min + step * f64::from(i);
        PathElement::new(vec![(last_x, y0), (last_x, y0 + step)], BLACK.mix(0.4).stroke_width(1))
    }))?;

    for style in &STYLES {
        let name = style.target.column();
        let actual = style.actual;
        let predicted = style.predicted;
        let history: Vec<(NaiveDateTime, f64)> = window
            .history
            .iter()
            .map(|p| (midnight(p.date), p.get(style.target)))
            .collect();

        chart
            .draw_series(LineSeries::new(history.iter().copied(), actual.stroke_width(2)))?
            .label(format!("Actual {} (last {} days)", name, window.history.len()))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], actual.stroke_width(2))
            });
        chart.draw_series(
            history
                .iter()
                .map(|&coord| Circle::new(coord, 3, actual.filled())),
        )?;

        let value = window.prediction.get(style.target);
        let segment = [(last_x, last.get(style.target)), (next_x, value)];
        chart
            .draw_series(LineSeries::new(segment, predicted.stroke_width(2)))?
            .label(format!("Predicted {}", name))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], predicted.stroke_width(2))
            });
        chart.draw_series(
            segment
                .iter()
                .map(|&coord| Circle::new(coord, 4, predicted.filled())),
        )?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{:.2}", value),
            (next_x, value),
            ("sans-serif", 14).into_font().color(&predicted),
        )))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}
