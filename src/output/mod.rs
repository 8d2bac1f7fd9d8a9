//! Writers for sweep tables and charts

mod table;
mod chart;

pub use chart::{render_svg, write_charts, ChartSpec};
pub use table::{to_json, write_csv, write_csv_path, write_json_path, write_tables};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Format a decimal rate as a percentage string
pub fn format_percent(rate: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, rate * 100.0)
}
