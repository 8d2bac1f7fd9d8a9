//! SVG rendering of sweep tables
//!
//! Each chart is a grouped stacked bar chart: per sample one bar per
//! market (lent APR below, unlent APR on top), borrow APR lines overlaid
//! and a dashed horizontal line at the wrapper yield. Non-finite values
//! are left out of the drawing.

use log::info;
use std::path::{Path, PathBuf};

use super::{format_percent, OutputError};
use crate::rates::{AprComponent, Market};
use crate::scenario::{ScenarioConfig, ScenarioReport};
use crate::sweep::{SweepAxis, SweepTable};

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 800.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 280.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 100.0;
const Y_TICKS: usize = 6;

/// Bar width as a fraction of one sample slot
const BAR_WIDTH: f64 = 0.35;

const YIELD_LINE_COLOR: &str = "#8e44ad";
const GRID_COLOR: &str = "#cccccc";

/// (lent, unlent) bar colors
fn bar_colors(market: Market) -> (&'static str, &'static str) {
    match market {
        Market::Base => ("#2ecc71", "#27ae60"),
        Market::Wrapper => ("#3498db", "#2980b9"),
    }
}

fn line_color(market: Market) -> &'static str {
    match market {
        Market::Base => "#e74c3c",
        Market::Wrapper => "#9b59b6",
    }
}

/// What to draw on top of a sweep table
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,

    /// Markets whose borrow APR gets a line
    pub borrow_lines: Vec<Market>,

    /// Label every n-th x tick
    pub label_every: usize,

    /// Height of the dashed reference line
    pub wrapper_yield: f64,
}

impl ChartSpec {
    /// Default chart for a sweep axis under a scenario
    pub fn for_axis(axis: SweepAxis, config: &ScenarioConfig) -> Self {
        let utilization = format_percent(config.utilization_rate, 0);
        match axis {
            SweepAxis::Utilization => Self {
                title: format!(
                    "APR Comparison: frxUSD vs sfrxUSD ({} Borrow Rate)",
                    format_percent(config.borrow_rate, 0)
                ),
                borrow_lines: vec![Market::Base],
                label_every: 1,
                wrapper_yield: config.wrapper_yield,
            },
            SweepAxis::BorrowRate => Self {
                title: format!("APR Comparison at {} Utilization", utilization),
                borrow_lines: vec![Market::Base],
                label_every: 5,
                wrapper_yield: config.wrapper_yield,
            },
            SweepAxis::LendRate => Self {
                // Borrow rates differ between markets only in the inverse
                title: format!("APR Comparison by Lend Rate at {} Utilization", utilization),
                borrow_lines: vec![Market::Base, Market::Wrapper],
                label_every: 5,
                wrapper_yield: config.wrapper_yield,
            },
        }
    }
}

/// Plot area geometry and value scale
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    y_min: f64,
    y_max: f64,
    samples: usize,
}

impl Frame {
    fn slot(&self) -> f64 {
        self.width / self.samples.max(1) as f64
    }

    fn x_center(&self, index: usize) -> f64 {
        self.left + (index as f64 + 0.5) * self.slot()
    }

    fn y(&self, value: f64) -> f64 {
        self.top + self.height * (self.y_max - value) / (self.y_max - self.y_min)
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Value range covering every finite drawn value, always including zero
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let span = if hi - lo > 0.0 { hi - lo } else { 0.01 };
    let y_min = if lo < 0.0 { lo - span * 0.05 } else { 0.0 };
    (y_min, hi + span * 0.1)
}

fn push_bar(svg: &mut String, frame: &Frame, x: f64, width: f64, from: f64, to: f64, fill: &str) {
    if !from.is_finite() || !to.is_finite() || from == to {
        return;
    }
    let y_top = frame.y(from.max(to));
    let height = (frame.y(from) - frame.y(to)).abs();
    svg.push_str(&format!(
        "  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>\n",
        x, y_top, width, height, fill
    ));
}

/// Polyline broken at non-finite values, with a marker per point
fn push_line(svg: &mut String, frame: &Frame, values: &[f64], color: &str, dashed: bool) {
    let dash = if dashed { " stroke-dasharray=\"8,5\"" } else { "" };

    let mut runs: Vec<Vec<(f64, f64)>> = vec![Vec::new()];
    for (i, &v) in values.iter().enumerate() {
        if v.is_finite() {
            if let Some(run) = runs.last_mut() {
                run.push((frame.x_center(i), frame.y(v)));
            }
        } else if runs.last().map_or(false, |run| !run.is_empty()) {
            runs.push(Vec::new());
        }
    }

    for run in runs.iter().filter(|run| run.len() > 1) {
        let points: Vec<String> = run.iter().map(|(x, y)| format!("{:.2},{:.2}", x, y)).collect();
        svg.push_str(&format!(
            "  <polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2.5\"{}/>\n",
            points.join(" "),
            color,
            dash
        ));
    }
    for (x, y) in runs.iter().flatten() {
        svg.push_str(&format!(
            "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"4\" fill=\"{}\"/>\n",
            x, y, color
        ));
    }
}

fn push_axes(svg: &mut String, frame: &Frame, axis: SweepAxis, xs: &[f64], label_every: usize) {
    // Horizontal grid and y labels
    for i in 0..Y_TICKS {
        let value = frame.y_min + (frame.y_max - frame.y_min) * i as f64 / (Y_TICKS - 1) as f64;
        let y = frame.y(value);
        svg.push_str(&format!(
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-dasharray=\"4,4\" stroke-opacity=\"0.7\"/>\n",
            frame.left, y, frame.left + frame.width, y, GRID_COLOR
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" font-size=\"12\" text-anchor=\"end\">{}</text>\n",
            frame.left - 8.0,
            y + 4.0,
            format_percent(value, 1)
        ));
    }

    // Plot border and zero line
    svg.push_str(&format!(
        "  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"#333333\"/>\n",
        frame.left, frame.top, frame.width, frame.height
    ));
    if frame.y_min < 0.0 {
        let y0 = frame.y(0.0);
        svg.push_str(&format!(
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#333333\"/>\n",
            frame.left, y0, frame.left + frame.width, y0
        ));
    }

    // Rotated x labels
    let every = label_every.max(1);
    for (i, &x) in xs.iter().enumerate().filter(|(i, _)| i % every == 0) {
        let cx = frame.x_center(i);
        let cy = frame.bottom() + 18.0;
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" font-size=\"12\" text-anchor=\"end\" transform=\"rotate(-45 {:.2} {:.2})\">{}</text>\n",
            cx, cy, cx, cy, format_percent(x, 0)
        ));
    }

    svg.push_str(&format!(
        "  <text x=\"{:.2}\" y=\"{:.2}\" font-size=\"14\" text-anchor=\"middle\">{}</text>\n",
        frame.left + frame.width / 2.0,
        HEIGHT - 20.0,
        axis.title()
    ));
    svg.push_str(&format!(
        "  <text x=\"24\" y=\"{:.2}\" font-size=\"14\" text-anchor=\"middle\" transform=\"rotate(-90 24 {:.2})\">APR</text>\n",
        frame.top + frame.height / 2.0,
        frame.top + frame.height / 2.0
    ));
}

fn push_legend(svg: &mut String, frame: &Frame, spec: &ChartSpec) {
    let x = frame.left + frame.width + 20.0;
    let mut y = frame.top + 10.0;

    let mut swatch = |svg: &mut String, label: &str, fill: &str| {
        svg.push_str(&format!(
            "  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"18\" height=\"12\" fill=\"{}\"/>\n",
            x, y - 10.0, fill
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" font-size=\"13\">{}</text>\n",
            x + 26.0, y, label
        ));
        y += 22.0;
    };

    for market in Market::ALL {
        let (lent, unlent) = bar_colors(market);
        swatch(svg, &format!("{} Lent APR", market), lent);
        let unlent_fill = match market {
            Market::Wrapper => "url(#hatch)",
            Market::Base => unlent,
        };
        swatch(svg, &format!("{} Unlent APR", market), unlent_fill);
    }

    let mut line_entry = |svg: &mut String, label: &str, color: &str, dashed: bool| {
        let dash = if dashed { " stroke-dasharray=\"8,5\"" } else { "" };
        svg.push_str(&format!(
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"2.5\"{}/>\n",
            x, y - 4.0, x + 18.0, y - 4.0, color, dash
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" font-size=\"13\">{}</text>\n",
            x + 26.0, y, label
        ));
        y += 22.0;
    };

    for &market in &spec.borrow_lines {
        let label = if spec.borrow_lines.len() == 1 {
            "Borrow APR".to_string()
        } else {
            format!("{} Borrow APR", market)
        };
        line_entry(svg, &label, line_color(market), market == Market::Wrapper);
    }
    line_entry(svg, "sfrxUSD Interest Rate", YIELD_LINE_COLOR, true);
}

/// Render a sweep table as a standalone SVG document
pub fn render_svg(table: &SweepTable, spec: &ChartSpec) -> String {
    let xs = table.axis_values();

    let stacks: Vec<(Market, Vec<f64>, Vec<f64>)> = Market::ALL
        .iter()
        .map(|&m| {
            (
                m,
                table.series(m, AprComponent::LentApr),
                table.series(m, AprComponent::UnlentApr),
            )
        })
        .collect();
    let borrow: Vec<(Market, Vec<f64>)> = spec
        .borrow_lines
        .iter()
        .map(|&m| (m, table.series(m, AprComponent::BorrowApr)))
        .collect();

    let stacked_values = stacks.iter().flat_map(|(_, lent, unlent)| {
        lent.iter()
            .zip(unlent)
            .flat_map(|(&l, &u)| [l, l + u])
            .collect::<Vec<_>>()
    });
    let line_values = borrow.iter().flat_map(|(_, values)| values.iter().copied());
    let (y_min, y_max) = value_range(
        stacked_values
            .chain(line_values)
            .chain(std::iter::once(spec.wrapper_yield)),
    );

    let frame = Frame {
        left: MARGIN_LEFT,
        top: MARGIN_TOP,
        width: WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
        height: HEIGHT - MARGIN_TOP - MARGIN_BOTTOM,
        y_min,
        y_max,
        samples: xs.len(),
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\">\n",
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push_str(&format!(
        "  <defs><pattern id=\"hatch\" patternUnits=\"userSpaceOnUse\" width=\"8\" height=\"8\" patternTransform=\"rotate(45)\"><rect width=\"8\" height=\"8\" fill=\"{}\"/><line x1=\"0\" y1=\"0\" x2=\"0\" y2=\"8\" stroke=\"#ffffff\" stroke-width=\"2\" stroke-opacity=\"0.6\"/></pattern></defs>\n",
        bar_colors(Market::Wrapper).1
    ));
    svg.push_str(&format!(
        "  <rect width=\"{}\" height=\"{}\" fill=\"#ffffff\"/>\n",
        WIDTH, HEIGHT
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.2}\" y=\"40\" font-size=\"22\" text-anchor=\"middle\">{}</text>\n",
        frame.left + frame.width / 2.0,
        escape_xml(&spec.title)
    ));

    push_axes(&mut svg, &frame, table.axis, &xs, spec.label_every);

    let bar_width = frame.slot() * BAR_WIDTH;
    for (k, (market, lent, unlent)) in stacks.iter().enumerate() {
        let offset = if k == 0 { -bar_width } else { 0.0 };
        let (lent_fill, unlent_fill) = bar_colors(*market);
        let unlent_fill = match market {
            Market::Wrapper => "url(#hatch)",
            Market::Base => unlent_fill,
        };
        for (i, (&l, &u)) in lent.iter().zip(unlent).enumerate() {
            let x = frame.x_center(i) + offset;
            push_bar(&mut svg, &frame, x, bar_width, 0.0, l, lent_fill);
            push_bar(&mut svg, &frame, x, bar_width, l, l + u, unlent_fill);
        }
    }

    for (market, values) in &borrow {
        push_line(&mut svg, &frame, values, line_color(*market), *market == Market::Wrapper);
    }

    if spec.wrapper_yield.is_finite() {
        let y = frame.y(spec.wrapper_yield);
        svg.push_str(&format!(
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"2\" stroke-dasharray=\"10,6\"/>\n",
            frame.left, y, frame.left + frame.width, y, YIELD_LINE_COLOR
        ));
    }

    push_legend(&mut svg, &frame, spec);
    svg.push_str("</svg>\n");
    svg
}

/// Write the three default charts for a report into `dir`
///
/// Files are named `<axis stem>.svg`, e.g. `apr_by_utilization.svg`.
pub fn write_charts(report: &ScenarioReport, dir: &Path) -> Result<Vec<PathBuf>, OutputError> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(3);
    for table in report.tables() {
        let spec = ChartSpec::for_axis(table.axis, &report.config);
        let path = dir.join(format!("{}.svg", table.axis.file_stem()));
        std::fs::write(&path, render_svg(table, &spec))?;
        info!("Wrote chart {}", path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioRunner;
    use crate::sweep::{sweep_lend_rate, sweep_utilization};

    #[test]
    fn test_default_titles() {
        let config = ScenarioConfig::default();
        assert_eq!(
            ChartSpec::for_axis(SweepAxis::Utilization, &config).title,
            "APR Comparison: frxUSD vs sfrxUSD (10% Borrow Rate)"
        );
        assert_eq!(
            ChartSpec::for_axis(SweepAxis::BorrowRate, &config).title,
            "APR Comparison at 85% Utilization"
        );
        let lend = ChartSpec::for_axis(SweepAxis::LendRate, &config);
        assert_eq!(lend.borrow_lines, vec![Market::Base, Market::Wrapper]);
        assert_eq!(lend.label_every, 5);
    }

    #[test]
    fn test_render_utilization_chart() {
        let table = sweep_utilization(0.10, 0.08, 21);
        let spec = ChartSpec::for_axis(SweepAxis::Utilization, &ScenarioConfig::default());
        let svg = render_svg(&table, &spec);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("APR Comparison: frxUSD vs sfrxUSD"));
        assert!(svg.contains("url(#hatch)"));
        assert!(svg.contains(">Utilization Rate</text>"));
        assert!(svg.contains(">Borrow APR</text>"));
        assert!(svg.contains(">sfrxUSD Interest Rate</text>"));
        // One marker per sample on the single borrow line
        assert_eq!(svg.matches("<circle").count(), 21);
        assert_eq!(svg.matches("<polyline").count(), 1);
    }

    #[test]
    fn test_render_skips_non_finite_values() {
        let table = sweep_lend_rate(0.0, 0.08, 0.20);
        let spec = ChartSpec::for_axis(SweepAxis::LendRate, &ScenarioConfig::default());
        let svg = render_svg(&table, &spec);

        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
        assert_eq!(svg.matches("<circle").count(), 0);
    }

    #[test]
    fn test_render_escapes_title() {
        let table = sweep_utilization(0.10, 0.08, 3);
        let spec = ChartSpec {
            title: "frxUSD <vs> sfrxUSD & co".into(),
            borrow_lines: vec![Market::Base],
            label_every: 1,
            wrapper_yield: 0.08,
        };
        let svg = render_svg(&table, &spec);
        assert!(svg.contains("frxUSD &lt;vs&gt; sfrxUSD &amp; co"));
    }

    #[test]
    fn test_value_range_handles_negatives() {
        let (lo, hi) = value_range([-0.02, 0.1, f64::NAN].into_iter());
        assert!(lo < -0.02);
        assert!(hi > 0.1);

        let (lo, hi) = value_range([0.0].into_iter());
        assert_eq!(lo, 0.0);
        assert!(hi > 0.0);
    }

    #[test]
    fn test_write_charts() {
        let dir = std::env::temp_dir()
            .join(format!("fraxlend_apr_charts_{}", std::process::id()));
        let report = ScenarioRunner::default().run();

        let written = write_charts(&report, &dir).unwrap();
        assert_eq!(written.len(), 3);
        let names = ["apr_by_utilization.svg", "apr_by_borrow_rate.svg", "apr_by_lend_rate.svg"];
        for (path, name) in written.iter().zip(names) {
            assert!(path.ends_with(name));
            assert!(std::fs::read_to_string(path).unwrap().contains("</svg>"));
        }

        std::fs::remove_dir_all(&dir).ok();
    }
}
