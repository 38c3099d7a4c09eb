//! SVG charts for the StoryPlan tools.
//!
//! Every chart is written with plotters' SVG backend, which needs no system
//! fonts. Callers hand over plain series; all statistics are computed upstream.

mod dashboard;

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, instrument};

use storyplan_shared::{Result, StoryPlanError};

pub use dashboard::{DashboardData, ForecastPoint, HistogramBin, word_count_dashboard};

/// Bar fill used by single-series charts.
pub(crate) const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

/// Qualitative palette for per-scene series, cycled when exhausted.
pub(crate) const DARK2: [RGBColor; 8] = [
    RGBColor(27, 158, 119),
    RGBColor(217, 95, 2),
    RGBColor(117, 112, 179),
    RGBColor(231, 41, 138),
    RGBColor(102, 166, 30),
    RGBColor(230, 171, 2),
    RGBColor(166, 118, 29),
    RGBColor(102, 102, 102),
];

/// A labeled single-series bar chart.
#[derive(Debug, Clone)]
pub struct BarChart<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    /// `(label, value)` per bar, drawn left to right.
    pub bars: &'a [(String, u64)],
    /// Print each value above its bar.
    pub value_labels: bool,
}

/// Render `chart` to an SVG file at `path`, creating parent directories.
#[instrument(skip(chart), fields(path = %path.display(), bars = chart.bars.len()))]
pub fn bar_chart(path: &Path, chart: &BarChart<'_>, size: (u32, u32)) -> Result<()> {
    ensure_parent(path)?;

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(StoryPlanError::chart)?;
    draw_bars(&root, chart)?;
    root.present().map_err(StoryPlanError::chart)?;

    debug!("bar chart written");
    Ok(())
}

/// Draw a bar chart into an existing drawing area.
pub(crate) fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    spec: &BarChart<'_>,
) -> Result<()> {
    let n = spec.bars.len().max(1);
    let y_max = spec.bars.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1) as f64 * 1.1;
    let labels: Vec<&str> = spec.bars.iter().map(|(l, _)| l.as_str()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(spec.title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)
        .map_err(StoryPlanError::chart)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| category_label(&labels, *x))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .x_desc(spec.x_desc)
        .y_desc(spec.y_desc)
        .draw()
        .map_err(StoryPlanError::chart)?;

    chart
        .draw_series(spec.bars.iter().enumerate().map(|(i, (_, v))| {
            let x = i as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *v as f64)], SKY_BLUE.filled())
        }))
        .map_err(StoryPlanError::chart)?;

    if spec.value_labels {
        let style = TextStyle::from(("sans-serif", 13).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(spec.bars.iter().enumerate().map(|(i, (_, v))| {
                Text::new(v.to_string(), (i as f64, *v as f64), style.clone())
            }))
            .map_err(StoryPlanError::chart)?;
    }

    Ok(())
}

/// Axis label for a category axis laid out at integer positions.
pub(crate) fn category_label(labels: &[&str], x: f64) -> String {
    if (x - x.round()).abs() > 1e-6 || x < -0.5 {
        return String::new();
    }
    labels
        .get(x.round() as usize)
        .map(|l| (*l).to_string())
        .unwrap_or_default()
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoryPlanError::io(parent, e))?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    pub(crate) fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "storyplan-charts-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn category_labels_only_on_whole_positions() {
        let labels = ["Monday", "Tuesday"];
        assert_eq!(category_label(&labels, 0.0), "Monday");
        assert_eq!(category_label(&labels, 1.0), "Tuesday");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn bar_chart_writes_svg_and_creates_dirs() {
        let tmp = temp_dir();
        let path = tmp.join("images").join("days.svg");
        let bars = vec![("Monday".to_string(), 3), ("Tuesday".to_string(), 1)];

        bar_chart(
            &path,
            &BarChart {
                title: "Days of the Week",
                x_desc: "Day of the Week",
                y_desc: "Count",
                bars: &bars,
                value_labels: true,
            },
            (800, 400),
        )
        .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Days of the Week"));
    }

    #[test]
    fn bar_chart_accepts_no_bars() {
        let tmp = temp_dir();
        let path = tmp.join("empty.svg");
        bar_chart(
            &path,
            &BarChart {
                title: "Empty",
                x_desc: "x",
                y_desc: "y",
                bars: &[],
                value_labels: false,
            },
            (400, 300),
        )
        .unwrap();
        assert!(path.exists());
    }
}
