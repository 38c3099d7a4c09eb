//! Four-panel word-count dashboard.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, instrument};

use storyplan_shared::{Result, StoryPlanError};

use crate::{BarChart, DARK2, SKY_BLUE, category_label, draw_bars, ensure_parent};

/// Projected word count at a milestone scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub milestone: f64,
    /// Projection from the average scene length.
    pub scene_avg: f64,
    /// Projection from the average chapter length.
    pub chapter_avg: f64,
}

/// One histogram bucket `[lo, hi)` (the last bucket is closed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Series drawn by [`word_count_dashboard`].
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub chapters: Vec<String>,
    /// Scene word counts per chapter, parallel to `chapters`.
    pub scenes: Vec<Vec<u64>>,
    /// Running total, starting at 0.
    pub cumulative: Vec<u64>,
    pub forecasts: Vec<ForecastPoint>,
    pub histogram: Vec<HistogramBin>,
}

/// Render the 2×2 dashboard: stacked scene bars, cumulative count with
/// forecasts, scene-length histogram, and scenes per chapter.
#[instrument(skip(data), fields(path = %path.display(), chapters = data.chapters.len()))]
pub fn word_count_dashboard(path: &Path, data: &DashboardData) -> Result<()> {
    ensure_parent(path)?;

    let root = SVGBackend::new(path, (1500, 1000)).into_drawing_area();
    root.fill(&WHITE).map_err(StoryPlanError::chart)?;

    let panels = root.split_evenly((2, 2));
    draw_stacked_scenes(&panels[0], data)?;
    draw_cumulative(&panels[1], data)?;
    draw_histogram(&panels[2], data)?;

    let per_chapter: Vec<(String, u64)> = data
        .chapters
        .iter()
        .zip(&data.scenes)
        .map(|(name, scenes)| (name.clone(), scenes.len() as u64))
        .collect();
    draw_bars(
        &panels[3],
        &BarChart {
            title: "Number of Scenes per Chapter",
            x_desc: "Chapters",
            y_desc: "Number of Scenes",
            bars: &per_chapter,
            value_labels: true,
        },
    )?;

    root.present().map_err(StoryPlanError::chart)?;
    debug!("dashboard written");
    Ok(())
}

fn draw_stacked_scenes<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &DashboardData,
) -> Result<()> {
    let n = data.chapters.len().max(1);
    let max_scenes = data.scenes.iter().map(Vec::len).max().unwrap_or(0);
    let y_max = data
        .scenes
        .iter()
        .map(|s| s.iter().sum::<u64>())
        .max()
        .unwrap_or(0)
        .max(1) as f64
        * 1.1;
    let labels: Vec<&str> = data.chapters.iter().map(String::as_str).collect();

    let mut chart = ChartBuilder::on(area)
        .caption("Word Count per Scene in Each Chapter", ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)
        .map_err(StoryPlanError::chart)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| category_label(&labels, *x))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .x_desc("Chapters")
        .y_desc("Word Count")
        .draw()
        .map_err(StoryPlanError::chart)?;

    let mut bottom = vec![0f64; data.scenes.len()];
    let label_style = TextStyle::from(("sans-serif", 11).into_font())
        .color(&WHITE)
        .pos(Pos::new(HPos::Center, VPos::Center));

    for scene in 0..max_scenes {
        let color = DARK2[scene % DARK2.len()];
        let mut bars = Vec::new();
        let mut texts = Vec::new();

        for (i, counts) in data.scenes.iter().enumerate() {
            let Some(&wc) = counts.get(scene) else {
                continue;
            };
            let (x, y0, y1) = (i as f64, bottom[i], bottom[i] + wc as f64);
            bars.push(Rectangle::new([(x - 0.4, y0), (x + 0.4, y1)], color.filled()));
            if wc > 0 {
                texts.push(Text::new(
                    wc.to_string(),
                    (x, (y0 + y1) / 2.0),
                    label_style.clone(),
                ));
            }
            bottom[i] = y1;
        }

        chart
            .draw_series(bars)
            .map_err(StoryPlanError::chart)?
            .label(format!("Scene {}", scene + 1))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        chart.draw_series(texts).map_err(StoryPlanError::chart)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(StoryPlanError::chart)?;

    Ok(())
}

fn draw_cumulative<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &DashboardData,
) -> Result<()> {
    let last_milestone = data
        .forecasts
        .iter()
        .map(|f| f.milestone)
        .fold(0f64, f64::max);
    let x_max = (data.cumulative.len() as f64).max(last_milestone) + 1.0;
    let y_max = data
        .forecasts
        .iter()
        .flat_map(|f| [f.scene_avg, f.chapter_avg])
        .chain(data.cumulative.iter().map(|c| *c as f64))
        .fold(1f64, f64::max)
        * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption("Cumulative Word Count Across Scenes", ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(StoryPlanError::chart)?;

    chart
        .configure_mesh()
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .x_desc("Scene Index")
        .y_desc("Cumulative Word Count")
        .draw()
        .map_err(StoryPlanError::chart)?;

    let line_color = DARK2[2];
    chart
        .draw_series(
            LineSeries::new(
                data.cumulative
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (i as f64, *c as f64)),
                line_color.stroke_width(2),
            )
            .point_size(3),
        )
        .map_err(StoryPlanError::chart)?
        .label("Cumulative")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color));

    chart
        .draw_series(
            data.forecasts
                .iter()
                .map(|f| Cross::new((f.milestone, f.chapter_avg), 5, RED.stroke_width(2))),
        )
        .map_err(StoryPlanError::chart)?
        .label("Forecasted (Chapter Avg)")
        .legend(|(x, y)| Cross::new((x + 5, y), 5, RED.stroke_width(2)));

    chart
        .draw_series(
            data.forecasts
                .iter()
                .map(|f| Circle::new((f.milestone, f.scene_avg), 4, BLUE.filled())),
        )
        .map_err(StoryPlanError::chart)?
        .label("Forecasted (Scene Avg)")
        .legend(|(x, y)| Circle::new((x + 5, y), 4, BLUE.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(StoryPlanError::chart)?;

    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &DashboardData,
) -> Result<()> {
    let (x_min, x_max) = match (data.histogram.first(), data.histogram.last()) {
        (Some(first), Some(last)) if last.hi > first.lo => (first.lo, last.hi),
        (Some(first), _) => (first.lo - 0.5, first.lo + 0.5),
        _ => (0.0, 1.0),
    };
    let y_max = data
        .histogram
        .iter()
        .map(|b| b.count)
        .max()
        .unwrap_or(0)
        .max(1) as f64
        * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption("Distribution of Scene Lengths", ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)
        .map_err(StoryPlanError::chart)?;

    chart
        .configure_mesh()
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .x_desc("Word Count")
        .y_desc("Frequency")
        .draw()
        .map_err(StoryPlanError::chart)?;

    chart
        .draw_series(data.histogram.iter().map(|b| {
            Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], SKY_BLUE.filled())
        }))
        .map_err(StoryPlanError::chart)?;
    chart
        .draw_series(
            data.histogram
                .iter()
                .map(|b| Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], BLACK)),
        )
        .map_err(StoryPlanError::chart)?;

    Ok(())
}
