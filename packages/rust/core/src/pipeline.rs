//! End-to-end `plan` pipeline: spreadsheet → chapters → markdown notes.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use indexmap::IndexMap;
use tracing::{info, instrument, warn};

use storyplan_charts::BarChart;
use storyplan_markdown::{Metadata, RenderOptions};
use storyplan_shared::{PlanConfig, Result, SceneRow};

use crate::chapters::aggregate_chapters;
use crate::writer::{ChapterFailure, WrittenChapter, write_chapters};

/// Result of the `convert_plan` pipeline.
#[derive(Debug)]
pub struct PlanReport {
    /// Directory the notes were written to.
    pub output_dir: PathBuf,
    /// Number of scene rows read.
    pub scene_count: usize,
    /// Notes written, in chapter order.
    pub written: Vec<WrittenChapter>,
    /// Chapters whose notes could not be written.
    pub failed: Vec<ChapterFailure>,
    /// Scenes per day value, when metrics were requested.
    pub day_counts: Option<Vec<(String, u64)>>,
    /// Saved metrics chart, if any.
    pub metrics_chart: Option<PathBuf>,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each chapter note is attempted.
    fn chapter_written(&self, key: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, report: &PlanReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn chapter_written(&self, _key: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &PlanReport) {}
}

/// Run the full `plan` pipeline.
///
/// 1. Load scene rows (fatal on any error)
/// 2. Aggregate rows into chapters
/// 3. Render and write one note per chapter (failures isolated per chapter)
/// 4. Optionally count scenes per day and save a chart
#[instrument(skip_all, fields(input = %config.input.display(), sheet = %config.sheet))]
pub fn convert_plan(config: &PlanConfig, progress: &dyn ProgressReporter) -> Result<PlanReport> {
    let start = Instant::now();

    // --- Phase 1: Load ---
    progress.phase("Reading scene plan");
    let rows = storyplan_sheet::load_plan(&config.input, &config.sheet)?;

    // --- Phase 2: Aggregate ---
    progress.phase("Grouping scenes into chapters");
    let chapters = aggregate_chapters(&rows);

    // --- Phase 3: Render + write ---
    progress.phase("Writing chapter notes");
    let opts = RenderOptions {
        metadata: config.add_metadata.then(|| Metadata {
            created: Local::now().naive_local(),
            generated_by: config.generated_by.clone(),
            tags: config.tags.clone(),
        }),
    };
    let summary = write_chapters(&config.output_dir, &chapters, &opts, progress)?;

    // --- Phase 4: Metrics ---
    let mut day_counts = None;
    let mut metrics_chart = None;
    if config.generate_metrics {
        progress.phase("Counting scenes per day");
        let counts = count_days(&rows);
        info!(days = counts.len(), "day metrics computed");

        if config.save_metrics {
            let path = config.output_dir.join("images").join("days.svg");
            match save_day_chart(&path, &counts) {
                Ok(()) => metrics_chart = Some(path),
                Err(e) => warn!(error = %e, path = %path.display(), "failed to save day chart"),
            }
        }
        day_counts = Some(counts);
    }

    let report = PlanReport {
        output_dir: config.output_dir.clone(),
        scene_count: rows.len(),
        written: summary.written,
        failed: summary.failed,
        day_counts,
        metrics_chart,
        elapsed: start.elapsed(),
    };

    info!(
        chapters = report.written.len(),
        failed = report.failed.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "plan pipeline complete"
    );

    progress.done(&report);
    Ok(report)
}

/// Count scenes per `Day` value, in first-seen order.
pub fn count_days(rows: &[SceneRow]) -> Vec<(String, u64)> {
    let mut counts: IndexMap<&str, u64> = IndexMap::new();
    for row in rows {
        *counts.entry(row.day.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(day, n)| (day.to_string(), n))
        .collect()
}

fn save_day_chart(path: &std::path::Path, counts: &[(String, u64)]) -> Result<()> {
    storyplan_charts::bar_chart(
        path,
        &BarChart {
            title: "Days of the Week",
            x_desc: "Day of the Week",
            y_desc: "Count",
            bars: counts,
            value_labels: false,
        },
        (1000, 500),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
