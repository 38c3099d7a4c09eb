//! Word-count statistics across chapters and scenes.
//!
//! Reads per-scene word counts from a TOML manuscript file and derives totals,
//! per-chapter spread, a cumulative series, a scene-length histogram, and
//! simple linear forecasts at milestone scene counts.

use std::path::Path;

use tracing::{info, instrument};

use storyplan_charts::{DashboardData, ForecastPoint, HistogramBin};
use storyplan_shared::{Manuscript, Result, StoryPlanError};

/// Scene counts at which word totals are projected.
pub const MILESTONES: [u32; 5] = [10, 15, 20, 25, 30];

/// Number of equal-width scene-length buckets.
pub const HISTOGRAM_BINS: usize = 10;

/// Spread of scene lengths within one chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterStats {
    pub name: String,
    pub scene_count: usize,
    pub total: u64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

/// Projected manuscript length once `milestone` scenes are written.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub milestone: u32,
    pub projected_scene_avg: f64,
    pub projected_chapter_avg: f64,
    pub projected_chapter_avg_with_std: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordCountStats {
    pub chapters: Vec<ChapterStats>,
    pub total_words: u64,
    pub total_scenes: usize,
    pub avg_per_scene: f64,
    pub avg_per_chapter: f64,
    /// Running total over all scenes in reading order, starting at 0.
    pub cumulative: Vec<u64>,
    pub histogram: Vec<HistogramBin>,
    pub forecasts: Vec<Forecast>,
}

/// Read a manuscript TOML file.
pub fn load_manuscript(path: &Path) -> Result<Manuscript> {
    let content = std::fs::read_to_string(path).map_err(|e| StoryPlanError::io(path, e))?;
    toml::from_str(&content)
        .map_err(|e| StoryPlanError::parse(format!("failed to parse {}: {e}", path.display())))
}

/// Compute every statistic for `manuscript`.
///
/// Fails when there are no chapters or a chapter has no scenes.
#[instrument(skip_all, fields(chapters = manuscript.chapters.len()))]
pub fn compute(manuscript: &Manuscript) -> Result<WordCountStats> {
    if manuscript.chapters.is_empty() {
        return Err(StoryPlanError::validation("manuscript has no chapters"));
    }
    if let Some(empty) = manuscript.chapters.iter().find(|c| c.scenes.is_empty()) {
        return Err(StoryPlanError::validation(format!(
            "chapter '{}' has no scenes",
            empty.name
        )));
    }

    let chapters: Vec<ChapterStats> = manuscript
        .chapters
        .iter()
        .map(|c| ChapterStats {
            name: c.name.clone(),
            scene_count: c.scenes.len(),
            total: c.scenes.iter().sum(),
            mean: mean(&c.scenes),
            median: median(&c.scenes),
            std_dev: std_dev(&c.scenes),
        })
        .collect();

    let scene_lengths: Vec<u64> = manuscript
        .chapters
        .iter()
        .flat_map(|c| c.scenes.iter().copied())
        .collect();

    let total_words: u64 = scene_lengths.iter().sum();
    let total_scenes = scene_lengths.len();
    let chapter_count = chapters.len() as f64;
    let avg_per_scene = total_words as f64 / total_scenes as f64;
    let avg_per_chapter = total_words as f64 / chapter_count;

    let cumulative = std::iter::once(0)
        .chain(scene_lengths.iter().scan(0u64, |acc, wc| {
            *acc += wc;
            Some(*acc)
        }))
        .collect();

    let mean_chapter_std = chapters.iter().map(|c| c.std_dev).sum::<f64>() / chapter_count;
    let scenes_per_chapter = total_scenes as f64 / chapter_count;
    let forecasts = MILESTONES
        .iter()
        .map(|&m| {
            let projected_chapter_avg = avg_per_chapter * (f64::from(m) / scenes_per_chapter);
            Forecast {
                milestone: m,
                projected_scene_avg: avg_per_scene * f64::from(m),
                projected_chapter_avg,
                projected_chapter_avg_with_std: projected_chapter_avg + mean_chapter_std,
            }
        })
        .collect();

    let stats = WordCountStats {
        histogram: histogram(&scene_lengths, HISTOGRAM_BINS),
        chapters,
        total_words,
        total_scenes,
        avg_per_scene,
        avg_per_chapter,
        cumulative,
        forecasts,
    };

    info!(
        total_words = stats.total_words,
        total_scenes = stats.total_scenes,
        "word count statistics computed"
    );
    Ok(stats)
}

/// Printable summary of `stats`.
pub fn format_report(stats: &WordCountStats) -> String {
    let mut out = format!("Total word count: {}\n", stats.total_words);
    out.push_str(&format!(
        "Overall average word count per chapter: {:.2}\n",
        stats.avg_per_chapter
    ));
    out.push_str(&format!(
        "Average word count per scene: {:.2}\n",
        stats.avg_per_scene
    ));

    for c in &stats.chapters {
        out.push_str(&format!("{}:\n", c.name));
        out.push_str(&format!("  Average word count: {:.2}\n", c.mean));
        out.push_str(&format!("  Median word count: {:.2}\n", c.median));
        out.push_str(&format!("  Standard deviation: {:.2}\n", c.std_dev));
    }

    out.push_str("Forecasts:\n");
    for f in &stats.forecasts {
        out.push_str(&format!(
            "  {} scenes: {:.0} (scene avg), {:.0} (chapter avg), {:.0} (chapter avg + std dev)\n",
            f.milestone, f.projected_scene_avg, f.projected_chapter_avg, f.projected_chapter_avg_with_std
        ));
    }

    let final_total = stats.cumulative.last().copied().unwrap_or(0);
    out.push_str(&format!("Cumulative word count: {final_total}\n"));
    out
}

/// Chart series for the word-count dashboard.
pub fn dashboard_data(manuscript: &Manuscript, stats: &WordCountStats) -> DashboardData {
    DashboardData {
        chapters: manuscript.chapters.iter().map(|c| c.name.clone()).collect(),
        scenes: manuscript.chapters.iter().map(|c| c.scenes.clone()).collect(),
        cumulative: stats.cumulative.clone(),
        forecasts: stats
            .forecasts
            .iter()
            .map(|f| ForecastPoint {
                milestone: f64::from(f.milestone),
                scene_avg: f.projected_scene_avg,
                chapter_avg: f.projected_chapter_avg,
            })
            .collect(),
        histogram: stats.histogram.clone(),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mean(values: &[u64]) -> f64 {
    values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64
}

fn median(values: &[u64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    }
}

fn std_dev(values: &[u64]) -> f64 {
    let m = mean(values);
    let variance = values
        .iter()
        .map(|v| (*v as f64 - m).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Equal-width histogram over `[min, max]`; the last bin includes `max`.
/// When every value is equal the range is widened to `value ± 0.5`.
fn histogram(values: &[u64], bins: usize) -> Vec<HistogramBin> {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return Vec::new();
    };
    let (lo, hi) = if min == max {
        (min as f64 - 0.5, max as f64 + 0.5)
    } else {
        (min as f64, max as f64)
    };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lo: lo + width * i as f64,
            hi: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for v in values {
        let idx = (((*v as f64 - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}
