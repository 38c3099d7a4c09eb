//! Chapter note writer.
//!
//! Renders every chapter and writes it to `<output_dir>/Chapter <key>.md`.
//! A failure for one chapter is logged and recorded, and the remaining
//! chapters are still written.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument};

use storyplan_markdown::{RenderOptions, chapter_title, render_chapter};
use storyplan_shared::{Result, StoryPlanError};

use crate::chapters::ChapterMap;
use crate::pipeline::ProgressReporter;

/// A chapter note that reached disk.
#[derive(Debug, Clone)]
pub struct WrittenChapter {
    pub key: String,
    pub path: PathBuf,
    pub scenes: usize,
}

/// A chapter whose note could not be written.
#[derive(Debug, Clone)]
pub struct ChapterFailure {
    pub key: String,
    pub error: String,
}

/// Outcome of writing all chapters.
#[derive(Debug, Clone, Default)]
pub struct WriteSummary {
    pub written: Vec<WrittenChapter>,
    pub failed: Vec<ChapterFailure>,
}

/// Write one note per chapter into `output_dir`, in map order.
///
/// Only a failure to create `output_dir` itself is returned as an error.
#[instrument(skip_all, fields(output_dir = %output_dir.display(), chapters = chapters.len()))]
pub fn write_chapters(
    output_dir: &Path,
    chapters: &ChapterMap,
    opts: &RenderOptions,
    progress: &dyn ProgressReporter,
) -> Result<WriteSummary> {
    std::fs::create_dir_all(output_dir).map_err(|e| StoryPlanError::io(output_dir, e))?;

    let total = chapters.len();
    let mut summary = WriteSummary::default();

    for (current, (key, chapter)) in chapters.iter().enumerate() {
        let content = render_chapter(key, chapter, opts);

        match write_note(output_dir, key, &content) {
            Ok(path) => {
                summary.written.push(WrittenChapter {
                    key: key.clone(),
                    path,
                    scenes: chapter.scene_count(),
                });
            }
            Err(e) => {
                error!(chapter = %key, error = %e, "failed to write chapter note");
                summary.failed.push(ChapterFailure {
                    key: key.clone(),
                    error: e.to_string(),
                });
            }
        }

        progress.chapter_written(key, current + 1, total);
    }

    info!(
        written = summary.written.len(),
        failed = summary.failed.len(),
        "chapter notes written"
    );
    Ok(summary)
}

/// Path of the note for chapter `key`.
pub fn note_path(output_dir: &Path, key: &str) -> PathBuf {
    output_dir.join(format!("{}.md", chapter_title(key)))
}

fn write_note(output_dir: &Path, key: &str, content: &str) -> Result<PathBuf> {
    let path = note_path(output_dir, key);
    std::fs::write(&path, content).map_err(|e| StoryPlanError::io(&path, e))?;
    debug!(path = %path.display(), "wrote chapter note");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapters::aggregate_chapters;
    use crate::pipeline::SilentProgress;
    use storyplan_shared::SceneRow;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "storyplan-writer-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn rows(keys: &[&str]) -> Vec<SceneRow> {
        keys.iter()
            .map(|k| SceneRow {
                chapter: k.to_string(),
                location: "Forest - Clearing, River".into(),
                ..SceneRow::default()
            })
            .collect()
    }

    #[test]
    fn one_file_per_chapter() {
        let tmp = temp_dir();
        let chapters = aggregate_chapters(&rows(&["1", "1", "2", "1", "3"]));

        let summary =
            write_chapters(&tmp, &chapters, &RenderOptions::default(), &SilentProgress).unwrap();

        assert_eq!(summary.written.len(), 3);
        assert!(summary.failed.is_empty());
        for key in ["1", "2", "3"] {
            assert!(note_path(&tmp, key).exists(), "missing note for chapter {key}");
        }
        let one = std::fs::read_to_string(note_path(&tmp, "1")).unwrap();
        assert_eq!(one.matches("### Scene ").count(), 3);
        assert_eq!(summary.written[0].scenes, 3);
    }

    #[test]
    fn creates_missing_output_dir() {
        let tmp = temp_dir().join("nested").join("notes");
        let chapters = aggregate_chapters(&rows(&["1"]));

        write_chapters(&tmp, &chapters, &RenderOptions::default(), &SilentProgress).unwrap();
        assert!(tmp.join("Chapter 1.md").exists());
    }

    #[test]
    fn write_failure_is_isolated_to_its_chapter() {
        let tmp = temp_dir();
        // "Chapter a/b.md" needs a "Chapter a" directory that does not exist.
        let chapters = aggregate_chapters(&rows(&["1", "a/b", "3"]));

        let summary =
            write_chapters(&tmp, &chapters, &RenderOptions::default(), &SilentProgress).unwrap();

        assert_eq!(summary.written.len(), 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].key, "a/b");
        assert!(note_path(&tmp, "1").exists());
        assert!(note_path(&tmp, "3").exists());
    }

    #[test]
    fn rewrites_existing_notes() {
        let tmp = temp_dir();
        let chapters = aggregate_chapters(&rows(&["1"]));
        std::fs::write(note_path(&tmp, "1"), "stale").unwrap();

        write_chapters(&tmp, &chapters, &RenderOptions::default(), &SilentProgress).unwrap();
        let content = std::fs::read_to_string(note_path(&tmp, "1")).unwrap();
        assert!(content.starts_with("# Chapter 1\n"));
    }
}
