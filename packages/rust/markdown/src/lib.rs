//! Chapter note rendering.
//!
//! Turns one [`ChapterAggregate`] into a markdown document: an optional YAML
//! metadata block, a chapter heading, one section per scene with labeled
//! fields, and the scene's location hierarchy as nested bullets.
//!
//! Rendering is pure string building; writing files is the caller's job.

mod location;

use chrono::NaiveDateTime;
use tracing::{debug, instrument};

use storyplan_shared::ChapterAggregate;

pub use location::{Location, parse_location, render_location};

/// Timestamp layout of the `created` metadata field.
pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Values for the metadata block placed at the top of each note.
#[derive(Debug, Clone)]
pub struct Metadata {
    /// When the note was generated.
    pub created: NaiveDateTime,
    /// Name of the generating tool.
    pub generated_by: String,
    /// Tags, written verbatim and joined with `", "`.
    pub tags: Vec<String>,
}

/// Options for rendering a chapter.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Emit a metadata block when set.
    pub metadata: Option<Metadata>,
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// File stem (and heading text) used for a chapter key.
pub fn chapter_title(key: &str) -> String {
    format!("Chapter {key}")
}

/// Render a complete chapter note.
#[instrument(skip(chapter, opts), fields(scenes = chapter.scene_count()))]
pub fn render_chapter(key: &str, chapter: &ChapterAggregate, opts: &RenderOptions) -> String {
    let mut md = String::new();

    if let Some(meta) = &opts.metadata {
        md.push_str(&build_frontmatter(meta, chapter));
    }

    md.push_str(&format!("# {}\n", chapter_title(key)));
    md.push_str("## Scenes\n");

    for (i, number) in chapter.scenes.iter().enumerate() {
        md.push_str(&render_scene(chapter, i, *number));
    }

    debug!(len = md.len(), "chapter rendered");
    md
}

/// Render scene `number`, whose per-scene fields live at index `i`.
fn render_scene(chapter: &ChapterAggregate, i: usize, number: usize) -> String {
    let at = |values: &[String]| values.get(i).cloned().unwrap_or_default();

    let mut md = format!("### Scene {number}\n\n");
    md.push_str(&format!(" - POV: {}\n", chapter.pov));
    md.push_str(&format!(" - Date and Time: {}\n", at(&chapter.times)));
    md.push_str(&format!(" - Day: {}\n", at(&chapter.days)));
    md.push_str(&format!(" - Week: {}\n", at(&chapter.weeks)));
    md.push_str(&format!(" - Temperature: {}\n", chapter.temperature));
    md.push_str(&format!(" - Weather: {}\n", at(&chapter.weather)));
    md.push_str(&format!(" - Uniform: {}\n\n", at(&chapter.uniforms)));
    md.push_str(&format!(" - Description: {}\n\n", at(&chapter.descriptions)));

    md.push_str(" #### Setting:\n");
    md.push_str(&render_location(&at(&chapter.locations)));
    md.push('\n');
    md
}

/// Build the YAML metadata block.
fn build_frontmatter(meta: &Metadata, chapter: &ChapterAggregate) -> String {
    let mut fm = String::from("---\n");
    fm.push_str(&format!("created: {}\n", meta.created.format(CREATED_FORMAT)));
    fm.push_str(&format!("generated_by: {}\n", meta.generated_by));
    fm.push_str(&format!("tags: {}\n", meta.tags.join(", ")));
    fm.push_str(&format!("POV: {}\n", chapter.pov));
    fm.push_str(&format!("Arc: {}\n", chapter.arc));
    fm.push_str("---\n\n");
    fm
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use storyplan_shared::SceneRow;

    fn forest_chapter(scenes: usize) -> ChapterAggregate {
        let mut chapter = ChapterAggregate::default();
        for i in 0..scenes {
            chapter.push_scene(&SceneRow {
                week: "1".into(),
                arc: "2".into(),
                chapter: "1".into(),
                location: "Forest - Clearing, River".into(),
                uniform: "Field kit".into(),
                time: format!("Hour {i}"),
                weather: "Fog".into(),
                day: "Monday".into(),
                description: format!("Scene text {i}"),
                pov: "Mara".into(),
                temperature: "4C".into(),
            });
        }
        chapter
    }

    fn metadata(tags: &[&str]) -> Metadata {
        Metadata {
            created: NaiveDate::from_ymd_opt(2024, 3, 9)
                .unwrap()
                .and_hms_opt(14, 5, 0)
                .unwrap(),
            generated_by: "storyplan".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn renders_one_section_per_scene() {
        let md = render_chapter("1", &forest_chapter(3), &RenderOptions::default());

        assert!(md.starts_with("# Chapter 1\n## Scenes\n"));
        assert_eq!(md.matches("### Scene ").count(), 3);
        let one = md.find("### Scene 1\n").unwrap();
        let two = md.find("### Scene 2\n").unwrap();
        let three = md.find("### Scene 3\n").unwrap();
        assert!(one < two && two < three);
        assert!(!md.contains("### Scene 4"));
    }

    #[test]
    fn every_scene_has_forest_hierarchy() {
        let md = render_chapter("1", &forest_chapter(3), &RenderOptions::default());
        let setting = " #### Setting:\n - Forest\n     - Clearing\n     - River\n";
        assert_eq!(md.matches(setting).count(), 3);
    }

    #[test]
    fn scene_fields_come_from_their_own_row() {
        let md = render_chapter("1", &forest_chapter(2), &RenderOptions::default());
        let second = &md[md.find("### Scene 2").unwrap()..];
        assert!(second.contains(" - Date and Time: Hour 1\n"));
        assert!(second.contains(" - Description: Scene text 1\n"));
        assert!(second.contains(" - POV: Mara\n"));
        assert!(second.contains(" - Temperature: 4C\n"));
        assert!(second.contains(" - Week: 1\n"));
    }

    #[test]
    fn exact_scene_layout() {
        let md = render_chapter("7", &forest_chapter(1), &RenderOptions::default());
        let expected = concat!(
            "# Chapter 7\n",
            "## Scenes\n",
            "### Scene 1\n\n",
            " - POV: Mara\n",
            " - Date and Time: Hour 0\n",
            " - Day: Monday\n",
            " - Week: 1\n",
            " - Temperature: 4C\n",
            " - Weather: Fog\n",
            " - Uniform: Field kit\n\n",
            " - Description: Scene text 0\n\n",
            " #### Setting:\n",
            " - Forest\n",
            "     - Clearing\n",
            "     - River\n",
            "\n",
        );
        assert_eq!(md, expected);
    }

    #[test]
    fn no_metadata_unless_requested() {
        let md = render_chapter("1", &forest_chapter(1), &RenderOptions::default());
        assert!(!md.starts_with("---"));
        assert!(!md.contains("tags:"));
    }

    #[test]
    fn metadata_block_when_requested() {
        let opts = RenderOptions {
            metadata: Some(metadata(&["novel", "draft"])),
        };
        let md = render_chapter("1", &forest_chapter(1), &opts);

        assert!(md.starts_with(
            "---\n\
created: 2024-03-09 14:05:00\n\
generated_by: storyplan\n\
tags: novel, draft\n\
POV: Mara\n\
Arc: 2\n\
---\n\n# Chapter 1\n"
        ));
    }

    #[test]
    fn empty_tag_list_renders_empty_field() {
        let opts = RenderOptions {
            metadata: Some(metadata(&[])),
        };
        let md = render_chapter("1", &forest_chapter(1), &opts);
        assert!(md.contains("\ntags: \n"));
    }

    #[test]
    fn blank_chapter_key_still_renders() {
        let md = render_chapter("", &forest_chapter(1), &RenderOptions::default());
        assert!(md.starts_with("# Chapter \n"));
        assert_eq!(chapter_title(""), "Chapter ");
    }
}
