//! Chapter aggregation.
//!
//! Groups scene rows by chapter key in a single pass. The resulting map keeps
//! chapters in first-seen order, and scenes within a chapter in row order.

use indexmap::IndexMap;
use tracing::{debug, info, instrument};

use storyplan_shared::{ChapterAggregate, SceneRow};

/// Chapter key → aggregate, in first-seen order.
pub type ChapterMap = IndexMap<String, ChapterAggregate>;

/// Group `rows` into chapters.
///
/// Blank chapter keys are grouped like any other key. POV, temperature and
/// arc are chapter-level: the last row of a chapter wins.
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn aggregate_chapters(rows: &[SceneRow]) -> ChapterMap {
    let mut chapters = ChapterMap::new();

    for row in rows {
        let chapter = chapters.entry(row.chapter.clone()).or_default();
        if chapter.scene_count() > 0 {
            log_overwrites(&row.chapter, chapter, row);
        }
        chapter.push_scene(row);
    }

    info!(
        scenes = rows.len(),
        chapters = chapters.len(),
        "aggregated scenes into chapters"
    );
    chapters
}

/// Note chapter-level values that a later row is about to replace.
fn log_overwrites(key: &str, chapter: &ChapterAggregate, row: &SceneRow) {
    let fields = [
        ("pov", &chapter.pov, &row.pov),
        ("temperature", &chapter.temperature, &row.temperature),
        ("arc", &chapter.arc, &row.arc),
    ];
    for (field, old, new) in fields {
        if old != new {
            debug!(chapter = key, field, %old, %new, "chapter value overwritten by later scene");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(chapter: &str, location: &str, pov: &str) -> SceneRow {
        SceneRow {
            chapter: chapter.into(),
            location: location.into(),
            pov: pov.into(),
            day: format!("{chapter}-{location}"),
            ..SceneRow::default()
        }
    }

    #[test]
    fn one_aggregate_per_distinct_key() {
        let rows = vec![
            row("1", "A", "Mara"),
            row("2", "B", "Teo"),
            row("1", "C", "Mara"),
            row("3", "D", "Ilse"),
        ];
        let chapters = aggregate_chapters(&rows);

        assert_eq!(chapters.len(), 3);
        let keys: Vec<&str> = chapters.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["1", "2", "3"]);
    }

    #[test]
    fn scenes_numbered_in_arrival_order() {
        let rows = vec![row("1", "A", "x"), row("2", "B", "x"), row("1", "C", "x")];
        let chapters = aggregate_chapters(&rows);

        let one = &chapters["1"];
        assert_eq!(one.scenes, vec![1, 2]);
        assert_eq!(one.locations, vec!["A", "C"]);
        assert_eq!(chapters["2"].scenes, vec![1]);
    }

    #[test]
    fn per_scene_sequences_stay_parallel() {
        let rows: Vec<SceneRow> = (0..5).map(|i| row("9", &format!("L{i}"), "x")).collect();
        let chapters = aggregate_chapters(&rows);
        let c = &chapters["9"];

        let n = c.scene_count();
        assert_eq!(n, 5);
        for len in [
            c.days.len(),
            c.locations.len(),
            c.uniforms.len(),
            c.weather.len(),
            c.times.len(),
            c.descriptions.len(),
            c.weeks.len(),
        ] {
            assert_eq!(len, n);
        }
    }

    #[test]
    fn last_value_wins_for_chapter_scalars() {
        let mut first = row("1", "A", "Mara");
        first.arc = "1".into();
        first.temperature = "4C".into();
        let mut second = row("1", "B", "Teo");
        second.arc = "2".into();
        second.temperature = "9C".into();

        let chapters = aggregate_chapters(&[first, second]);
        let c = &chapters["1"];
        assert_eq!(c.pov, "Teo");
        assert_eq!(c.arc, "2");
        assert_eq!(c.temperature, "9C");
    }

    #[test]
    fn blank_key_is_grouped() {
        let rows = vec![row("", "A", "x"), row("", "B", "x"), row("1", "C", "x")];
        let chapters = aggregate_chapters(&rows);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[""].scene_count(), 2);
    }

    #[test]
    fn no_rows_no_chapters() {
        assert!(aggregate_chapters(&[]).is_empty());
    }
}
