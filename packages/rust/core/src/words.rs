//! Word-frequency aggregation across exported `word,count` CSV files.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, instrument, warn};

use storyplan_charts::BarChart;
use storyplan_shared::{Result, StoryPlanError};

/// Word → summed count, in first-seen order. Counts may be negative.
pub type WordTally = IndexMap<String, i64>;

/// One line of the ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedWord {
    /// 1-based position.
    pub rank: usize,
    pub word: String,
    pub count: i64,
}

/// Sum word counts from every `*.csv` file directly inside `dir`.
///
/// Files are read in file-name order. Only records with exactly two fields
/// are used. A record whose count is not an integer, or whose count would
/// overflow the word's running total, is skipped with a warning.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn read_word_counts(dir: &Path) -> Result<WordTally> {
    let mut tally = WordTally::new();

    for path in csv_files(dir)? {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let added = read_file(&path, &file_name, &mut tally)?;
        debug!(file = %file_name, records = added, "word counts read");
    }

    info!(words = tally.len(), "word counts aggregated");
    Ok(tally)
}

/// Sorted list of `.csv` files in `dir` (non-recursive).
fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| StoryPlanError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| StoryPlanError::io(dir, e))?.path();
        let is_csv = path.extension().is_some_and(|e| e == "csv");
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_file(path: &Path, file_name: &str, tally: &mut WordTally) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| StoryPlanError::sheet(path, e.to_string()))?;

    let mut added = 0;
    for record in reader.records() {
        let record = record.map_err(|e| StoryPlanError::sheet(path, e.to_string()))?;
        if record.len() != 2 {
            continue;
        }
        let (word, raw) = (&record[0], &record[1]);
        let Ok(count) = raw.trim().parse::<i64>() else {
            warn!(word, count = raw, file = file_name, "skipping invalid count");
            continue;
        };
        let total = tally.entry(word.to_string()).or_default();
        match total.checked_add(count) {
            Some(sum) => {
                *total = sum;
                added += 1;
            }
            None => {
                warn!(
                    word,
                    count,
                    total = *total,
                    file = file_name,
                    "skipping count that overflows total"
                );
            }
        }
    }
    Ok(added)
}

/// Rank words by count, highest first. Equal counts keep first-seen order.
pub fn rank_words(tally: &WordTally) -> Vec<RankedWord> {
    let mut pairs: Vec<(&String, &i64)> = tally.iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(a.1));
    pairs
        .into_iter()
        .enumerate()
        .map(|(i, (word, count))| RankedWord {
            rank: i + 1,
            word: word.clone(),
            count: *count,
        })
        .collect()
}

/// Fixed-width table of the first `top_n` ranked words.
pub fn format_ranking(ranked: &[RankedWord], top_n: usize) -> String {
    let mut out = format!("{:<5}{:<15}{:<10}\n", "Rank", "Word", "Count");
    out.push_str(&"-".repeat(30));
    out.push('\n');
    for w in ranked.iter().take(top_n) {
        out.push_str(&format!("{:<5}{:<15}{:<10}\n", w.rank, w.word, w.count));
    }
    out
}

/// Bar chart of the first `top_n` ranked words, with counts above the bars.
/// Negative totals are drawn as empty bars.
pub fn top_words_chart(path: &Path, ranked: &[RankedWord], top_n: usize) -> Result<()> {
    let bars: Vec<(String, u64)> = ranked
        .iter()
        .take(top_n)
        .map(|w| (w.word.clone(), u64::try_from(w.count).unwrap_or(0)))
        .collect();
    let width = (bars.len() as u32 * 45).clamp(800, 4000);

    storyplan_charts::bar_chart(
        path,
        &BarChart {
            title: "Top Words by Occurrence",
            x_desc: "Words",
            y_desc: "Counts",
            bars: &bars,
            value_labels: true,
        },
        (width, 700),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures/csv/words")
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "storyplan-words-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn sums_counts_across_csv_files() {
        let tally = read_word_counts(&fixture_dir()).unwrap();

        assert_eq!(tally["the"], 200);
        assert_eq!(tally["ship"], 34);
        assert_eq!(tally["serenity"], 30);
        assert_eq!(tally["captain"], 9);
        // notes.txt is not a CSV file.
        assert_eq!(tally.len(), 4);
    }

    #[test]
    fn invalid_counts_and_odd_records_are_skipped() {
        let tally = read_word_counts(&fixture_dir()).unwrap();
        assert!(!tally.contains_key("river"));
        assert!(!tally.contains_key("word"));
        assert!(!tally.contains_key("single"));
        assert!(!tally.contains_key("three"));
    }

    #[test]
    fn ranking_is_descending() {
        let tally = read_word_counts(&fixture_dir()).unwrap();
        let ranked = rank_words(&tally);

        let words: Vec<&str> = ranked.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["the", "ship", "serenity", "captain"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[3].rank, 4);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let mut tally = WordTally::new();
        tally.insert("b".into(), 5);
        tally.insert("a".into(), 5);
        tally.insert("c".into(), 7);

        let words: Vec<String> = rank_words(&tally).into_iter().map(|w| w.word).collect();
        assert_eq!(words, vec!["c", "b", "a"]);
    }

    #[test]
    fn ranking_table_layout() {
        let ranked = vec![
            RankedWord {
                rank: 1,
                word: "the".into(),
                count: 200,
            },
            RankedWord {
                rank: 2,
                word: "ship".into(),
                count: 34,
            },
        ];
        let table = format_ranking(&ranked, 1);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Rank Word           Count     ");
        assert_eq!(lines[1], "-".repeat(30));
        assert_eq!(lines[2], "1    the            200       ");
    }

    #[test]
    fn negative_counts_reduce_the_total() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("w.csv"), "drift,10\ndrift,-3\n").unwrap();
        let tally = read_word_counts(&tmp).unwrap();
        assert_eq!(tally["drift"], 7);
    }

    #[test]
    fn overflowing_count_is_skipped() {
        let tmp = temp_dir();
        std::fs::write(
            tmp.join("w.csv"),
            format!("tide,{}\ntide,1\nkeel,2\n", i64::MAX),
        )
        .unwrap();

        let tally = read_word_counts(&tmp).unwrap();
        assert_eq!(tally["tide"], i64::MAX);
        assert_eq!(tally["keel"], 2);
    }

    #[test]
    fn negative_totals_chart_as_empty_bars() {
        let tmp = temp_dir();
        let ranked = vec![RankedWord {
            rank: 1,
            word: "drift".into(),
            count: -4,
        }];
        let path = tmp.join("neg.svg");
        top_words_chart(&path, &ranked, 5).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn missing_directory_is_fatal() {
        let err = read_word_counts(Path::new("/nonexistent/words")).unwrap_err();
        assert!(matches!(err, StoryPlanError::Io { .. }));
    }

    #[test]
    fn whitespace_around_counts_is_accepted() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("w.csv"), "hope, 3\nhope,4\n").unwrap();
        let tally = read_word_counts(&tmp).unwrap();
        assert_eq!(tally["hope"], 7);
    }

    #[test]
    fn chart_is_written() {
        let tmp = temp_dir();
        let tally = read_word_counts(&fixture_dir()).unwrap();
        let path = tmp.join("top.svg");
        top_words_chart(&path, &rank_words(&tally), 3).unwrap();
        assert!(path.exists());
    }
}
