//! Scene-plan loader.
//!
//! Reads a planning workbook (`.xlsx`, `.xls`, `.ods`, ...) through `calamine`
//! or a `.csv` export through the `csv` crate, and maps every data row onto a
//! [`SceneRow`] using the fixed header set in [`PLAN_COLUMNS`].
//!
//! Any failure here is fatal for the run: a missing file, an unknown sheet, a
//! missing column, or a malformed row all surface as errors before any chapter
//! is written.
//!
//! [`PLAN_COLUMNS`]: storyplan_shared::PLAN_COLUMNS

mod columns;

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::{debug, info, instrument};

use storyplan_shared::{Result, SceneRow, SheetSelector, StoryPlanError};

use columns::{ColumnIndex, is_blank};

/// Timestamp layout for date cells.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Layout for time-only cells (serial value below one day).
const TIME_FORMAT: &str = "%H:%M:%S";

/// Load every scene row from `path`.
///
/// `sheet` picks the worksheet of a workbook; it is ignored for CSV input.
#[instrument(skip_all, fields(path = %path.display(), sheet = %sheet))]
pub fn load_plan(path: &Path, sheet: &SheetSelector) -> Result<Vec<SceneRow>> {
    // Surface a plain not-found/permission error before the format-specific readers.
    std::fs::metadata(path).map_err(|e| StoryPlanError::io(path, e))?;

    let table = if is_csv(path) {
        debug!("reading CSV export, sheet selector ignored");
        read_csv_table(path)?
    } else {
        read_workbook_table(path, sheet)?
    };

    let rows = rows_from_table(path, table)?;
    info!(row_count = rows.len(), "loaded scene plan");
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Read a worksheet into a grid of cell text (header row first).
fn read_workbook_table(path: &Path, sheet: &SheetSelector) -> Result<Vec<Vec<String>>> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| StoryPlanError::sheet(path, e.to_string()))?;

    let not_found = || StoryPlanError::SheetNotFound {
        path: path.to_path_buf(),
        sheet: sheet.to_string(),
    };

    let range = match sheet {
        SheetSelector::Index(i) => workbook
            .worksheet_range_at(*i)
            .ok_or_else(not_found)?
            .map_err(|e| StoryPlanError::sheet(path, e.to_string()))?,
        SheetSelector::Name(name) => {
            if !workbook.sheet_names().iter().any(|n| n == name) {
                return Err(not_found());
            }
            workbook
                .worksheet_range(name)
                .map_err(|e| StoryPlanError::sheet(path, e.to_string()))?
        }
    };

    debug!(rows = range.height(), cols = range.width(), "worksheet range read");

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// Read a CSV file with a header row into a grid of cell text.
fn read_csv_table(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| StoryPlanError::sheet(path, e.to_string()))?;

    let header = reader
        .headers()
        .map_err(|e| StoryPlanError::sheet(path, e.to_string()))?
        .iter()
        .map(String::from)
        .collect();

    let mut table = vec![header];
    for record in reader.records() {
        let record = record.map_err(|e| StoryPlanError::sheet(path, e.to_string()))?;
        table.push(record.iter().map(String::from).collect());
    }
    Ok(table)
}

/// Render one workbook cell as text. Whole floats lose their `.0`, dates use
/// [`DATETIME_FORMAT`], times of day use [`TIME_FORMAT`], empty cells become
/// `""`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::DateTime(dt) => {
            let layout = if dt.as_f64() < 1.0 {
                TIME_FORMAT
            } else {
                DATETIME_FORMAT
            };
            dt.as_datetime()
                .map(|d| d.format(layout).to_string())
                .unwrap_or_else(|| dt.as_f64().to_string())
        }
        other => other.to_string(),
    }
}

fn rows_from_table(path: &Path, table: Vec<Vec<String>>) -> Result<Vec<SceneRow>> {
    let mut lines = table.into_iter();
    let header = lines
        .next()
        .ok_or_else(|| StoryPlanError::sheet(path, "sheet is empty (no header row)"))?;
    let index = ColumnIndex::resolve(path, &header)?;

    let mut rows = Vec::new();
    for (offset, cells) in lines.enumerate() {
        if is_blank(&cells) {
            continue;
        }
        // Header is line 1.
        rows.push(index.scene_row(path, offset + 2, &cells)?);
    }
    Ok(rows)
}
