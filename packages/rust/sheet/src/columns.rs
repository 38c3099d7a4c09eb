//! Header resolution and row-to-record mapping.

use std::path::Path;

use storyplan_shared::{PLAN_COLUMNS, Result, SceneRow, StoryPlanError};

/// Positions of every required column within a header row, in
/// [`PLAN_COLUMNS`] order.
#[derive(Debug, Clone)]
pub(crate) struct ColumnIndex {
    positions: [usize; PLAN_COLUMNS.len()],
}

impl ColumnIndex {
    /// Locate each required column in `header`. Matching is exact.
    pub(crate) fn resolve(path: &Path, header: &[String]) -> Result<Self> {
        let mut positions = [0usize; PLAN_COLUMNS.len()];
        for (slot, column) in positions.iter_mut().zip(PLAN_COLUMNS) {
            *slot = header
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| StoryPlanError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                })?;
        }
        Ok(Self { positions })
    }

    /// Build a [`SceneRow`] from one data row. `line` is the 1-based row
    /// number in the source, used only for error messages.
    pub(crate) fn scene_row(&self, path: &Path, line: usize, cells: &[String]) -> Result<SceneRow> {
        let field = |i: usize| -> Result<String> {
            let pos = self.positions[i];
            cells.get(pos).cloned().ok_or_else(|| {
                StoryPlanError::sheet(
                    path,
                    format!(
                        "row {line} has no value for column '{}' (position {pos})",
                        PLAN_COLUMNS[i]
                    ),
                )
            })
        };

        Ok(SceneRow {
            week: field(0)?,
            arc: field(1)?,
            chapter: field(2)?,
            location: field(3)?,
            uniform: field(4)?,
            time: field(5)?,
            weather: field(6)?,
            day: field(7)?,
            description: field(8)?,
            pov: field(9)?,
            temperature: field(10)?,
        })
    }
}

/// True when every cell is blank.
pub(crate) fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|c| c.trim().is_empty())
}
