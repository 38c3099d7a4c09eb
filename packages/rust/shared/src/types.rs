//! Core domain types shared by the StoryPlan tools.

use serde::{Deserialize, Serialize};

/// Column headers a scene-planning sheet must carry. Matching is exact and
/// case-sensitive.
pub const PLAN_COLUMNS: [&str; 11] = [
    "Week",
    "Arc",
    "Chapter",
    "Location",
    "Uniform",
    "Time",
    "Weather",
    "Day",
    "Description",
    "POV",
    "Temperature",
];

// ---------------------------------------------------------------------------
// SceneRow
// ---------------------------------------------------------------------------

/// One row of the planning sheet: a single scene's worth of detail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneRow {
    pub week: String,
    pub arc: String,
    /// Chapter key the scene is grouped under. May be blank.
    pub chapter: String,
    /// Hierarchical location text, e.g. `Forest - Clearing, River. Town`.
    pub location: String,
    pub uniform: String,
    pub time: String,
    pub weather: String,
    pub day: String,
    pub description: String,
    pub pov: String,
    pub temperature: String,
}

// ---------------------------------------------------------------------------
// ChapterAggregate
// ---------------------------------------------------------------------------

/// Everything accumulated for one chapter from the rows that share its key.
///
/// The per-scene vectors are parallel: index `i` of each describes scene
/// `i + 1`, and all of them have length [`scene_count`](Self::scene_count).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterAggregate {
    /// Scene numbers, 1..=N in arrival order.
    pub scenes: Vec<usize>,
    pub days: Vec<String>,
    pub locations: Vec<String>,
    pub uniforms: Vec<String>,
    pub weather: Vec<String>,
    pub times: Vec<String>,
    pub descriptions: Vec<String>,
    /// One entry per scene.
    pub weeks: Vec<String>,
    /// Last value seen wins.
    pub pov: String,
    /// Last value seen wins.
    pub temperature: String,
    /// Last value seen wins.
    pub arc: String,
}

impl ChapterAggregate {
    /// Append `row` as the next scene of this chapter.
    pub fn push_scene(&mut self, row: &SceneRow) {
        self.scenes.push(self.scenes.len() + 1);
        self.days.push(row.day.clone());
        self.locations.push(row.location.clone());
        self.uniforms.push(row.uniform.clone());
        self.weather.push(row.weather.clone());
        self.times.push(row.time.clone());
        self.descriptions.push(row.description.clone());
        self.weeks.push(row.week.clone());
        self.pov.clone_from(&row.pov);
        self.temperature.clone_from(&row.temperature);
        self.arc.clone_from(&row.arc);
    }

    /// Number of scenes accumulated so far.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }
}

// ---------------------------------------------------------------------------
// SheetSelector
// ---------------------------------------------------------------------------

/// Which worksheet of a workbook to read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SheetSelector {
    /// Zero-based sheet ordinal.
    Index(usize),
    /// Sheet name, matched exactly.
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl std::fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

impl std::str::FromStr for SheetSelector {
    type Err = std::convert::Infallible;

    /// A purely numeric selector is an ordinal; anything else is a name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<usize>() {
            Ok(i) => Self::Index(i),
            Err(_) => Self::Name(trimmed.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Manuscript word counts
// ---------------------------------------------------------------------------

/// Per-scene word counts for a manuscript, loaded from TOML.
///
/// ```toml
/// [[chapters]]
/// name = "Prologue"
/// scenes = [2627]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manuscript {
    #[serde(default)]
    pub chapters: Vec<ChapterWordCounts>,
}

/// Word counts of each scene in one chapter, in reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterWordCounts {
    pub name: String,
    #[serde(default)]
    pub scenes: Vec<u64>,
}
