//! Application configuration for StoryPlan.
//!
//! User config lives at `~/.storyplan/storyplan.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoryPlanError};
use crate::types::SheetSelector;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "storyplan.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".storyplan";

// ---------------------------------------------------------------------------
// Config structs (matching storyplan.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Defaults for `storyplan plan`.
    #[serde(default)]
    pub plan: PlanDefaults,

    /// Defaults for `storyplan words`.
    #[serde(default)]
    pub words: WordsDefaults,
}

/// `[plan]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDefaults {
    /// Sheet name or zero-based index.
    #[serde(default = "default_sheet")]
    pub sheet: String,

    /// Directory chapter notes are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Prepend a YAML metadata block to each chapter note.
    #[serde(default)]
    pub add_metadata: bool,

    /// Tags written into the metadata block.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Compute day-of-week scene counts.
    #[serde(default)]
    pub generate_metrics: bool,

    /// Persist the metrics chart under `<output_dir>/images/`.
    #[serde(default)]
    pub save_metrics: bool,
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self {
            sheet: default_sheet(),
            output_dir: default_output_dir(),
            add_metadata: false,
            tags: Vec::new(),
            generate_metrics: false,
            save_metrics: false,
        }
    }
}

fn default_sheet() -> String {
    "0".into()
}
fn default_output_dir() -> String {
    "chapters".into()
}

/// `[words]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordsDefaults {
    /// How many ranked words to print and plot.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for WordsDefaults {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> usize {
    20
}

// ---------------------------------------------------------------------------
// Plan config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime configuration for one spreadsheet-to-markdown run.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// Workbook or CSV holding the scene plan.
    pub input: PathBuf,
    /// Worksheet to read.
    pub sheet: SheetSelector,
    /// Directory chapter notes are written to.
    pub output_dir: PathBuf,
    /// Prepend a metadata block.
    pub add_metadata: bool,
    /// Tags for the metadata block.
    pub tags: Vec<String>,
    /// Compute day-of-week scene counts.
    pub generate_metrics: bool,
    /// Write the metrics chart to disk.
    pub save_metrics: bool,
    /// Value of the `generated_by` metadata field.
    pub generated_by: String,
}

impl PlanConfig {
    /// Build a run config for `input` from the file-level defaults.
    pub fn from_app(input: impl Into<PathBuf>, config: &AppConfig) -> Self {
        let sheet = config.plan.sheet.parse().unwrap_or_default();
        Self {
            input: input.into(),
            sheet,
            output_dir: PathBuf::from(&config.plan.output_dir),
            add_metadata: config.plan.add_metadata,
            tags: config.plan.tags.clone(),
            generate_metrics: config.plan.generate_metrics,
            save_metrics: config.plan.save_metrics,
            generated_by: "storyplan".into(),
        }
    }
}

/// Split a comma-separated tag list, trimming each item and dropping empties.
pub fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.storyplan/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| StoryPlanError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.storyplan/storyplan.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| StoryPlanError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| StoryPlanError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| StoryPlanError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| StoryPlanError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| StoryPlanError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
