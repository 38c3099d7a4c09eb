//! Shared types, error model, and configuration for StoryPlan.
//!
//! This crate is the foundation depended on by all other StoryPlan crates.
//! It provides:
//! - [`StoryPlanError`] — the unified error type
//! - Domain types ([`SceneRow`], [`ChapterAggregate`], [`SheetSelector`], [`Manuscript`])
//! - Configuration ([`AppConfig`], [`PlanConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, PlanConfig, PlanDefaults, WordsDefaults, config_dir, config_file_path,
    init_config, load_config, load_config_from, parse_tags,
};
pub use error::{Result, StoryPlanError};
pub use types::{
    ChapterAggregate, ChapterWordCounts, Manuscript, PLAN_COLUMNS, SceneRow, SheetSelector,
};
