//! Core workflows for StoryPlan.
//!
//! Ties the loader, chapter aggregation, markdown rendering, and charts into
//! end-to-end runs (e.g., `convert_plan`), plus the word-frequency and
//! word-count statistics tools.

pub mod chapters;
pub mod pipeline;
pub mod stats;
pub mod words;
pub mod writer;
