/// Template matching module for name tag detection in video frames
///
/// This module provides:
/// - Reference image loading with silent skipping of unreadable files
/// - BT.601 luma conversion shared by templates and frames
/// - Zero-mean normalized cross-correlation over every valid placement
/// - Best-of-set selection that keeps the first template on ties
pub mod grayscale;
pub mod loader;
pub mod matcher;
pub mod types;

pub use grayscale::to_luma;
pub use loader::{load_templates, load_templates_from_directory};
pub use matcher::{TemplateMatcher, TemplateScore};
pub use types::{BoundingBox, MatchResult, Point, Template};
