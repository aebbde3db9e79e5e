//! Staff name tag detection over a frame stream
//!
//! Ties the matcher to a threshold decision, accumulates detections in a
//! run-owned [`ResultSet`] and persists them as JSON once the stream ends.

pub mod detector;
pub mod pipeline;
pub mod results;
pub mod writer;


// Re-export main types and functions
pub use detector::Detector;
pub use pipeline::{Pipeline, RunOutcome, RunReport, build_visualizer, run_detection};
pub use results::{Detection, ResultSet};
pub use writer::{CoordinateRecord, ResultFile, read_results, to_json, write_results};
