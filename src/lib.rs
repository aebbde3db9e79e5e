pub mod args;
pub mod config;
pub mod error;
pub mod frame_source;
pub mod staff_detection;
pub mod template_matching;
pub mod visualizer;

pub use config::DetectConfig;
pub use error::{DetectError, DetectResult};
pub use staff_detection::{Pipeline, RunReport, run_detection};
