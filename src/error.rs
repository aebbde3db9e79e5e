use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for detection runs.
pub type DetectResult<T> = Result<T, DetectError>;

/// The error type for configuration, rendering and result persistence.
///
/// Unreadable templates and video frames are not errors: they shrink the
/// template set or end the frame stream instead.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Confidence threshold {threshold} is outside [-1, 1]")]
    InvalidThreshold { threshold: f64 },

    #[error("Quit key {key:?} is not a single ASCII character")]
    InvalidQuitKey { key: char },

    #[error("Frame {frame} recorded after frame {previous}; detections must be in frame order")]
    FrameOrder { previous: usize, frame: usize },

    #[error("Failed to serialize results: {source}")]
    ResultSerialize {
        #[from]
        source: serde_json::Error,
    },

    #[error("Failed to write results to {path:?}: {source}")]
    ResultWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read results from {path:?}: {description}")]
    ResultRead { path: PathBuf, description: String },

    #[error("Cannot decode video {path:?}: built without the `opencv` feature")]
    VideoUnsupported { path: PathBuf },

    #[error("Failed to create snapshot directory {path:?}: {source}")]
    SnapshotDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to save snapshot {path:?}: {source}")]
    SnapshotWrite {
        path: PathBuf,
        source: image::ImageError,
    },

    #[cfg(feature = "opencv")]
    #[error("OpenCV call failed: {source}")]
    OpenCv {
        #[from]
        source: opencv::Error,
    },

    #[error("Frame buffer conversion failed: {description}")]
    FrameConversion { description: String },
}
