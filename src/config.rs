//! Run configuration
//!
//! Defaults reproduce the fixed layout of a `data/` folder next to the
//! binary: one sample video, five reference name tags, `results.json` out.

use crate::error::{DetectError, DetectResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default confidence threshold (inclusive)
pub const DEFAULT_THRESHOLD: f64 = 0.67;
pub const DEFAULT_VIDEO_PATH: &str = "data/sampleA.mp4";
pub const DEFAULT_TEMPLATE_PATHS: [&str; 5] = [
    "data/manA.png",
    "data/manB.png",
    "data/manC.png",
    "data/manE.png",
    "data/manF.png",
];
pub const DEFAULT_OUTPUT_PATH: &str = "results.json";
pub const DEFAULT_WINDOW_TITLE: &str = "Staff Detection";
pub const DEFAULT_QUIT_KEY: char = 'q';

/// Where annotated frames go during a run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Live window with quit-key polling
    #[default]
    Window,
    /// Annotated detection frames written as PNG files
    Snapshots { directory: PathBuf },
    /// No review output
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Video file, or a directory of frame images
    pub video_path: PathBuf,
    /// Reference images in priority order (earlier wins ties)
    pub template_paths: Vec<PathBuf>,
    /// Directory of PNG references, used instead of `template_paths` when set
    pub template_dir: Option<PathBuf>,
    /// Minimum best-match score for a detection
    pub threshold: f64,
    /// Result file, overwritten at the end of every run
    pub output_path: PathBuf,
    pub window_title: String,
    pub quit_key: char,
    pub display: DisplayMode,
    /// TrueType font for snapshot labels; standard system locations when unset
    pub label_font: Option<PathBuf>,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            video_path: PathBuf::from(DEFAULT_VIDEO_PATH),
            template_paths: DEFAULT_TEMPLATE_PATHS.iter().map(PathBuf::from).collect(),
            template_dir: None,
            threshold: DEFAULT_THRESHOLD,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            quit_key: DEFAULT_QUIT_KEY,
            display: DisplayMode::default(),
            label_font: None,
        }
    }
}

impl DetectConfig {
    /// Read a JSON config; fields left out keep their defaults
    pub fn from_file(path: &Path) -> DetectResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DetectError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|source| DetectError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DetectResult<()> {
        if !(-1.0..=1.0).contains(&self.threshold) {
            return Err(DetectError::InvalidThreshold {
                threshold: self.threshold,
            });
        }
        if !self.quit_key.is_ascii() || self.quit_key.is_ascii_control() {
            return Err(DetectError::InvalidQuitKey { key: self.quit_key });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_data_layout() {
        let config = DetectConfig::default();

        assert_eq!(config.threshold, 0.67);
        assert_eq!(config.video_path, PathBuf::from("data/sampleA.mp4"));
        assert_eq!(config.template_paths.len(), 5);
        assert_eq!(config.template_paths[3], PathBuf::from("data/manE.png"));
        assert_eq!(config.output_path, PathBuf::from("results.json"));
        assert_eq!(config.window_title, "Staff Detection");
        assert_eq!(config.quit_key, 'q');
        assert_eq!(config.display, DisplayMode::Window);
        assert_eq!(config.label_font, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detect.json");
        std::fs::write(
            &path,
            r#"{"threshold": 0.8, "display": {"snapshots": {"directory": "out"}}}"#,
        )
        .unwrap();

        let config = DetectConfig::from_file(&path).unwrap();
        assert_eq!(config.threshold, 0.8);
        assert_eq!(
            config.display,
            DisplayMode::Snapshots {
                directory: PathBuf::from("out")
            }
        );
        assert_eq!(config.output_path, PathBuf::from("results.json"));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let config = DetectConfig {
            threshold: 1.5,
            ..DetectConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DetectError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_non_ascii_quit_key_rejected() {
        let config = DetectConfig {
            quit_key: 'é',
            ..DetectConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DetectError::InvalidQuitKey { .. })
        ));
    }

    #[test]
    fn test_unparseable_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DetectConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, DetectError::ConfigParse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
