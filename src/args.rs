use crate::config::{DetectConfig, DisplayMode};
use crate::error::DetectResult;
use clap::Parser;
use std::path::PathBuf;

/// Scan a video for staff name tags and write the matching frames to JSON.
///
/// With no flags, reads `data/sampleA.mp4`, matches against the five
/// `data/man*.png` references and writes `results.json`.
#[derive(Debug, Parser)]
#[command(name = "staff-tag-detect", version, about)]
pub struct Args {
    /// JSON config file; flags below override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Video file, or a directory of frame images
    #[arg(long, value_name = "PATH")]
    pub video: Option<PathBuf>,

    /// Reference image (repeat for several; earlier wins ties)
    #[arg(long = "template", value_name = "FILE")]
    pub templates: Vec<PathBuf>,

    /// Directory of PNG reference images
    #[arg(long, value_name = "DIR", conflicts_with = "templates")]
    pub template_dir: Option<PathBuf>,

    /// Minimum match score for a detection, in [-1, 1]
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Result file to write
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Run without any review window
    #[arg(long, conflicts_with = "snapshots")]
    pub headless: bool,

    /// Save annotated detection frames here instead of opening a window
    #[arg(long, value_name = "DIR")]
    pub snapshots: Option<PathBuf>,

    /// TrueType font for snapshot labels
    #[arg(long, value_name = "FILE")]
    pub label_font: Option<PathBuf>,

    /// Enable debug output (per-template scores)
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Defaults, then the config file, then flags
    pub fn into_config(self) -> DetectResult<DetectConfig> {
        let mut config = match &self.config {
            Some(path) => DetectConfig::from_file(path)?,
            None => DetectConfig::default(),
        };

        if let Some(video) = self.video {
            config.video_path = video;
        }
        if !self.templates.is_empty() {
            config.template_paths = self.templates;
            config.template_dir = None;
        }
        if let Some(dir) = self.template_dir {
            config.template_dir = Some(dir);
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if self.headless {
            config.display = DisplayMode::None;
        } else if let Some(directory) = self.snapshots {
            config.display = DisplayMode::Snapshots { directory };
        }

        if let Some(font) = self.label_font {
            config.label_font = Some(font);
        }

        config.validate()?;
        Ok(config)
    }
}
