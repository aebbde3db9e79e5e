//! Headless review: annotated detection frames saved as PNG files

use super::annotate::draw_label;
use super::{Annotation, Flow, Visualizer, draw_annotation};
use crate::error::{DetectError, DetectResult};
use crate::frame_source::Frame;
use ab_glyph::FontVec;
use std::path::{Path, PathBuf};

/// Saves detection frames only; the confidence is in the file name, and
/// drawn above the box too once a label font is set
pub struct SnapshotVisualizer {
    directory: PathBuf,
    label_font: Option<FontVec>,
    saved: usize,
}

impl SnapshotVisualizer {
    /// Create the output directory if needed
    pub fn new(directory: impl Into<PathBuf>) -> DetectResult<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory).map_err(|source| DetectError::SnapshotDir {
            path: directory.clone(),
            source,
        })?;

        Ok(Self {
            directory,
            label_font: None,
            saved: 0,
        })
    }

    pub fn with_label_font(mut self, font: FontVec) -> Self {
        self.label_font = Some(font);
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of annotated frames written so far
    pub fn saved(&self) -> usize {
        self.saved
    }

    fn snapshot_path(&self, frame: &Frame, annotation: &Annotation) -> PathBuf {
        self.directory.join(format!(
            "frame-{:06}-conf{:.2}.png",
            frame.index, annotation.score
        ))
    }
}

impl Visualizer for SnapshotVisualizer {
    fn present(&mut self, frame: &Frame, annotation: Option<&Annotation>) -> DetectResult<Flow> {
        let Some(annotation) = annotation else {
            return Ok(Flow::Continue);
        };

        let mut image = frame.image.clone();
        draw_annotation(&mut image, annotation);
        if let Some(font) = &self.label_font {
            draw_label(&mut image, annotation, font);
        }

        let path = self.snapshot_path(frame, annotation);
        image
            .save(&path)
            .map_err(|source| DetectError::SnapshotWrite {
                path: path.clone(),
                source,
            })?;

        self.saved += 1;
        log::debug!("Saved snapshot {}", path.display());
        Ok(Flow::Continue)
    }
}
