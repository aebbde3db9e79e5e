//! Review surfaces for the detection loop
//!
//! The pipeline hands every frame, plus the annotation for a detection on
//! that frame, to a [`Visualizer`]. Rendering never feeds back into the
//! detection results; it can only ask the loop to stop.

pub mod annotate;
#[cfg(feature = "opencv")]
pub mod highgui;
pub mod snapshot;

pub use annotate::{Annotation, draw_annotation, draw_label, load_label_font};
#[cfg(feature = "opencv")]
pub use highgui::HighguiVisualizer;
pub use snapshot::SnapshotVisualizer;

use crate::error::DetectResult;
use crate::frame_source::Frame;

/// What the loop should do after a frame was presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub trait Visualizer {
    /// Show one frame, annotated when it carries a detection
    fn present(&mut self, frame: &Frame, annotation: Option<&Annotation>) -> DetectResult<Flow>;
}

impl<V: Visualizer + ?Sized> Visualizer for Box<V> {
    fn present(&mut self, frame: &Frame, annotation: Option<&Annotation>) -> DetectResult<Flow> {
        (**self).present(frame, annotation)
    }
}

/// Headless run with no review output
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVisualizer;

impl Visualizer for NullVisualizer {
    fn present(&mut self, _frame: &Frame, _annotation: Option<&Annotation>) -> DetectResult<Flow> {
        Ok(Flow::Continue)
    }
}
