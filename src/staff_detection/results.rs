//! Detections accumulated over one run

use crate::error::{DetectError, DetectResult};
use crate::template_matching::BoundingBox;

/// A frame whose best match cleared the threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub frame: usize,
    pub bbox: BoundingBox,
    /// Match score, shown in the marker label; not persisted
    pub score: f64,
}

/// Append-only, frame-ordered list of detections owned by a single run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    detections: Vec<Detection>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a detection; its frame must come after the last recorded one
    pub fn record(&mut self, detection: Detection) -> DetectResult<()> {
        if let Some(last) = self.detections.last()
            && detection.frame <= last.frame
        {
            return Err(DetectError::FrameOrder {
                previous: last.frame,
                frame: detection.frame,
            });
        }

        self.detections.push(detection);
        Ok(())
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    /// Frame indices of all detections, ascending
    pub fn detected_frames(&self) -> Vec<usize> {
        self.detections.iter().map(|d| d.frame).collect()
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_matching::Point;

    fn detection(frame: usize) -> Detection {
        Detection {
            frame,
            bbox: BoundingBox::from_placement(Point::new(1, 1), 2, 2),
            score: 0.9,
        }
    }

    #[test]
    fn test_record_keeps_frame_order() {
        let mut results = ResultSet::new();
        results.record(detection(2)).unwrap();
        results.record(detection(5)).unwrap();

        assert_eq!(results.detected_frames(), vec![2, 5]);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_out_of_order_frame_rejected() {
        let mut results = ResultSet::new();
        results.record(detection(4)).unwrap();

        let err = results.record(detection(4)).unwrap_err();
        assert!(matches!(err, DetectError::FrameOrder { previous: 4, frame: 4 }));
        assert!(results.record(detection(3)).is_err());
        assert_eq!(results.detected_frames(), vec![4]);
    }
}
