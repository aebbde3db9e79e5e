//! Per-frame threshold decision

use super::results::Detection;
use crate::template_matching::MatchResult;

/// Turns a frame's best match into a detection when it clears the threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detector {
    threshold: f64,
}

impl Detector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Detection for `frame` iff a box was found and `score >= threshold`
    pub fn evaluate(&self, frame: usize, matched: &MatchResult) -> Option<Detection> {
        let bbox = matched.bbox?;
        if matched.score >= self.threshold {
            Some(Detection {
                frame,
                bbox,
                score: matched.score,
            })
        } else {
            None
        }
    }
}
