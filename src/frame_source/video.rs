//! Video file decoding through OpenCV

use super::FrameSource;
use crate::error::{DetectError, DetectResult};
use image::RgbImage;
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture},
};
use std::path::Path;

/// Decoder over a video file; exhausted immediately if the file cannot be opened
pub struct VideoFileSource {
    capture: Option<VideoCapture>,
}

impl VideoFileSource {
    pub fn open(path: &Path) -> Self {
        let capture = match VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY) {
            Ok(capture) if capture.is_opened().unwrap_or(false) => Some(capture),
            Ok(_) => {
                log::warn!("⚠️ Video {} could not be opened", path.display());
                None
            }
            Err(e) => {
                log::warn!("⚠️ Video {} could not be opened: {}", path.display(), e);
                None
            }
        };

        Self { capture }
    }

    fn read(capture: &mut VideoCapture) -> DetectResult<Option<RgbImage>> {
        let mut frame = Mat::default();
        if !capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        bgr_mat_to_rgb(&frame).map(Some)
    }

    fn release(&mut self) {
        if let Some(mut capture) = self.capture.take()
            && let Err(e) = capture.release()
        {
            log::warn!("⚠️ Releasing video decoder failed: {}", e);
        }
    }
}

impl FrameSource for VideoFileSource {
    fn next_frame(&mut self) -> Option<RgbImage> {
        let capture = self.capture.as_mut()?;
        match Self::read(capture) {
            Ok(Some(frame)) => Some(frame),
            Ok(None) => {
                log::debug!("Video stream exhausted");
                self.release();
                None
            }
            Err(e) => {
                log::warn!("⚠️ Video decode failed, ending stream: {}", e);
                self.release();
                None
            }
        }
    }
}

impl Drop for VideoFileSource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Copy an 8-bit, 3-channel BGR matrix into an RGB buffer
pub fn bgr_mat_to_rgb(mat: &Mat) -> DetectResult<RgbImage> {
    if mat.channels() != 3 {
        return Err(DetectError::FrameConversion {
            description: format!("expected 3 channels, got {}", mat.channels()),
        });
    }

    let continuous;
    let mat = if mat.is_continuous() {
        mat
    } else {
        continuous = mat.try_clone()?;
        &continuous
    };

    let (width, height) = (mat.cols() as u32, mat.rows() as u32);
    let mut data = mat.data_bytes()?.to_vec();
    for pixel in data.chunks_exact_mut(3) {
        pixel.swap(0, 2);
    }

    RgbImage::from_raw(width, height, data).ok_or_else(|| DetectError::FrameConversion {
        description: format!("buffer does not hold {width}x{height} RGB pixels"),
    })
}
