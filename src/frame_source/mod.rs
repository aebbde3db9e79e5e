//! Frame sources for the detection loop
//!
//! A source yields RGB frames in playback order until it returns `None`,
//! which covers both a finished stream and a decode failure. Decoder handles
//! are released when the source is dropped.

pub mod image_sequence;
#[cfg(feature = "opencv")]
pub mod video;

pub use image_sequence::ImageSequenceSource;
#[cfg(feature = "opencv")]
pub use video::VideoFileSource;

use crate::error::DetectResult;
use crate::template_matching::to_luma;
use image::{GrayImage, RgbImage};
use std::collections::VecDeque;
use std::path::Path;

/// A decoded frame with its zero-based position in the stream
#[derive(Clone, Debug)]
pub struct Frame {
    pub index: usize,
    pub image: RgbImage,
}

impl Frame {
    /// Single-channel luma copy of the frame, as used for matching
    pub fn to_gray(&self) -> GrayImage {
        to_luma(&self.image)
    }
}

/// Sequential frame producer
pub trait FrameSource {
    /// Next frame, or `None` once the stream is exhausted or unreadable
    fn next_frame(&mut self) -> Option<RgbImage>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Option<RgbImage> {
        (**self).next_frame()
    }
}

/// Frames held in memory, for synthetic inputs
#[derive(Debug, Default)]
pub struct MemoryFrameSource {
    frames: VecDeque<RgbImage>,
}

impl MemoryFrameSource {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for MemoryFrameSource {
    fn next_frame(&mut self) -> Option<RgbImage> {
        self.frames.pop_front()
    }
}

/// Open the input at `path`: a directory plays as an image sequence, a file
/// is decoded as video, and a missing path is an empty stream.
pub fn open_frame_source(path: &Path) -> DetectResult<Box<dyn FrameSource>> {
    if !path.exists() {
        log::warn!("⚠️ Input {} not found, no frames to scan", path.display());
        return Ok(Box::new(MemoryFrameSource::default()));
    }

    if path.is_dir() {
        log::info!("🎞️ Reading frames from directory {}", path.display());
        return Ok(Box::new(ImageSequenceSource::open(path)));
    }

    open_video(path)
}

#[cfg(feature = "opencv")]
fn open_video(path: &Path) -> DetectResult<Box<dyn FrameSource>> {
    log::info!("🎞️ Opening video {}", path.display());
    Ok(Box::new(VideoFileSource::open(path)))
}

#[cfg(not(feature = "opencv"))]
fn open_video(path: &Path) -> DetectResult<Box<dyn FrameSource>> {
    Err(crate::error::DetectError::VideoUnsupported {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_copy_uses_bt601_luma() {
        let frame = Frame {
            index: 0,
            image: RgbImage::from_pixel(2, 2, image::Rgb([255, 0, 0])),
        };
        assert_eq!(frame.to_gray().get_pixel(1, 1), &image::Luma([76]));
    }

    #[test]
    fn test_memory_source_yields_in_order_then_ends() {
        let mut source = MemoryFrameSource::new(vec![
            RgbImage::new(1, 1),
            RgbImage::new(2, 2),
        ]);

        assert_eq!(source.next_frame().unwrap().width(), 1);
        assert_eq!(source.next_frame().unwrap().width(), 2);
        assert!(source.next_frame().is_none());
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_directory_opens_as_sequence() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::new(4, 3).save(dir.path().join("000.png")).unwrap();

        let mut source = open_frame_source(dir.path()).unwrap();
        assert_eq!(source.next_frame().unwrap().dimensions(), (4, 3));
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_missing_input_is_empty_stream() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = open_frame_source(&dir.path().join("sampleA.mp4")).unwrap();
        assert!(source.next_frame().is_none());
    }

    #[cfg(not(feature = "opencv"))]
    #[test]
    fn test_video_file_needs_opencv() {
        use crate::error::DetectError;

        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("clip.mp4");
        std::fs::write(&clip, b"\0\0\0\x18ftypmp42").unwrap();

        let err = open_frame_source(&clip).err().unwrap();
        assert!(matches!(err, DetectError::VideoUnsupported { .. }));
    }
}
