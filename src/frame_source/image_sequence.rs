//! Still-image directory played back as a frame stream

use super::FrameSource;
use image::RgbImage;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Frames read one file at a time from a directory, in file-name order
#[derive(Debug)]
pub struct ImageSequenceSource {
    pending: VecDeque<PathBuf>,
}

impl ImageSequenceSource {
    /// List the frame files of `directory`; an unreadable directory gives an
    /// already exhausted source
    pub fn open(directory: &Path) -> Self {
        let mut paths: Vec<PathBuf> = match std::fs::read_dir(directory) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && is_frame_file(path))
                .collect(),
            Err(e) => {
                log::warn!(
                    "⚠️ Frame directory {} unreadable: {}",
                    directory.display(),
                    e
                );
                Vec::new()
            }
        };
        paths.sort();

        log::debug!("{} frame files in {}", paths.len(), directory.display());
        Self {
            pending: paths.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Option<RgbImage> {
        let path = self.pending.pop_front()?;
        match image::open(&path) {
            Ok(image) => Some(image.to_rgb8()),
            Err(e) => {
                // Same as a mid-stream decode failure: the stream ends here
                log::warn!("⚠️ Frame {} unreadable, ending stream: {}", path.display(), e);
                self.pending.clear();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_frames_play_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(2, 2, Rgb([2, 2, 2]))
            .save(dir.path().join("frame_002.png"))
            .unwrap();
        RgbImage::from_pixel(2, 2, Rgb([1, 1, 1]))
            .save(dir.path().join("frame_001.png"))
            .unwrap();
        std::fs::write(dir.path().join("README.txt"), b"skip").unwrap();

        let mut source = ImageSequenceSource::open(dir.path());
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_frame().unwrap().get_pixel(0, 0), &Rgb([1, 1, 1]));
        assert_eq!(source.next_frame().unwrap().get_pixel(0, 0), &Rgb([2, 2, 2]));
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_unreadable_frame_ends_stream() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::new(2, 2).save(dir.path().join("a.png")).unwrap();
        std::fs::write(dir.path().join("b.png"), b"garbage").unwrap();
        RgbImage::new(2, 2).save(dir.path().join("c.png")).unwrap();

        let mut source = ImageSequenceSource::open(dir.path());
        assert!(source.next_frame().is_some());
        assert!(source.next_frame().is_none());
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_missing_directory_is_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ImageSequenceSource::open(&dir.path().join("missing"));
        assert!(source.next_frame().is_none());
    }
}
