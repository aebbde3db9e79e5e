//! Live review window through OpenCV highgui

use super::{Annotation, Flow, Visualizer};
use crate::error::DetectResult;
use crate::frame_source::Frame;
use image::RgbImage;
use opencv::{
    core::{CV_8UC3, Mat, Point, Rect, Scalar},
    highgui, imgproc,
    prelude::*,
};

/// Shows every frame in a named window and polls the quit key once per frame
pub struct HighguiVisualizer {
    window: String,
    quit_key: char,
}

impl HighguiVisualizer {
    pub fn new(window: impl Into<String>, quit_key: char) -> DetectResult<Self> {
        let window = window.into();
        highgui::named_window(&window, highgui::WINDOW_AUTOSIZE)?;
        log::info!("🪟 Review window '{}' open, press '{}' to quit", window, quit_key);
        Ok(Self { window, quit_key })
    }

    fn draw(mat: &mut Mat, annotation: &Annotation) -> DetectResult<()> {
        let green = Scalar::new(0.0, 255.0, 0.0, 0.0);
        let bbox = annotation.bbox;
        let rect = Rect::new(
            bbox.top_left.x as i32,
            bbox.top_left.y as i32,
            bbox.width() as i32,
            bbox.height() as i32,
        );
        imgproc::rectangle(mat, rect, green, 2, imgproc::LINE_8, 0)?;

        let (x, y) = annotation.label_origin();
        imgproc::put_text(
            mat,
            &annotation.label(),
            Point::new(x, y),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.5,
            green,
            1,
            imgproc::LINE_8,
            false,
        )?;
        Ok(())
    }
}

impl Visualizer for HighguiVisualizer {
    fn present(&mut self, frame: &Frame, annotation: Option<&Annotation>) -> DetectResult<Flow> {
        let mut mat = rgb_to_bgr_mat(&frame.image)?;
        if let Some(annotation) = annotation {
            Self::draw(&mut mat, annotation)?;
        }

        highgui::imshow(&self.window, &mat)?;
        let key = highgui::wait_key(1)?;
        if key >= 0 && (key & 0xFF) == self.quit_key as i32 {
            log::info!("Quit key pressed at frame {}", frame.index);
            return Ok(Flow::Quit);
        }

        Ok(Flow::Continue)
    }
}

impl Drop for HighguiVisualizer {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_all_windows() {
            log::warn!("⚠️ Closing review window failed: {}", e);
        }
    }
}

/// Copy an RGB buffer into a new 8-bit BGR matrix
fn rgb_to_bgr_mat(image: &RgbImage) -> DetectResult<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        image.height() as i32,
        image.width() as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )?;

    let bytes = mat.data_bytes_mut()?;
    for (dst, src) in bytes.chunks_exact_mut(3).zip(image.pixels()) {
        dst[0] = src[2];
        dst[1] = src[1];
        dst[2] = src[0];
    }

    Ok(mat)
}
