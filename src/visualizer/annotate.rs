//! Detection markers: box geometry, label text and pure-Rust drawing

use crate::template_matching::BoundingBox;
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::Path;

/// Marker color (green)
pub const MARKER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
/// Rectangle outline width in pixels
pub const MARKER_THICKNESS: u32 = 2;
/// Label baseline distance above the box's top edge
pub const LABEL_OFFSET: i32 = 10;
/// Label glyph height in pixels
pub const LABEL_SCALE: f32 = 16.0;

/// Where a label font is looked for when none is configured
const FONT_SEARCH_PATHS: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
];

/// Marker for a detection on the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub bbox: BoundingBox,
    pub score: f64,
}

impl Annotation {
    pub fn new(bbox: BoundingBox, score: f64) -> Self {
        Self { bbox, score }
    }

    /// Confidence label, rounded to two decimals
    pub fn label(&self) -> String {
        format!("Detected (Conf: {:.2})", self.score)
    }

    /// Bottom-left of the label text; may be negative near the top edge
    pub fn label_origin(&self) -> (i32, i32) {
        (
            self.bbox.top_left.x as i32,
            self.bbox.top_left.y as i32 - LABEL_OFFSET,
        )
    }
}

/// Draw the annotation's box outline onto `image`
pub fn draw_annotation(image: &mut RgbImage, annotation: &Annotation) {
    let bbox = annotation.bbox;
    let (x, y) = (bbox.top_left.x as i32, bbox.top_left.y as i32);
    let (width, height) = (bbox.width(), bbox.height());

    for inset in 0..MARKER_THICKNESS {
        let Some(w) = width.checked_sub(2 * inset).filter(|&w| w > 0) else {
            break;
        };
        let Some(h) = height.checked_sub(2 * inset).filter(|&h| h > 0) else {
            break;
        };
        let rect = Rect::at(x + inset as i32, y + inset as i32).of_size(w, h);
        draw_hollow_rect_mut(image, rect, MARKER_COLOR);
    }
}

/// Load the label font from `path`, or from the first standard location
/// holding a usable one when `path` is `None`
pub fn load_label_font(path: Option<&Path>) -> Option<FontVec> {
    let candidates: Vec<&Path> = match path {
        Some(path) => vec![path],
        None => FONT_SEARCH_PATHS.iter().map(Path::new).collect(),
    };

    for candidate in candidates {
        let Ok(data) = std::fs::read(candidate) else {
            continue;
        };
        match FontVec::try_from_vec(data) {
            Ok(font) => {
                log::debug!("Label font {}", candidate.display());
                return Some(font);
            }
            Err(e) => log::warn!("⚠️ Label font {} unusable: {}", candidate.display(), e),
        }
    }

    log::warn!("⚠️ No label font found, labels are left off snapshots");
    None
}

/// Draw the confidence label with its baseline at [`Annotation::label_origin`]
pub fn draw_label(image: &mut RgbImage, annotation: &Annotation, font: &impl Font) {
    let scale = PxScale::from(LABEL_SCALE);
    let (x, baseline) = annotation.label_origin();
    // imageproc places text by its top edge
    let top = baseline - font.as_scaled(scale).ascent().round() as i32;
    draw_text_mut(image, MARKER_COLOR, x, top, scale, font, &annotation.label());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_matching::Point;

    fn annotation_at(x: u32, y: u32, w: u32, h: u32, score: f64) -> Annotation {
        Annotation::new(BoundingBox::from_placement(Point::new(x, y), w, h), score)
    }

    #[test]
    fn test_label_rounds_to_two_decimals() {
        assert_eq!(annotation_at(0, 0, 1, 1, 0.876).label(), "Detected (Conf: 0.88)");
        assert_eq!(annotation_at(0, 0, 1, 1, 1.0).label(), "Detected (Conf: 1.00)");
    }

    #[test]
    fn test_label_sits_above_box() {
        assert_eq!(annotation_at(20, 15, 4, 4, 0.9).label_origin(), (20, 5));
        assert_eq!(annotation_at(3, 2, 4, 4, 0.9).label_origin(), (3, -8));
    }

    #[test]
    fn test_outline_is_two_pixels_wide() {
        let mut image = RgbImage::new(20, 20);
        draw_annotation(&mut image, &annotation_at(4, 4, 10, 8, 0.9));

        assert_eq!(image.get_pixel(4, 4), &MARKER_COLOR);
        assert_eq!(image.get_pixel(5, 5), &MARKER_COLOR);
        assert_eq!(image.get_pixel(13, 11), &MARKER_COLOR);
        assert_eq!(image.get_pixel(12, 10), &MARKER_COLOR);
        // Interior and outside stay untouched
        assert_eq!(image.get_pixel(8, 8), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(14, 12), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_missing_font_file_gives_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_label_font(Some(&dir.path().join("none.ttf"))).is_none());

        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        assert!(load_label_font(Some(&bogus)).is_none());
    }

    #[test]
    fn test_label_drawn_above_box() {
        // Needs a system font; hosts without one have nothing to render with
        let Some(font) = load_label_font(None) else {
            return;
        };
        let mut image = RgbImage::new(200, 60);
        let annotation = annotation_at(10, 30, 40, 20, 0.91);

        draw_label(&mut image, &annotation, &font);

        let above_box = (0..30)
            .flat_map(|y| (0..200).map(move |x| (x, y)))
            .filter(|&(x, y)| image.get_pixel(x, y)[1] > 0)
            .count();
        let inside_box = (30..60)
            .flat_map(|y| (0..200).map(move |x| (x, y)))
            .filter(|&(x, y)| image.get_pixel(x, y)[1] > 0)
            .count();
        assert!(above_box > 0);
        assert_eq!(inside_box, 0);
    }

    #[test]
    fn test_thin_box_does_not_panic() {
        let mut image = RgbImage::new(5, 5);
        draw_annotation(&mut image, &annotation_at(1, 1, 1, 3, 0.9));
        assert_eq!(image.get_pixel(1, 1), &MARKER_COLOR);
    }
}
