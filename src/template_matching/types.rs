/// Template matching data types
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// A grayscale reference image to search for
#[derive(Clone, Debug)]
pub struct Template {
    /// Template label, taken from the file stem (e.g. "manA")
    pub name: String,
    image: GrayImage,
}

impl Template {
    pub fn new(name: impl Into<String>, image: GrayImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Width of the pixel buffer
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the pixel buffer
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// A pixel coordinate, serialized as `[x, y]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<[u32; 2]> for Point {
    fn from([x, y]: [u32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [u32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Rectangle given by its top-left and bottom-right corners,
/// serialized as `[[x1, y1], [x2, y2]]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[Point; 2]", into = "[Point; 2]")]
pub struct BoundingBox {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl BoundingBox {
    /// Box of a `width` x `height` template placed at `top_left`
    pub fn from_placement(top_left: Point, width: u32, height: u32) -> Self {
        Self {
            top_left,
            bottom_right: Point::new(top_left.x + width, top_left.y + height),
        }
    }

    pub fn width(&self) -> u32 {
        self.bottom_right.x.saturating_sub(self.top_left.x)
    }

    pub fn height(&self) -> u32 {
        self.bottom_right.y.saturating_sub(self.top_left.y)
    }

    /// True when the box is non-empty and lies inside a `width` x `height` frame
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.top_left.x < self.bottom_right.x
            && self.top_left.y < self.bottom_right.y
            && self.bottom_right.x <= width
            && self.bottom_right.y <= height
    }
}

impl From<[Point; 2]> for BoundingBox {
    fn from([top_left, bottom_right]: [Point; 2]) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }
}

impl From<BoundingBox> for [Point; 2] {
    fn from(b: BoundingBox) -> Self {
        [b.top_left, b.bottom_right]
    }
}

/// Best match of the whole template set against one frame
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    /// Normalized cross-correlation score; 0.0 when nothing scored above zero
    pub score: f64,
    /// Location of the best template, absent when nothing scored above zero
    pub bbox: Option<BoundingBox>,
    /// Index of the winning template in the matcher's template list
    pub template_index: Option<usize>,
}

impl MatchResult {
    /// Result for a frame where no template produced a positive score
    pub fn none() -> Self {
        Self {
            score: 0.0,
            bbox: None,
            template_index: None,
        }
    }
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_serializes_as_corner_pairs() {
        let bbox = BoundingBox::from_placement(Point::new(20, 15), 12, 10);
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[[20,15],[32,25]]");

        let parsed: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, bbox);
    }

    #[test]
    fn test_bbox_fits_within_frame() {
        let bbox = BoundingBox::from_placement(Point::new(52, 38), 12, 10);
        assert!(bbox.fits_within(64, 48));
        assert!(!bbox.fits_within(63, 48));
        assert_eq!(bbox.width(), 12);
        assert_eq!(bbox.height(), 10);
    }

    #[test]
    fn test_template_dimensions_follow_buffer() {
        let template = Template::new("tag", GrayImage::new(7, 3));
        assert_eq!(template.width(), 7);
        assert_eq!(template.height(), 3);
    }
}
