/// Template matching implementation
///
/// Zero-mean normalized cross-correlation over every valid placement, with
/// window sums taken from integral images.
use super::types::{BoundingBox, MatchResult, Point, Template};
use image::GrayImage;

/// Best placement of a single template within a frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemplateScore {
    /// Peak of the correlation surface
    pub score: f64,
    /// Top-left corner of the peak placement (first peak in row-major order)
    pub location: Point,
}

/// Template data with the mean already removed
struct PreparedTemplate {
    centered: Vec<f64>,
    norm: f64,
    width: u32,
    height: u32,
}

impl PreparedTemplate {
    fn new(template: &Template) -> Self {
        let pixels = template.image().as_raw();
        let count = pixels.len().max(1) as f64;
        let mean = pixels.iter().map(|&p| p as f64).sum::<f64>() / count;
        let centered: Vec<f64> = pixels.iter().map(|&p| p as f64 - mean).collect();
        let norm = centered.iter().map(|v| v * v).sum::<f64>().sqrt();

        Self {
            centered,
            norm,
            width: template.width(),
            height: template.height(),
        }
    }
}

/// Summed-area tables of pixel values and squared pixel values
struct IntegralImages {
    sum: Vec<u64>,
    sq_sum: Vec<u64>,
    stride: usize,
}

impl IntegralImages {
    fn new(image: &GrayImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let stride = width + 1;
        let mut sum = vec![0u64; stride * (height + 1)];
        let mut sq_sum = vec![0u64; stride * (height + 1)];
        let raw = image.as_raw();

        for y in 0..height {
            let mut row_sum = 0u64;
            let mut row_sq = 0u64;
            for x in 0..width {
                let v = raw[y * width + x] as u64;
                row_sum += v;
                row_sq += v * v;
                sum[(y + 1) * stride + x + 1] = sum[y * stride + x + 1] + row_sum;
                sq_sum[(y + 1) * stride + x + 1] = sq_sum[y * stride + x + 1] + row_sq;
            }
        }

        Self {
            sum,
            sq_sum,
            stride,
        }
    }

    fn region(table: &[u64], stride: usize, x: usize, y: usize, w: usize, h: usize) -> u64 {
        let (x2, y2) = (x + w, y + h);
        table[y2 * stride + x2] + table[y * stride + x] - table[y * stride + x2] - table[y2 * stride + x]
    }

    fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (f64, f64) {
        (
            Self::region(&self.sum, self.stride, x, y, w, h) as f64,
            Self::region(&self.sq_sum, self.stride, x, y, w, h) as f64,
        )
    }
}

/// Matcher over a fixed, ordered template set
pub struct TemplateMatcher {
    templates: Vec<Template>,
    prepared: Vec<PreparedTemplate>,
}

impl TemplateMatcher {
    pub fn new(templates: Vec<Template>) -> Self {
        let prepared = templates.iter().map(PreparedTemplate::new).collect();
        Self {
            templates,
            prepared,
        }
    }

    /// Get all loaded templates
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Score every template against the frame and keep the best one.
    ///
    /// Starts from a score of 0 and only replaces the current best on a
    /// strictly greater score, so ties keep the earliest template and frames
    /// where nothing correlates positively yield [`MatchResult::none`].
    pub fn best_match(&self, frame: &GrayImage) -> MatchResult {
        if self.templates.is_empty() {
            return MatchResult::none();
        }

        let integral = IntegralImages::new(frame);
        let mut best = MatchResult::none();

        for (index, (template, prepared)) in self.templates.iter().zip(&self.prepared).enumerate() {
            let Some(found) = Self::score_prepared(frame, &integral, prepared) else {
                log::debug!(
                    "Template '{}' ({}x{}) larger than frame {}x{}, skipped",
                    template.name,
                    template.width(),
                    template.height(),
                    frame.width(),
                    frame.height()
                );
                continue;
            };

            log::debug!(
                "Template '{}' peak {:.4} at ({},{})",
                template.name,
                found.score,
                found.location.x,
                found.location.y
            );

            if found.score > best.score {
                best = MatchResult {
                    score: found.score,
                    bbox: Some(BoundingBox::from_placement(
                        found.location,
                        template.width(),
                        template.height(),
                    )),
                    template_index: Some(index),
                };
            }
        }

        best
    }

    /// Peak of one template's correlation surface, or `None` when the
    /// template does not fit inside the frame
    pub fn score_template(&self, frame: &GrayImage, index: usize) -> Option<TemplateScore> {
        let prepared = self.prepared.get(index)?;
        let integral = IntegralImages::new(frame);
        Self::score_prepared(frame, &integral, prepared)
    }

    fn score_prepared(
        frame: &GrayImage,
        integral: &IntegralImages,
        template: &PreparedTemplate,
    ) -> Option<TemplateScore> {
        if template.width == 0
            || template.height == 0
            || template.width > frame.width()
            || template.height > frame.height()
        {
            return None;
        }

        // A flat template correlates equally with every window
        if template.norm < f64::EPSILON {
            return Some(TemplateScore {
                score: 1.0,
                location: Point::new(0, 0),
            });
        }

        let frame_width = frame.width() as usize;
        let (tw, th) = (template.width as usize, template.height as usize);
        let count = (tw * th) as f64;
        let raw = frame.as_raw();

        let mut best: Option<TemplateScore> = None;

        // Valid-only surface: (W - w + 1) x (H - h + 1)
        // TODO: FFT correlation for the numerator once full-HD input makes this direct sum too slow
        for y in 0..=(frame.height() as usize - th) {
            for x in 0..=(frame_width - tw) {
                let mut numerator = 0.0;
                for ty in 0..th {
                    let frame_row = &raw[(y + ty) * frame_width + x..][..tw];
                    let template_row = &template.centered[ty * tw..][..tw];
                    numerator += frame_row
                        .iter()
                        .zip(template_row)
                        .map(|(&p, &t)| p as f64 * t)
                        .sum::<f64>();
                }

                let (sum, sq_sum) = integral.window(x, y, tw, th);
                let variance = (sq_sum - sum * sum / count).max(0.0);
                let score = normalize(numerator, variance.sqrt() * template.norm);

                if best.is_none_or(|b| score > b.score) {
                    best = Some(TemplateScore {
                        score,
                        location: Point::new(x as u32, y as u32),
                    });
                }
            }
        }

        best
    }
}

/// Divide by the normalization term, treating flat windows or templates as
/// uncorrelated and clamping small rounding overshoots to +/-1
fn normalize(numerator: f64, denominator: f64) -> f64 {
    if numerator.abs() < denominator {
        numerator / denominator
    } else if numerator.abs() < denominator * 1.125 {
        numerator.signum()
    } else {
        0.0
    }
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
