//! The detection loop: frame source -> matcher -> detector -> visualizer,
//! with the result file written once the loop has ended.

use super::detector::Detector;
use super::results::{Detection, ResultSet};
use super::writer::write_results;
use crate::config::{DetectConfig, DisplayMode};
use crate::error::{DetectError, DetectResult};
use crate::frame_source::{Frame, FrameSource, open_frame_source};
use crate::template_matching::{
    Template, TemplateMatcher, load_templates, load_templates_from_directory,
};
use crate::visualizer::{
    Annotation, Flow, NullVisualizer, SnapshotVisualizer, Visualizer, load_label_font,
};

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The frame source ran out (or failed to decode further)
    Exhausted,
    /// The viewer asked to quit
    Quit,
    /// Rendering failed; results up to that frame are kept
    DisplayFailed,
}

/// Everything a finished run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub results: ResultSet,
    pub frames_processed: usize,
    pub outcome: RunOutcome,
}

/// Stateless per-frame detection over a fixed template set
pub struct Pipeline {
    matcher: TemplateMatcher,
    detector: Detector,
}

impl Pipeline {
    pub fn new(templates: Vec<Template>, threshold: f64) -> Self {
        Self {
            matcher: TemplateMatcher::new(templates),
            detector: Detector::new(threshold),
        }
    }

    /// Load the configured templates; unreadable ones are left out
    pub fn from_config(config: &DetectConfig) -> Self {
        let templates = match &config.template_dir {
            Some(dir) => load_templates_from_directory(dir),
            None => load_templates(&config.template_paths),
        };
        if templates.is_empty() {
            log::warn!("⚠️ No templates loaded, no frame can be detected");
        }
        Self::new(templates, config.threshold)
    }

    /// Match one frame and apply the threshold; no state is kept between calls
    pub fn process_frame(&self, frame: &Frame) -> Option<Detection> {
        let gray = frame.to_gray();
        let matched = self.matcher.best_match(&gray);
        log::debug!("Frame {} best score {:.4}", frame.index, matched.score);
        self.detector.evaluate(frame.index, &matched)
    }

    /// Run until the source is exhausted or the visualizer asks to quit.
    ///
    /// Both the source and the visualizer are dropped, releasing the decoder
    /// and closing any window, before this returns.
    pub fn run<S, V>(&self, mut source: S, mut visualizer: V) -> RunReport
    where
        S: FrameSource,
        V: Visualizer,
    {
        let mut results = ResultSet::new();
        let mut index = 0;

        let outcome = loop {
            let Some(image) = source.next_frame() else {
                break RunOutcome::Exhausted;
            };
            let frame = Frame { index, image };
            index += 1;

            let annotation = self.process_frame(&frame).and_then(|detection| {
                log::info!(
                    "✅ Frame {}: detected (conf {:.2}) at [[{},{}],[{},{}]]",
                    detection.frame,
                    detection.score,
                    detection.bbox.top_left.x,
                    detection.bbox.top_left.y,
                    detection.bbox.bottom_right.x,
                    detection.bbox.bottom_right.y
                );
                match results.record(detection) {
                    Ok(()) => Some(Annotation::new(detection.bbox, detection.score)),
                    Err(e) => {
                        log::error!("❌ {}", e);
                        None
                    }
                }
            });

            match visualizer.present(&frame, annotation.as_ref()) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break RunOutcome::Quit,
                Err(e) => {
                    log::error!("❌ Display failed at frame {}: {}", frame.index, e);
                    break RunOutcome::DisplayFailed;
                }
            }
        };

        drop(source);
        drop(visualizer);

        log::info!(
            "🏁 Processed {} frames, {} detections ({:?})",
            index,
            results.len(),
            outcome
        );

        RunReport {
            results,
            frames_processed: index,
            outcome,
        }
    }
}

/// Build the review surface for `config.display`, falling back to headless
/// when a window cannot be opened
pub fn build_visualizer(config: &DetectConfig) -> DetectResult<Box<dyn Visualizer>> {
    match &config.display {
        DisplayMode::None => Ok(Box::new(NullVisualizer)),
        DisplayMode::Snapshots { directory } => {
            log::info!("📸 Saving annotated detections to {}", directory.display());
            let mut snapshots = SnapshotVisualizer::new(directory)?;
            if let Some(font) = load_label_font(config.label_font.as_deref()) {
                snapshots = snapshots.with_label_font(font);
            }
            Ok(Box::new(snapshots))
        }
        DisplayMode::Window => Ok(open_window(config)),
    }
}

#[cfg(feature = "opencv")]
fn open_window(config: &DetectConfig) -> Box<dyn Visualizer> {
    match crate::visualizer::HighguiVisualizer::new(&config.window_title, config.quit_key) {
        Ok(window) => Box::new(window),
        Err(e) => {
            log::warn!("⚠️ Review window unavailable, running headless: {}", e);
            Box::new(NullVisualizer)
        }
    }
}

#[cfg(not(feature = "opencv"))]
fn open_window(config: &DetectConfig) -> Box<dyn Visualizer> {
    log::warn!(
        "⚠️ Built without the `opencv` feature, '{}' window disabled; running headless",
        config.window_title
    );
    Box::new(NullVisualizer)
}

/// Write an empty result file, then hand back the setup error
fn fail_with_empty_results(config: &DetectConfig, error: DetectError) -> DetectError {
    log::error!("❌ {}; writing empty results", error);
    if let Err(e) = write_results(&ResultSet::new(), &config.output_path) {
        log::error!("❌ {}", e);
    }
    error
}

/// Full run from configuration: load templates, scan, then write the result file.
///
/// Once the configuration is valid a result file is always written, empty
/// when the input or the review surface cannot be opened.
pub fn run_detection(config: &DetectConfig) -> DetectResult<RunReport> {
    config.validate()?;

    let pipeline = Pipeline::from_config(config);
    let source = open_frame_source(&config.video_path)
        .map_err(|e| fail_with_empty_results(config, e))?;
    let visualizer = build_visualizer(config).map_err(|e| fail_with_empty_results(config, e))?;

    let report = pipeline.run(source, visualizer);
    write_results(&report.results, &config.output_path)?;
    Ok(report)
}
