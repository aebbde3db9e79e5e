//! JSON result file

use super::results::ResultSet;
use crate::error::{DetectError, DetectResult};
use crate::template_matching::BoundingBox;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;

/// One entry of the `coordinates` list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateRecord {
    pub frame: usize,
    pub bbox: BoundingBox,
}

/// On-disk shape of a run's results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultFile {
    pub detected_frames: Vec<usize>,
    pub coordinates: Vec<CoordinateRecord>,
}

impl From<&ResultSet> for ResultFile {
    fn from(results: &ResultSet) -> Self {
        Self {
            detected_frames: results.detected_frames(),
            coordinates: results
                .detections()
                .iter()
                .map(|d| CoordinateRecord {
                    frame: d.frame,
                    bbox: d.bbox,
                })
                .collect(),
        }
    }
}

/// Render results as JSON with 4-space indentation
pub fn to_json(results: &ResultSet) -> DetectResult<String> {
    let file = ResultFile::from(results);
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    file.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write results to `path` in one go, replacing any previous file
pub fn write_results(results: &ResultSet, path: &Path) -> DetectResult<()> {
    let json = to_json(results)?;
    std::fs::write(path, json).map_err(|source| DetectError::ResultWrite {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!(
        "💾 Wrote {} detections to {}",
        results.len(),
        path.display()
    );
    Ok(())
}

/// Parse a result file written by [`write_results`]
pub fn read_results(path: &Path) -> DetectResult<ResultFile> {
    let text = std::fs::read_to_string(path).map_err(|e| DetectError::ResultRead {
        path: path.to_path_buf(),
        description: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| DetectError::ResultRead {
        path: path.to_path_buf(),
        description: e.to_string(),
    })
}
