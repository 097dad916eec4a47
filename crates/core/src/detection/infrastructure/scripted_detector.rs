use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::detection::Detection;
use crate::shared::frame::Frame;

/// Detector that replays a prerecorded script of detections keyed by frame
/// index. Frames without an entry report no faces.
///
/// Used for offline runs and deterministic pipeline tests: paired with an
/// image-sequence camera it reproduces a recorded flight exactly.
pub struct ScriptedDetector {
    script: HashMap<usize, Vec<Detection>>,
}

#[derive(Deserialize)]
struct ScriptEntry {
    frame: usize,
    detections: Vec<Detection>,
}

impl ScriptedDetector {
    pub fn new(script: HashMap<usize, Vec<Detection>>) -> Self {
        Self { script }
    }

    /// Loads a script from a JSON file: an array of
    /// `{"frame": n, "detections": [...]}` entries.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(path)?;
        let entries: Vec<ScriptEntry> = serde_json::from_str(&text)?;
        let mut script = HashMap::new();
        for entry in entries {
            script.insert(entry.frame, entry.detections);
        }
        Ok(Self::new(script))
    }
}

impl FaceDetector for ScriptedDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        Ok(self.script.get(&frame.index()).cloned().unwrap_or_default())
    }
}
