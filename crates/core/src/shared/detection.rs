use serde::{Deserialize, Serialize};

/// One classified face in one processed frame.
///
/// Ephemeral: detections live only for the duration of the processing pass
/// that produced them. Anything that must outlive the pass (counters,
/// evidence snapshots) is a side effect of recording, not of the detection
/// itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub label: String,
    pub confidence: f64,
}

impl Detection {
    pub fn new(x: i32, y: i32, width: i32, height: i32, label: impl Into<String>, confidence: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            label: label.into(),
            confidence,
        }
    }
}
