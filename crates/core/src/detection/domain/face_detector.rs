use crate::shared::detection::Detection;
use crate::shared::frame::Frame;

/// Domain interface for face classification.
///
/// The classification algorithm itself is an external capability; the
/// pipeline only depends on this seam. Implementations may be stateful
/// (tracking, caching), hence `&mut self`. A failure here is per-frame:
/// the capture loop catches it, skips the frame, and continues.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;
}
