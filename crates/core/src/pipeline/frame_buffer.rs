use std::sync::Mutex;

use crate::shared::frame::Frame;

/// Single-slot hand-off of the most recent processed frame.
///
/// The producer overwrites, the consumer clones; neither blocks beyond one
/// short critical section. No history is retained, so a consumer polling
/// slower than the capture cadence silently drops intermediate frames.
pub struct FrameBuffer {
    latest: Mutex<Option<Frame>>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            latest: Mutex::new(None),
        }
    }

    /// Replaces the held frame. Publishing never queues.
    pub fn publish(&self, frame: Frame) {
        *self.latest.lock().expect("frame buffer lock poisoned") = Some(frame);
    }

    /// Returns a copy of the most recently published frame, or `None` if
    /// nothing has been published yet.
    pub fn consume(&self) -> Option<Frame> {
        self.latest
            .lock()
            .expect("frame buffer lock poisoned")
            .clone()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
