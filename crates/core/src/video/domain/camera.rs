use crate::shared::frame::Frame;

/// Live frame source owned exclusively by the capture worker.
///
/// `read` may block on device I/O; there is no read timeout, so a stalled
/// device blocks the producer until the device recovers. Read failures are
/// transient: the capture loop logs and retries on the next iteration.
pub trait Camera: Send {
    fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;
}
