use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;

use crate::pipeline::alert_state::AlertEvent;
use crate::pipeline::frame_buffer::FrameBuffer;
use crate::shared::frame::Frame;

/// Display output of the pipeline. Implementations run on the consumer
/// thread only.
pub trait FrameSink {
    fn display(&mut self, frame: &Frame);
    fn target_acquired(&mut self, event: &AlertEvent);
}

/// Consumer side of the capture pipeline: polls the frame buffer on a
/// fixed cadence and forwards frames and alert notifications to a sink.
///
/// The renderer never blocks on the producer. An empty buffer tick is
/// skipped silently; the producer may be slower than the poll cadence or
/// not started yet.
pub struct Renderer<S: FrameSink> {
    buffer: Arc<FrameBuffer>,
    alerts: Receiver<AlertEvent>,
    sink: S,
}

impl<S: FrameSink> Renderer<S> {
    pub fn new(buffer: Arc<FrameBuffer>, alerts: Receiver<AlertEvent>, sink: S) -> Self {
        Self {
            buffer,
            alerts,
            sink,
        }
    }

    /// One display iteration: drain pending alerts, then show the latest
    /// frame if one is available.
    pub fn tick(&mut self) {
        for event in self.alerts.try_iter() {
            self.sink.target_acquired(&event);
        }
        if let Some(frame) = self.buffer.consume() {
            self.sink.display(&frame);
        }
    }

    /// Polls at `interval` until `stop` is raised, then returns the sink.
    pub fn run(mut self, stop: &AtomicBool, interval: Duration) -> S {
        while !stop.load(Ordering::Relaxed) {
            self.tick();
            std::thread::sleep(interval);
        }
        // Final tick so a frame published just before stop is not lost.
        self.tick();
        self.sink
    }
}
