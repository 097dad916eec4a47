use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::Sender;

use crate::detection::domain::face_detector::FaceDetector;
use crate::geolocation::domain::geolocator::Geolocator;
use crate::pipeline::alert_state::{AlertEvent, AlertState};
use crate::pipeline::frame_buffer::FrameBuffer;
use crate::pipeline::snapshot_throttle::SnapshotThrottle;
use crate::session::aggregator::SessionAggregator;
use crate::session::session::Session;
use crate::shared::clock::Clock;
use crate::snapshot::annotator;
use crate::video::domain::camera::Camera;

/// Producer side of the capture pipeline.
///
/// Owns the camera, the detector, and the session statistics for the whole
/// run; nothing else touches them while the worker is live. Each iteration
/// reads one frame, mirrors it, classifies it, applies per-detection side
/// effects, and publishes the annotated result for display. Read and
/// detect failures skip the frame and keep the loop alive.
pub struct CaptureWorker {
    camera: Box<dyn Camera>,
    detector: Box<dyn FaceDetector>,
    geolocator: Box<dyn Geolocator>,
    aggregator: SessionAggregator,
    throttle: SnapshotThrottle,
    alert_state: Arc<Mutex<AlertState>>,
    alert_tx: Sender<AlertEvent>,
    frame_buffer: Arc<FrameBuffer>,
    clock: Arc<dyn Clock>,
}

impl CaptureWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        camera: Box<dyn Camera>,
        detector: Box<dyn FaceDetector>,
        geolocator: Box<dyn Geolocator>,
        aggregator: SessionAggregator,
        throttle: SnapshotThrottle,
        alert_state: Arc<Mutex<AlertState>>,
        alert_tx: Sender<AlertEvent>,
        frame_buffer: Arc<FrameBuffer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            camera,
            detector,
            geolocator,
            aggregator,
            throttle,
            alert_state,
            alert_tx,
            frame_buffer,
            clock,
        }
    }

    /// Runs the capture loop on a dedicated thread until `stop` is raised.
    pub fn spawn(self, stop: Arc<AtomicBool>) -> JoinHandle<Session> {
        std::thread::Builder::new()
            .name("capture-worker".to_string())
            .spawn(move || self.run(&stop))
            .expect("failed to spawn capture worker thread")
    }

    /// The capture loop body. Returns the accumulated session once `stop`
    /// is observed.
    pub fn run(mut self, stop: &AtomicBool) -> Session {
        log::info!("capture worker started");

        while !stop.load(Ordering::Relaxed) {
            let mut frame = match self.camera.read() {
                Ok(frame) => frame,
                Err(e) => {
                    log::debug!("frame read failed, retrying: {e}");
                    continue;
                }
            };
            frame.mirror_horizontal();

            let detections = match self.detector.detect(&frame) {
                Ok(detections) => detections,
                Err(e) => {
                    log::warn!("detection failed, skipping frame: {e}");
                    continue;
                }
            };

            let now = self.clock.now();
            // One gate decision per frame; every face below shares it.
            let snapshot_due = self.throttle.should_snapshot(now);
            let coords = if snapshot_due {
                self.geolocator.locate()
            } else {
                None
            };

            for detection in &detections {
                let known = self.aggregator.is_known(&detection.label);
                annotator::draw_detection(&mut frame, detection, known);
                self.aggregator
                    .record(detection, &frame, now, snapshot_due, coords);

                if known {
                    let event = self
                        .alert_state
                        .lock()
                        .expect("alert state lock poisoned")
                        .notify(&detection.label, now);
                    if let Some(event) = event {
                        log::info!("target acquired: {} at {}", event.label, event.at);
                        // Display side may already be gone during shutdown.
                        let _ = self.alert_tx.send(event);
                    }
                }
            }

            self.frame_buffer.publish(frame);
        }

        log::info!("capture worker stopping");
        self.aggregator.into_session()
    }
}
