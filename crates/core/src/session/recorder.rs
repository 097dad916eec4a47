use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use thiserror::Error;

use crate::detection::domain::face_detector::FaceDetector;
use crate::geolocation::domain::geolocator::Geolocator;
use crate::pipeline::alert_state::{AlertEvent, AlertState};
use crate::pipeline::capture_worker::CaptureWorker;
use crate::pipeline::frame_buffer::FrameBuffer;
use crate::pipeline::snapshot_throttle::SnapshotThrottle;
use crate::session::aggregator::SessionAggregator;
use crate::session::session::Session;
use crate::session::summary::{SessionSummary, SummaryError};
use crate::shared::clock::Clock;
use crate::shared::constants::{SUMMARY_FILE_EXTENSION, SUMMARY_FILE_PREFIX, TIMESTAMP_FORMAT};
use crate::snapshot::snapshot_writer::ImageSnapshotWriter;
use crate::video::domain::camera::Camera;

#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("a session is already running")]
    AlreadyRunning,
    #[error("no session is running")]
    NotRunning,
    #[error("capture worker panicked")]
    WorkerPanicked,
    #[error("session ended without being finalized")]
    NotFinalized,
    #[error("failed to create session directory {path}: {source}")]
    CreateDirs {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Persist(#[from] SummaryError),
}

struct ActiveCapture {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<Session>,
    alert_state: Arc<Mutex<AlertState>>,
}

/// Shared ends of a running capture, handed to the display context at
/// start.
pub struct CaptureHandles {
    pub frame_buffer: Arc<FrameBuffer>,
    pub alerts: Receiver<AlertEvent>,
    pub alert_state: Arc<Mutex<AlertState>>,
}

/// Session lifecycle control: owns the storage layout and at most one
/// running capture at a time.
///
/// `start` lays out the per-session directories and spawns the capture
/// worker; `stop` signals it, waits for it to quiesce, and persists the
/// summary. All timestamps come from the injected clock.
pub struct SessionRecorder {
    logs_dir: PathBuf,
    snapshots_dir: PathBuf,
    known_label: String,
    clock: Arc<dyn Clock>,
    active: Option<ActiveCapture>,
    last_summary: Option<SessionSummary>,
}

impl SessionRecorder {
    pub fn new(
        logs_dir: impl Into<PathBuf>,
        snapshots_dir: impl Into<PathBuf>,
        known_label: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            snapshots_dir: snapshots_dir.into(),
            known_label: known_label.into(),
            clock,
            active: None,
            last_summary: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    /// Starts a capture session. Fails if one is already running or the
    /// storage layout cannot be created.
    pub fn start(
        &mut self,
        camera: Box<dyn Camera>,
        detector: Box<dyn FaceDetector>,
        geolocator: Box<dyn Geolocator>,
    ) -> Result<CaptureHandles, RecorderError> {
        if self.active.is_some() {
            return Err(RecorderError::AlreadyRunning);
        }

        let start_time = self.clock.now();
        let ts = start_time.format(TIMESTAMP_FORMAT).to_string();

        let session_dir = self.snapshots_dir.join(&ts);
        let known_dir = session_dir.join("known");
        let unknown_dir = session_dir.join("unknown");
        for dir in [&self.logs_dir, &known_dir, &unknown_dir] {
            create_dirs(dir)?;
        }

        let summary_path = self
            .logs_dir
            .join(format!("{SUMMARY_FILE_PREFIX}{ts}.{SUMMARY_FILE_EXTENSION}"));
        log::info!("session started: {}", session_dir.display());

        let session = Session::new(
            start_time,
            summary_path,
            known_dir.clone(),
            unknown_dir.clone(),
        );
        let writer = ImageSnapshotWriter::new(known_dir, unknown_dir);
        let aggregator = SessionAggregator::new(session, self.known_label.clone(), Box::new(writer));

        let frame_buffer = Arc::new(FrameBuffer::new());
        let alert_state = Arc::new(Mutex::new(AlertState::new()));
        let (alert_tx, alert_rx) = crossbeam_channel::unbounded();
        let stop = Arc::new(AtomicBool::new(false));

        let worker = CaptureWorker::new(
            camera,
            detector,
            geolocator,
            aggregator,
            SnapshotThrottle::new(),
            alert_state.clone(),
            alert_tx,
            frame_buffer.clone(),
            self.clock.clone(),
        );
        let handle = worker.spawn(stop.clone());

        self.active = Some(ActiveCapture {
            stop,
            handle,
            alert_state: alert_state.clone(),
        });

        Ok(CaptureHandles {
            frame_buffer,
            alerts: alert_rx,
            alert_state,
        })
    }

    /// Stops the running capture, persists its summary, and returns it.
    pub fn stop(&mut self) -> Result<SessionSummary, RecorderError> {
        let active = self.active.take().ok_or(RecorderError::NotRunning)?;

        active.stop.store(true, Ordering::Relaxed);
        let mut session = active
            .handle
            .join()
            .map_err(|_| RecorderError::WorkerPanicked)?;
        session.finish(self.clock.now());

        active
            .alert_state
            .lock()
            .expect("alert state lock poisoned")
            .reset();

        let summary = SessionSummary::from_session(&session, &self.known_label)
            .ok_or(RecorderError::NotFinalized)?;
        summary.persist()?;
        log::info!(
            "session ended: {} faces, summary at {}",
            summary.total_faces,
            summary.path.display()
        );

        self.last_summary = Some(summary.clone());
        Ok(summary)
    }
}

fn create_dirs(path: &Path) -> Result<(), RecorderError> {
    std::fs::create_dir_all(path).map_err(|e| RecorderError::CreateDirs {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::HashMap;

    use crate::geolocation::domain::geolocator::NullGeolocator;
    use crate::shared::clock::ManualClock;
    use crate::shared::detection::Detection;
    use crate::shared::frame::Frame;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    /// Serves frames one second apart, advancing the shared clock, and
    /// raises its stop flag when exhausted.
    struct ScriptedCamera {
        clock: Arc<ManualClock>,
        exhausted: Arc<AtomicBool>,
        remaining: usize,
        index: usize,
    }

    impl Camera for ScriptedCamera {
        fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
            if self.remaining == 0 {
                self.exhausted.store(true, Ordering::Relaxed);
                std::thread::sleep(std::time::Duration::from_millis(1));
                return Err("out of frames".into());
            }
            if self.index > 0 {
                self.clock.advance(Duration::seconds(1));
            }
            self.remaining -= 1;
            let frame = Frame::new(vec![30u8; 48 * 48 * 3], 48, 48, 3, self.index);
            self.index += 1;
            Ok(frame)
        }
    }

    struct MapDetector {
        script: HashMap<usize, Vec<Detection>>,
    }

    impl FaceDetector for MapDetector {
        fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            Ok(self.script.get(&frame.index()).cloned().unwrap_or_default())
        }
    }

    struct TestRig {
        recorder: SessionRecorder,
        clock: Arc<ManualClock>,
        exhausted: Arc<AtomicBool>,
        _tmp: tempfile::TempDir,
    }

    fn rig() -> TestRig {
        let tmp = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(t0()));
        let recorder = SessionRecorder::new(
            tmp.path().join("session_logs"),
            tmp.path().join("session_snapshots"),
            "Mara",
            clock.clone(),
        );
        TestRig {
            recorder,
            clock,
            exhausted: Arc::new(AtomicBool::new(false)),
            _tmp: tmp,
        }
    }

    fn start_scripted(
        rig: &mut TestRig,
        frames: usize,
        script: HashMap<usize, Vec<Detection>>,
    ) -> CaptureHandles {
        rig.recorder
            .start(
                Box::new(ScriptedCamera {
                    clock: rig.clock.clone(),
                    exhausted: rig.exhausted.clone(),
                    remaining: frames,
                    index: 0,
                }),
                Box::new(MapDetector { script }),
                Box::new(NullGeolocator),
            )
            .unwrap()
    }

    fn wait_exhausted(rig: &TestRig) {
        while !rig.exhausted.load(Ordering::Relaxed) {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
    }

    fn det(label: &str) -> Detection {
        Detection::new(4, 4, 8, 8, label, 0.95)
    }

    #[test]
    fn test_full_session_counts_and_summary() {
        // 7 frames, 1s apart: Mara on the first five, Unknown on the last two
        let mut script = HashMap::new();
        for i in 0..5 {
            script.insert(i, vec![det("Mara")]);
        }
        for i in 5..7 {
            script.insert(i, vec![det("Unknown")]);
        }

        let mut rig = rig();
        let handles = start_scripted(&mut rig, 7, script);
        assert!(rig.recorder.is_running());

        wait_exhausted(&rig);
        let summary = rig.recorder.stop().unwrap();

        assert!(!rig.recorder.is_running());
        assert_eq!(summary.total_faces, 7);
        assert_eq!(summary.known_faces, 5);
        assert_eq!(summary.counts.get("Unknown"), Some(&2));
        approx::assert_relative_eq!(summary.accuracy, 100.0 * 5.0 / 7.0);

        // Summary persisted under session_logs with the start timestamp
        assert!(summary.path.exists());
        assert_eq!(
            summary.path.file_name().unwrap().to_str().unwrap(),
            "session_2025-06-01_12-00-00.txt"
        );
        let text = std::fs::read_to_string(&summary.path).unwrap();
        assert!(text.contains("Detected Faces:"));
        assert!(text.contains("  - Mara (5)"));

        // The known identity alerted exactly once within the cooldown
        let events: Vec<AlertEvent> = handles.alerts.try_iter().collect();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_snapshots_land_in_session_buckets() {
        // Epochs at t=0, 3, 6 with Mara on every frame
        let mut script = HashMap::new();
        for i in 0..7 {
            script.insert(i, vec![det("Mara")]);
        }

        let mut rig = rig();
        let _handles = start_scripted(&mut rig, 7, script);
        wait_exhausted(&rig);
        let summary = rig.recorder.stop().unwrap();

        let known: Vec<_> = std::fs::read_dir(&summary.known_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(known.len(), 3);
        assert_eq!(
            std::fs::read_dir(&summary.unknown_dir).unwrap().count(),
            0
        );
    }

    #[test]
    fn test_double_start_is_rejected() {
        let mut rig = rig();
        let _handles = start_scripted(&mut rig, 1, HashMap::new());

        let second = rig.recorder.start(
            Box::new(ScriptedCamera {
                clock: rig.clock.clone(),
                exhausted: rig.exhausted.clone(),
                remaining: 0,
                index: 0,
            }),
            Box::new(MapDetector {
                script: HashMap::new(),
            }),
            Box::new(NullGeolocator),
        );
        assert!(matches!(second, Err(RecorderError::AlreadyRunning)));

        rig.recorder.stop().unwrap();
    }

    #[test]
    fn test_stop_without_start_is_rejected() {
        let mut rig = rig();
        assert!(matches!(rig.recorder.stop(), Err(RecorderError::NotRunning)));
    }

    #[test]
    fn test_stop_resets_alert_state() {
        let mut script = HashMap::new();
        script.insert(0, vec![det("Mara")]);

        let mut rig = rig();
        let handles = start_scripted(&mut rig, 1, script);
        wait_exhausted(&rig);
        rig.recorder.stop().unwrap();

        let state = handles.alert_state.lock().unwrap();
        assert_eq!(
            state.phase(),
            crate::pipeline::alert_state::AlertPhase::Idle
        );
    }

    #[test]
    fn test_restart_after_stop_uses_new_layout() {
        let mut rig = rig();
        let _first = start_scripted(&mut rig, 1, HashMap::new());
        wait_exhausted(&rig);
        let first = rig.recorder.stop().unwrap();

        rig.clock.advance(Duration::minutes(5));
        rig.exhausted.store(false, Ordering::Relaxed);
        let _second = start_scripted(&mut rig, 1, HashMap::new());
        wait_exhausted(&rig);
        let second = rig.recorder.stop().unwrap();

        assert_ne!(first.path, second.path);
        assert_ne!(first.known_dir, second.known_dir);
        assert_eq!(rig.recorder.last_summary().unwrap().path, second.path);
    }

    #[test]
    fn test_zero_face_session_has_zero_accuracy() {
        let mut rig = rig();
        let _handles = start_scripted(&mut rig, 2, HashMap::new());
        wait_exhausted(&rig);
        let summary = rig.recorder.stop().unwrap();

        assert_eq!(summary.total_faces, 0);
        assert!((summary.accuracy - 0.0).abs() < f64::EPSILON);
        let text = std::fs::read_to_string(&summary.path).unwrap();
        assert!(text.contains("Facial Recognition Accuracy: 0.00%"));
    }
}
