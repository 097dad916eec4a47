use chrono::{DateTime, Utc};

use crate::geolocation::domain::geolocator::Coordinates;
use crate::session::session::Session;
use crate::shared::detection::Detection;
use crate::shared::frame::Frame;
use crate::snapshot::snapshot_writer::SnapshotWriter;

/// Owns the running statistics of one session and applies per-detection
/// side effects.
///
/// Counter increments happen for every detection. Evidence capture and
/// location updates happen only on a qualifying frame (the caller decides
/// qualification once per frame via the throttle); snapshot write failures
/// are logged and swallowed because evidence is best-effort, not a
/// correctness requirement of the pipeline.
pub struct SessionAggregator {
    session: Session,
    known_label: String,
    writer: Box<dyn SnapshotWriter>,
}

impl SessionAggregator {
    pub fn new(session: Session, known_label: impl Into<String>, writer: Box<dyn SnapshotWriter>) -> Self {
        Self {
            session,
            known_label: known_label.into(),
            writer,
        }
    }

    /// Whether `label` is the privileged identity.
    pub fn is_known(&self, label: &str) -> bool {
        label == self.known_label
    }

    pub fn known_label(&self) -> &str {
        &self.known_label
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Records one detection. `snapshot_due` applies to every detection in
    /// the same frame: a single qualifying frame may produce several
    /// evidence files.
    pub fn record(
        &mut self,
        detection: &Detection,
        frame: &Frame,
        now: DateTime<Utc>,
        snapshot_due: bool,
        coords: Option<Coordinates>,
    ) {
        let known = self.is_known(&detection.label);
        self.session.record_label(&detection.label);

        if snapshot_due {
            match self
                .writer
                .write(frame, &detection.label, known, now, coords)
            {
                Ok(path) => log::debug!("snapshot saved: {}", path.display()),
                Err(e) => log::warn!("snapshot write failed: {e}"),
            }
            if let Some(c) = coords {
                self.session.last_location = Some(c);
                self.session.last_location_time = Some(now);
            }
        }
    }

    /// Releases the session at stop, after the worker has quiesced.
    pub fn into_session(self) -> Session {
        self.session
    }
}
