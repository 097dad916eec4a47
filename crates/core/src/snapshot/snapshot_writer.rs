use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::geolocation::domain::geolocator::Coordinates;
use crate::shared::constants::{SNAPSHOT_EXTENSION, TIMESTAMP_FORMAT};
use crate::shared::frame::Frame;
use crate::snapshot::annotator;

/// Persists annotated evidence images.
///
/// Evidence capture is best-effort: the aggregator logs and swallows write
/// failures, so implementations only need to report them, not recover.
pub trait SnapshotWriter: Send {
    fn write(
        &mut self,
        frame: &Frame,
        label: &str,
        known: bool,
        timestamp: DateTime<Utc>,
        coords: Option<Coordinates>,
    ) -> Result<PathBuf, Box<dyn std::error::Error>>;
}

/// Writes snapshots as JPEGs into the session's known/unknown buckets:
/// `<bucket>/<label>_<timestamp>.jpg`, each burned-in with label,
/// timestamp, and coordinates.
pub struct ImageSnapshotWriter {
    known_dir: PathBuf,
    unknown_dir: PathBuf,
}

impl ImageSnapshotWriter {
    pub fn new(known_dir: impl Into<PathBuf>, unknown_dir: impl Into<PathBuf>) -> Self {
        Self {
            known_dir: known_dir.into(),
            unknown_dir: unknown_dir.into(),
        }
    }

    fn bucket(&self, known: bool) -> &Path {
        if known {
            &self.known_dir
        } else {
            &self.unknown_dir
        }
    }
}

impl SnapshotWriter for ImageSnapshotWriter {
    fn write(
        &mut self,
        frame: &Frame,
        label: &str,
        known: bool,
        timestamp: DateTime<Utc>,
        coords: Option<Coordinates>,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!("expected RGB frame, got {} channels", frame.channels()).into());
        }

        let ts = timestamp.format(TIMESTAMP_FORMAT).to_string();
        let location = match coords {
            Some(c) => c.to_string(),
            None => "Unknown".to_string(),
        };

        let mut snapshot = frame.clone();
        annotator::annotate_evidence(
            &mut snapshot,
            label,
            &ts,
            &location,
            annotator::color_for(known),
        );

        let path = self
            .bucket(known)
            .join(format!("{label}_{ts}.{SNAPSHOT_EXTENSION}"));
        image::save_buffer(
            &path,
            snapshot.data(),
            snapshot.width(),
            snapshot.height(),
            image::ExtendedColorType::Rgb8,
        )?;
        Ok(path)
    }
}
