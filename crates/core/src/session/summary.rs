use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::geolocation::domain::geolocator::Coordinates;
use crate::session::session::Session;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("failed to write session summary to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read session summary from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Immutable projection of a finalized session, created exactly once at
/// stop and persisted as plain text.
#[derive(Clone, Debug)]
pub struct SessionSummary {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub total_faces: u64,
    pub known_faces: u64,
    pub accuracy: f64,
    pub counts: BTreeMap<String, u64>,
    pub last_location: Option<(Coordinates, DateTime<Utc>)>,
    pub known_dir: PathBuf,
    pub unknown_dir: PathBuf,
    pub path: PathBuf,
}

impl SessionSummary {
    /// Projects a finished session. Returns `None` if the session has not
    /// been finalized yet.
    pub fn from_session(session: &Session, known_label: &str) -> Option<Self> {
        let ended_at = session.end_time()?;
        let total = session.total_faces();
        let known = session.count_for(known_label);
        let accuracy = if total > 0 {
            known as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        let last_location = match (session.last_location, session.last_location_time) {
            (Some(coords), Some(at)) => Some((coords, at)),
            _ => None,
        };

        Some(Self {
            started_at: session.start_time,
            ended_at,
            total_faces: total,
            known_faces: known,
            accuracy,
            counts: session.counts().clone(),
            last_location,
            known_dir: session.known_dir.clone(),
            unknown_dir: session.unknown_dir.clone(),
            path: session.summary_path.clone(),
        })
    }

    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }

    /// Renders the fixed-order summary text.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("Date: {}", self.started_at.format("%B %d, %Y")),
            format!("Session Duration: {}", format_duration(self.duration())),
        ];

        match &self.last_location {
            Some((coords, at)) => lines.push(format!(
                "Last Known Location: {} at {}",
                coords,
                at.format("%H:%M:%S")
            )),
            None => lines.push("Last Known Location: Unknown".to_string()),
        }

        lines.push(format!(
            "Facial Recognition Accuracy: {:.2}%",
            self.accuracy
        ));
        lines.push("Detected Faces:".to_string());
        for (label, count) in &self.counts {
            lines.push(format!("  - {label} ({count})"));
        }

        lines.push("\nSnapshots saved in:".to_string());
        lines.push(format!("  - Known: {}", self.known_dir.display()));
        lines.push(format!("  - Unknown: {}", self.unknown_dir.display()));

        lines.join("\n")
    }

    /// Writes the rendered summary to its session path. Unlike snapshot
    /// writes, a failure here is surfaced: it is the loss of the session's
    /// permanent record.
    pub fn persist(&self) -> Result<(), SummaryError> {
        fs::write(&self.path, self.render()).map_err(|e| SummaryError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
