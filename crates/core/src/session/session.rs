use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::geolocation::domain::geolocator::Coordinates;

/// Mutable state of one capture run, from start to stop.
///
/// Single-writer: only the capture worker mutates a live session; the
/// control context reads it only after the worker has quiesced. The label
/// counts are a sorted map with an explicitly maintained total, checked
/// against each other on every mutation.
#[derive(Debug)]
pub struct Session {
    pub start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    total_faces: u64,
    counts: BTreeMap<String, u64>,
    pub last_location: Option<Coordinates>,
    pub last_location_time: Option<DateTime<Utc>>,
    pub summary_path: PathBuf,
    pub known_dir: PathBuf,
    pub unknown_dir: PathBuf,
}

impl Session {
    pub fn new(
        start_time: DateTime<Utc>,
        summary_path: PathBuf,
        known_dir: PathBuf,
        unknown_dir: PathBuf,
    ) -> Self {
        Self {
            start_time,
            end_time: None,
            total_faces: 0,
            counts: BTreeMap::new(),
            last_location: None,
            last_location_time: None,
            summary_path,
            known_dir,
            unknown_dir,
        }
    }

    /// Counts one detection of `label`.
    pub fn record_label(&mut self, label: &str) {
        self.total_faces += 1;
        *self.counts.entry(label.to_string()).or_insert(0) += 1;
        debug_assert_eq!(
            self.total_faces,
            self.counts.values().sum::<u64>(),
            "total_faces must equal the sum of per-label counts"
        );
    }

    pub fn total_faces(&self) -> u64 {
        self.total_faces
    }

    pub fn count_for(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Sets the end time. Transitions from unset to set exactly once;
    /// later calls are ignored.
    pub fn finish(&mut self, at: DateTime<Utc>) {
        if self.end_time.is_none() {
            self.end_time = Some(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session() -> Session {
        Session::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            PathBuf::from("/tmp/session.txt"),
            PathBuf::from("/tmp/known"),
            PathBuf::from("/tmp/unknown"),
        )
    }

    #[test]
    fn test_new_session_is_empty() {
        let s = session();
        assert_eq!(s.total_faces(), 0);
        assert!(s.counts().is_empty());
        assert!(s.end_time().is_none());
        assert!(s.last_location.is_none());
    }

    #[test]
    fn test_total_equals_sum_of_counts() {
        let mut s = session();
        for label in ["Mara", "Unknown", "Mara", "Iris", "Mara"] {
            s.record_label(label);
        }
        assert_eq!(s.total_faces(), 5);
        assert_eq!(s.counts().values().sum::<u64>(), 5);
        assert_eq!(s.count_for("Mara"), 3);
        assert_eq!(s.count_for("Unknown"), 1);
        assert_eq!(s.count_for("Iris"), 1);
    }

    #[test]
    fn test_count_for_unseen_label_is_zero() {
        let s = session();
        assert_eq!(s.count_for("Nobody"), 0);
    }

    #[test]
    fn test_counts_iterate_in_sorted_order() {
        let mut s = session();
        s.record_label("Zoe");
        s.record_label("Ana");
        s.record_label("Mara");
        let labels: Vec<_> = s.counts().keys().cloned().collect();
        assert_eq!(labels, vec!["Ana", "Mara", "Zoe"]);
    }

    #[test]
    fn test_finish_sets_end_time_once() {
        let mut s = session();
        let first = s.start_time + chrono::Duration::seconds(10);
        let second = s.start_time + chrono::Duration::seconds(20);
        s.finish(first);
        s.finish(second);
        assert_eq!(s.end_time(), Some(first));
    }
}
