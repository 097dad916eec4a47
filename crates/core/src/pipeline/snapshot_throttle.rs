use chrono::{DateTime, Duration, Utc};

use crate::shared::constants::SNAPSHOT_INTERVAL_SECS;

/// Rate limit on evidence capture.
///
/// The decision is made once per processed frame, not once per detected
/// face: a qualifying frame makes every face in it snapshot-eligible, then
/// the window closes until the interval elapses again. Single-writer: only
/// the capture worker calls `should_snapshot`.
pub struct SnapshotThrottle {
    interval: Duration,
    last_snapshot: Option<DateTime<Utc>>,
}

impl SnapshotThrottle {
    pub fn new() -> Self {
        Self::with_interval(Duration::seconds(SNAPSHOT_INTERVAL_SECS))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last_snapshot: None,
        }
    }

    /// Returns true iff a snapshot epoch opens at `now`; on true, `now`
    /// becomes the new epoch start.
    pub fn should_snapshot(&mut self, now: DateTime<Utc>) -> bool {
        let due = match self.last_snapshot {
            None => true,
            Some(last) => now - last >= self.interval,
        };
        if due {
            self.last_snapshot = Some(now);
        }
        due
    }

    /// Clears the epoch state at session start.
    pub fn reset(&mut self) {
        self.last_snapshot = None;
    }
}

impl Default for SnapshotThrottle {
    fn default() -> Self {
        Self::new()
    }
}
