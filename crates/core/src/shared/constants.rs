/// Minimum wall-clock gap between snapshot epochs.
pub const SNAPSHOT_INTERVAL_SECS: i64 = 3;

/// Minimum gap before the same label's alert may fire again.
pub const ALERT_COOLDOWN_SECS: i64 = 10;

/// Display consumer poll interval.
pub const RENDER_INTERVAL_MS: u64 = 30;

/// Timestamp format used in summary filenames and snapshot filenames.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub const SUMMARY_FILE_PREFIX: &str = "session_";
pub const SUMMARY_FILE_EXTENSION: &str = "txt";
pub const SNAPSHOT_EXTENSION: &str = "jpg";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
