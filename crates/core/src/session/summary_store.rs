use std::fs;
use std::path::{Path, PathBuf};

use crate::session::summary::SummaryError;
use crate::shared::constants::{SUMMARY_FILE_EXTENSION, SUMMARY_FILE_PREFIX};

/// Read side of the summary archive: lists and loads the plain-text
/// records that past sessions left in the logs directory.
pub struct SummaryStore {
    logs_dir: PathBuf,
}

impl SummaryStore {
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
        }
    }

    /// All summary files, newest first. Timestamped names sort
    /// lexicographically, so ordering by filename is ordering by time.
    /// A missing logs directory reads as an empty archive.
    pub fn list(&self) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.logs_dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_summary_file(p))
            .collect();
        paths.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        paths
    }

    pub fn latest(&self) -> Option<PathBuf> {
        self.list().into_iter().next()
    }

    pub fn read(&self, path: &Path) -> Result<String, SummaryError> {
        fs::read_to_string(path).map_err(|e| SummaryError::Read {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn is_summary_file(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    name.starts_with(SUMMARY_FILE_PREFIX)
        && path
            .extension()
            .map(|ext| ext == SUMMARY_FILE_EXTENSION)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "stub").unwrap();
        path
    }

    #[test]
    fn test_missing_directory_lists_empty() {
        let store = SummaryStore::new("/nonexistent-logs-dir");
        assert!(store.list().is_empty());
        assert!(store.latest().is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "session_2025-06-01_09-00-00.txt");
        touch(tmp.path(), "session_2025-06-01_12-00-00.txt");
        touch(tmp.path(), "session_2025-05-30_18-30-00.txt");

        let store = SummaryStore::new(tmp.path());
        let names: Vec<String> = store
            .list()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "session_2025-06-01_12-00-00.txt",
                "session_2025-06-01_09-00-00.txt",
                "session_2025-05-30_18-30-00.txt",
            ]
        );
    }

    #[test]
    fn test_non_summary_files_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "session_2025-06-01_12-00-00.txt");
        touch(tmp.path(), "notes.txt");
        touch(tmp.path(), "session_2025-06-01_12-00-00.bak");

        let store = SummaryStore::new(tmp.path());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_latest_and_read() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "session_2025-06-01_09-00-00.txt");
        let newest = tmp.path().join("session_2025-06-01_12-00-00.txt");
        fs::write(&newest, "Date: June 01, 2025").unwrap();

        let store = SummaryStore::new(tmp.path());
        let latest = store.latest().unwrap();
        assert_eq!(latest, newest);
        assert_eq!(store.read(&latest).unwrap(), "Date: June 01, 2025");
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SummaryStore::new(tmp.path());
        let missing = tmp.path().join("session_2099-01-01_00-00-00.txt");
        assert!(matches!(
            store.read(&missing),
            Err(SummaryError::Read { .. })
        ));
    }
}
