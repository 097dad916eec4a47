use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::shared::constants::SUMMARY_FILE_PREFIX;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("not a session summary path: {0}")]
    BadSummaryPath(PathBuf),
    #[error("session snapshots not found at {0}")]
    MissingSnapshots(PathBuf),
    #[error("io error during export: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Bundles one session's record into a single zip for hand-off: the
/// summary as `session_summary.txt` plus the known/ and unknown/ snapshot
/// trees.
pub fn export_session(
    summary_path: &Path,
    snapshots_root: &Path,
    dest: &Path,
) -> Result<(), ExportError> {
    let session_id = session_id(summary_path)
        .ok_or_else(|| ExportError::BadSummaryPath(summary_path.to_path_buf()))?;
    let session_dir = snapshots_root.join(session_id);
    if !session_dir.is_dir() {
        return Err(ExportError::MissingSnapshots(session_dir));
    }

    let mut zip = ZipWriter::new(File::create(dest)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("session_summary.txt", options)?;
    zip.write_all(&fs::read(summary_path)?)?;

    for bucket in ["known", "unknown"] {
        add_bucket(&mut zip, &session_dir.join(bucket), bucket, options)?;
    }

    zip.finish()?;
    log::info!("session exported to {}", dest.display());
    Ok(())
}

/// Extracts the session timestamp from a `session_<ts>.txt` path.
fn session_id(summary_path: &Path) -> Option<&str> {
    summary_path
        .file_stem()?
        .to_str()?
        .strip_prefix(SUMMARY_FILE_PREFIX)
}

fn add_bucket(
    zip: &mut ZipWriter<File>,
    dir: &Path,
    prefix: &str,
    options: SimpleFileOptions,
) -> Result<(), ExportError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        // A session with no snapshots of one kind has no bucket to pack.
        Err(_) => return Ok(()),
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    for path in paths {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ExportError::BadSummaryPath(path.clone()))?;
        zip.start_file(format!("{prefix}/{name}"), options)?;
        zip.write_all(&fs::read(&path)?)?;
    }
    Ok(())
}
