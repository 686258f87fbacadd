use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::models::config::RecorderConfig;
use crate::models::error::CaptureError;

/// Absolute path for a new recording started at `now`.
///
/// Names follow `<prefix><unix-seconds>.<ext>`. If that file already exists
/// (two recordings in the same second) `_1`, `_2`, … is appended to the stem.
pub fn recording_path(
    config: &RecorderConfig,
    now: DateTime<Utc>,
) -> Result<PathBuf, CaptureError> {
    fs::create_dir_all(&config.output_directory)
        .map_err(|e| CaptureError::StorageError(format!("failed to create directory: {}", e)))?;
    let dir = fs::canonicalize(&config.output_directory)
        .map_err(|e| CaptureError::StorageError(format!("failed to resolve directory: {}", e)))?;

    let stem = format!("{}{}", config.file_prefix, now.timestamp());
    let ext = &config.file_extension;

    let mut candidate = dir.join(format!("{}.{}", stem, ext));
    let mut suffix = 1u32;
    while candidate.exists() {
        candidate = dir.join(format!("{}_{}.{}", stem, suffix, ext));
        suffix += 1;
    }
    Ok(candidate)
}
