use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::format::CaptureDeviceFormat;

/// Result delivered when a recording finishes and the file is safe to read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingResult {
    pub file_path: PathBuf,
    pub duration_secs: f64,
    /// SHA-256 of the finished file; `None` if it could not be read back.
    pub checksum: Option<String>,
    pub metadata: RecordingMetadata,
}

/// Descriptive metadata about a finished recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub created_at: String,
    pub fps: u32,
    pub width: i32,
    pub height: i32,
    pub has_audio: bool,
}

impl RecordingMetadata {
    /// Metadata for a recording made with `format` pinned at `fps`.
    pub fn new(format: &CaptureDeviceFormat, fps: u32, has_audio: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            fps,
            width: format.width,
            height: format.height,
            has_audio,
        }
    }
}
