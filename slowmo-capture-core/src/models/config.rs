use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Physical position of the camera to record from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraPosition {
    #[default]
    Back,
    Front,
}

/// Configuration for the recorder and its capture session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Directory where recordings are written (default: process temp dir).
    pub output_directory: PathBuf,

    /// File name prefix, followed by the unix timestamp.
    pub file_prefix: String,

    /// File extension without the dot.
    pub file_extension: String,

    /// Camera used for both preview and recording (default: back).
    pub camera_position: CameraPosition,

    /// Attach the microphone when available (default: true).
    pub enable_audio: bool,
}

impl RecorderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.file_prefix.is_empty() {
            return Err("file prefix must not be empty".into());
        }
        if self.file_extension.is_empty() || self.file_extension.contains('.') {
            return Err(format!("invalid file extension: {:?}", self.file_extension));
        }
        Ok(())
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            output_directory: std::env::temp_dir(),
            file_prefix: "slowmo_".into(),
            file_extension: "mov".into(),
            camera_position: CameraPosition::Back,
            enable_audio: true,
        }
    }
}
