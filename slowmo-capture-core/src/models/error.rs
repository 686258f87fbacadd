use thiserror::Error;

use super::target::ResolutionTier;

/// Errors that can occur while configuring the camera or recording.
///
/// Every variant maps to a stable wire code via [`CaptureError::code`], which
/// is what the method-call surface reports alongside the message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("no camera available")]
    NoCameraAvailable,

    #[error("could not add input: {0}")]
    InputAttach(String),

    #[error("no suitable camera format for {fps} FPS at {resolution}")]
    FormatNotFound { fps: u32, resolution: ResolutionTier },

    #[error("could not configure camera: {0}")]
    DeviceLock(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("recording failed: {0}")]
    RecordingFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("no active recording to stop")]
    NotRecording,

    #[error("a recording is already in progress")]
    AlreadyRecording,
}

impl CaptureError {
    /// Stable error code reported across the method-call boundary.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArguments(_) => "INVALID_ARGS",
            Self::NoCameraAvailable => "NO_CAMERA",
            Self::InputAttach(_) => "INPUT_ERROR",
            Self::FormatNotFound { .. } => "FORMAT_NOT_FOUND",
            Self::DeviceLock(_) | Self::ConfigurationFailed(_) => "CONFIG_ERROR",
            Self::RecordingFailed(_) | Self::StorageError(_) => "REC_ERROR",
            Self::NotRecording => "NOT_RECORDING",
            Self::AlreadyRecording => "ALREADY_RECORDING",
        }
    }

    /// Capability errors can be retried with different parameters or a
    /// different device state.
    pub fn is_capability_error(&self) -> bool {
        matches!(
            self,
            Self::NoCameraAvailable
                | Self::InputAttach(_)
                | Self::FormatNotFound { .. }
                | Self::DeviceLock(_)
                | Self::ConfigurationFailed(_)
        )
    }
}
