use crate::models::error::CaptureError;
use crate::models::recording_result::RecordingResult;
use crate::models::state::RecorderState;

/// Observer for recorder notifications.
///
/// Methods are called from whichever thread drove the transition: the
/// caller's thread for start/stop, the output's thread for completion.
/// Implementations should marshal to the UI thread if needed.
pub trait CaptureDelegate: Send + Sync {
    /// Called when the recorder state changes.
    fn on_state_changed(&self, state: &RecorderState);

    /// Called when a recording fails after it was underway.
    fn on_error(&self, error: &CaptureError);

    /// Called when a recording completes and the file is finalized.
    fn on_recording_finished(&self, result: &RecordingResult);
}
