use std::path::Path;
use std::sync::Arc;

use crate::models::error::CaptureError;

/// Receives file-output events from a movie output.
///
/// Callbacks arrive on the output's own context, never from inside
/// `start_recording` or `stop_recording`.
pub trait RecordingDelegate: Send + Sync {
    /// Writing to `path` has begun.
    fn did_start_recording(&self, _path: &Path) {}

    /// Recording ended and the file is flushed. `error` carries the
    /// platform's message if the recording failed.
    ///
    /// Called exactly once per accepted `start_recording`.
    fn did_finish_recording(&self, path: &Path, error: Option<String>);
}

/// A session output that writes audio+video to a movie file.
pub trait MovieFileOutput: Send + Sync {
    /// Begin writing to `path`. Returns once writing has started.
    fn start_recording(
        &self,
        path: &Path,
        delegate: Arc<dyn RecordingDelegate>,
    ) -> Result<(), CaptureError>;

    /// Ask the output to stop. Completion is reported to the delegate.
    fn stop_recording(&self);

    fn is_recording(&self) -> bool;
}
