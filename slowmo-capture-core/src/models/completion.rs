use std::fmt;

use crossbeam_channel::Receiver;

use super::error::CaptureError;
use super::recording_result::RecordingResult;

/// Outcome of a recording, delivered once the file is finalized.
pub type RecordingOutcome = Result<RecordingResult, CaptureError>;

/// Callback invoked exactly once with the outcome of a stop request.
pub type CompletionCallback = Box<dyn FnOnce(RecordingOutcome) + Send + 'static>;

/// The single outstanding result slot of a stop request.
///
/// Resolving consumes the handle, so a result can never be delivered twice.
pub struct PendingResult {
    callback: CompletionCallback,
}

impl PendingResult {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(RecordingOutcome) + Send + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// A handle whose outcome is delivered to the returned receiver.
    pub fn channel() -> (Self, Receiver<RecordingOutcome>) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let pending = Self::new(move |outcome| {
            // Receiver may have been dropped by a caller that lost interest.
            let _ = tx.send(outcome);
        });
        (pending, rx)
    }

    pub fn resolve(self, outcome: RecordingOutcome) {
        (self.callback)(outcome);
    }
}

impl fmt::Debug for PendingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingResult").finish_non_exhaustive()
    }
}
