use serde_json::json;

use slowmo_capture_core::{CaptureDelegate, CaptureError, RecorderState, RecordingResult};

/// CaptureDelegate that reports recorder events on stderr.
pub struct ConsoleDelegate {
    json: bool,
}

impl ConsoleDelegate {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn emit(&self, event: &str, payload: serde_json::Value, text: String) {
        if self.json {
            eprintln!("{}", json!({ "event": event, "payload": payload }));
        } else {
            eprintln!("{}", text);
        }
    }
}

impl CaptureDelegate for ConsoleDelegate {
    fn on_state_changed(&self, state: &RecorderState) {
        let payload = serde_json::to_value(state).unwrap_or_default();
        self.emit("state-changed", payload, format!("state: {}", state.name()));
    }

    fn on_error(&self, error: &CaptureError) {
        self.emit(
            "capture-error",
            json!({ "code": error.code(), "message": error.to_string() }),
            format!("error [{}]: {}", error.code(), error),
        );
    }

    fn on_recording_finished(&self, result: &RecordingResult) {
        let payload = serde_json::to_value(result).unwrap_or_default();
        self.emit(
            "capture-finished",
            payload,
            format!(
                "finished: {} ({:.2}s, {}x{} @ {} fps)",
                result.file_path.display(),
                result.duration_secs,
                result.metadata.width,
                result.metadata.height,
                result.metadata.fps
            ),
        );
    }
}
