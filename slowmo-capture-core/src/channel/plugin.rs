use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::method_call::{MethodCall, MethodResult};
use crate::models::completion::PendingResult;
use crate::models::config::RecorderConfig;
use crate::models::error::CaptureError;
use crate::models::target::{CaptureTarget, ResolutionTier};
use crate::recording::controller::RecordingController;
use crate::session::manager::CaptureSessionManager;
use crate::traits::capture_backend::CaptureBackend;

#[derive(Debug, Deserialize)]
struct StartRecordingArgs {
    fps: u32,
    resolution: String,
}

impl StartRecordingArgs {
    fn parse(arguments: &Value) -> Result<CaptureTarget, CaptureError> {
        let args = Self::deserialize(arguments)
            .map_err(|e| CaptureError::InvalidArguments(e.to_string()))?;
        let target = CaptureTarget::new(args.fps, ResolutionTier::from_label(&args.resolution));
        target.validate()?;
        Ok(target)
    }
}

/// Host-facing entry point: dispatches method calls by name onto the
/// recorder and answers each call exactly once.
pub struct SlowmoRecorderPlugin {
    backend: Arc<dyn CaptureBackend>,
    manager: Arc<CaptureSessionManager>,
    recorder: RecordingController,
}

impl SlowmoRecorderPlugin {
    pub fn new(
        backend: Arc<dyn CaptureBackend>,
        config: RecorderConfig,
    ) -> Result<Self, CaptureError> {
        let manager = Arc::new(CaptureSessionManager::new(Arc::clone(&backend), config)?);
        let recorder = RecordingController::new(Arc::clone(&manager));
        Ok(Self {
            backend,
            manager,
            recorder,
        })
    }

    pub fn handle(&self, call: MethodCall, result: MethodResult) {
        log::debug!("method call: {}", call.method);
        match call.method.as_str() {
            "startRecording" => self.start_recording(&call.arguments, result),
            "stopRecording" => self.stop_recording(result),
            "getPlatformVersion" => result.success(self.backend.platform_version()),
            other => {
                log::debug!("unhandled method: {}", other);
                result.not_implemented();
            }
        }
    }

    fn start_recording(&self, arguments: &Value, result: MethodResult) {
        let started =
            StartRecordingArgs::parse(arguments).and_then(|target| self.recorder.start(target));
        match started {
            Ok(_) => result.success(true),
            Err(e) => result.error(&e),
        }
    }

    fn stop_recording(&self, result: MethodResult) {
        self.recorder.stop(PendingResult::new(move |outcome| match outcome {
            Ok(recording) => result.success(recording.file_path.to_string_lossy().into_owned()),
            Err(e) => result.error(&e),
        }));
    }

    pub fn session_manager(&self) -> &Arc<CaptureSessionManager> {
        &self.manager
    }

    pub fn recorder(&self) -> &RecordingController {
        &self.recorder
    }
}
