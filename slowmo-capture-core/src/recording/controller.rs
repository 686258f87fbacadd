use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::models::completion::{PendingResult, RecordingOutcome};
use crate::models::error::CaptureError;
use crate::models::recording_result::{RecordingMetadata, RecordingResult};
use crate::models::state::RecorderState;
use crate::models::target::CaptureTarget;
use crate::session::handle::{ConsumerKind, ConsumerLease, SessionHandle};
use crate::session::manager::CaptureSessionManager;
use crate::storage::{checksum, output_path};
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::movie_output::{MovieFileOutput, RecordingDelegate};

/// The recording in flight. Exists from an accepted start until the output
/// reports completion.
struct RecordingRequest {
    id: u64,
    output_path: PathBuf,
    output: Arc<dyn MovieFileOutput>,
    /// Present once stop was requested; taking it is the only way to resolve.
    pending: Option<PendingResult>,
    started_at: Instant,
    metadata: RecordingMetadata,
}

impl RecordingRequest {
    fn state(&self) -> RecorderState {
        let output_path = self.output_path.clone();
        if self.pending.is_some() {
            RecorderState::Stopping { output_path }
        } else {
            RecorderState::Recording { output_path }
        }
    }
}

struct ControllerInner {
    manager: Arc<CaptureSessionManager>,
    request: Mutex<Option<RecordingRequest>>,
    lease: Mutex<Option<ConsumerLease>>,
    delegate: Mutex<Option<Arc<dyn CaptureDelegate>>>,
    next_id: AtomicU64,
}

/// Drives start/stop against the session's movie output.
///
/// Holds at most one recording request. `start` is accepted only when idle;
/// `stop` only while recording. The outcome of a stop arrives later, through
/// the [`PendingResult`] handed to `stop`, once the output has flushed the
/// file.
pub struct RecordingController {
    inner: Arc<ControllerInner>,
}

impl RecordingController {
    pub fn new(manager: Arc<CaptureSessionManager>) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                manager,
                request: Mutex::new(None),
                lease: Mutex::new(None),
                delegate: Mutex::new(None),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn set_delegate(&self, delegate: Arc<dyn CaptureDelegate>) {
        *self.inner.delegate.lock() = Some(delegate);
    }

    pub fn session_manager(&self) -> &Arc<CaptureSessionManager> {
        &self.inner.manager
    }

    pub fn state(&self) -> RecorderState {
        self.inner
            .request
            .lock()
            .as_ref()
            .map_or(RecorderState::Idle, RecordingRequest::state)
    }

    /// Configure the camera for `target` and start writing a new file.
    ///
    /// Returns the path being written as soon as recording has begun. Any
    /// failure leaves the controller idle. Blocks `state()` and `stop()`
    /// callers for the duration of the hardware configuration.
    pub fn start(&self, target: CaptureTarget) -> Result<PathBuf, CaptureError> {
        target.validate()?;

        // Held through configuration and output start so concurrent starts
        // serialize and an early completion waits for the request to exist.
        // `state()` blocks meanwhile. Outputs must not call their delegate
        // from inside `start_recording`, or this deadlocks.
        let mut slot = self.inner.request.lock();
        if slot.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }

        let configured = self.inner.manager.configure_for_capture(&target)?;
        self.inner.hold_lease(&configured.session);

        let output_path =
            output_path::recording_path(self.inner.manager.config(), chrono::Utc::now())?;
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let relay = Arc::new(CompletionRelay {
            inner: Arc::clone(&self.inner),
            id,
        });

        configured
            .movie_output
            .start_recording(&output_path, relay)
            .map_err(|e| match e {
                CaptureError::RecordingFailed(_) | CaptureError::StorageError(_) => e,
                other => CaptureError::RecordingFailed(other.to_string()),
            })?;

        let request = RecordingRequest {
            id,
            output_path: output_path.clone(),
            output: Arc::clone(&configured.movie_output),
            pending: None,
            started_at: Instant::now(),
            metadata: RecordingMetadata::new(
                &configured.selection.format,
                target.fps,
                configured.has_audio,
            ),
        };
        let state = request.state();
        *slot = Some(request);
        drop(slot);

        log::info!("recording started: {}", output_path.display());
        self.inner.notify_state(&state);
        Ok(output_path)
    }

    /// Ask the output to stop; `pending` receives the outcome exactly once.
    ///
    /// When no recording is in flight (or a stop is already pending) the
    /// handle is resolved immediately with `NotRecording` and nothing else
    /// changes.
    pub fn stop(&self, pending: PendingResult) {
        let accepted = {
            let mut slot = self.inner.request.lock();
            match slot.as_mut() {
                Some(request) if request.pending.is_none() => {
                    request.pending = Some(pending);
                    Ok((Arc::clone(&request.output), request.state()))
                }
                _ => Err(pending),
            }
        };
        let (output, state) = match accepted {
            Ok(accepted) => accepted,
            Err(pending) => {
                pending.resolve(Err(CaptureError::NotRecording));
                return;
            }
        };

        log::info!("stopping recording");
        self.inner.notify_state(&state);
        output.stop_recording();
    }

    /// Stop and block until the file is finalized.
    pub fn stop_and_wait(&self) -> RecordingOutcome {
        let (pending, receiver) = PendingResult::channel();
        self.stop(pending);
        receiver.recv().map_err(|_| {
            CaptureError::RecordingFailed("recording finished without reporting a result".into())
        })?
    }
}

impl ControllerInner {
    fn hold_lease(&self, session: &SessionHandle) {
        let mut lease = self.lease.lock();
        if !lease.as_ref().is_some_and(|l| l.is_for(session)) {
            *lease = Some(session.attach(ConsumerKind::Recorder));
        }
    }

    fn notify_state(&self, state: &RecorderState) {
        if let Some(delegate) = self.delegate.lock().clone() {
            delegate.on_state_changed(state);
        }
    }

    fn finish(&self, id: u64, path: &Path, error: Option<String>) {
        let request = {
            let mut slot = self.request.lock();
            if slot.as_ref().map(|r| r.id) == Some(id) {
                slot.take()
            } else {
                None
            }
        };
        let Some(mut request) = request else {
            log::warn!("ignoring completion for unknown recording {}", path.display());
            return;
        };

        let outcome = match error {
            None => Ok(self.build_result(&request, path)),
            Some(message) => Err(CaptureError::RecordingFailed(message)),
        };

        self.notify_state(&RecorderState::Idle);
        let delegate = self.delegate.lock().clone();
        match &outcome {
            Ok(result) => {
                log::info!(
                    "recording finished: {} ({:.2}s)",
                    result.file_path.display(),
                    result.duration_secs
                );
                if let Some(d) = &delegate {
                    d.on_recording_finished(result);
                }
            }
            Err(e) => {
                log::error!("{}", e);
                if let Some(d) = &delegate {
                    d.on_error(e);
                }
            }
        }

        match request.pending.take() {
            Some(pending) => pending.resolve(outcome),
            None => log::warn!("recording ended before stop was requested"),
        }
    }

    fn build_result(&self, request: &RecordingRequest, path: &Path) -> RecordingResult {
        let checksum = match checksum::sha256_file(path) {
            Ok(sum) => Some(sum),
            Err(e) => {
                log::warn!("could not checksum {}: {}", path.display(), e);
                None
            }
        };
        RecordingResult {
            file_path: path.to_path_buf(),
            duration_secs: request.started_at.elapsed().as_secs_f64(),
            checksum,
            metadata: request.metadata.clone(),
        }
    }
}

/// Routes one recording's output events back to its controller.
struct CompletionRelay {
    inner: Arc<ControllerInner>,
    id: u64,
}

impl RecordingDelegate for CompletionRelay {
    fn did_start_recording(&self, path: &Path) {
        log::debug!("output began writing {}", path.display());
    }

    fn did_finish_recording(&self, path: &Path, error: Option<String>) {
        self.inner.finish(self.id, path, error);
    }
}
