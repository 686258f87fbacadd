use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::RecorderConfig;
use crate::models::error::CaptureError;
use crate::models::format::FrameDuration;
use crate::models::target::CaptureTarget;
use crate::selection::format_selector::{select_format, FormatSelection};
use crate::session::handle::{ConfigurationTransaction, SessionHandle};
use crate::session::queue::SessionQueue;
use crate::traits::camera_device::{CameraDevice, DeviceConfigurationGuard, DeviceInfo, MediaKind};
use crate::traits::capture_backend::CaptureBackend;
use crate::traits::capture_session::CaptureInput;
use crate::traits::movie_output::MovieFileOutput;

/// What `configure_for_capture` set the hardware to.
pub struct ConfiguredCapture {
    pub session: SessionHandle,
    pub device: DeviceInfo,
    pub selection: FormatSelection,
    pub frame_duration: FrameDuration,
    pub has_audio: bool,
    pub movie_output: Arc<dyn MovieFileOutput>,
}

/// Owns the shared capture session and configures it for recording.
///
/// Lock order: session slot, then the session itself (transaction), then
/// the movie output slot.
pub struct CaptureSessionManager {
    backend: Arc<dyn CaptureBackend>,
    config: RecorderConfig,
    session: Mutex<Option<SessionHandle>>,
    movie_output: Mutex<Option<Arc<dyn MovieFileOutput>>>,
    queue: SessionQueue,
}

impl CaptureSessionManager {
    pub fn new(
        backend: Arc<dyn CaptureBackend>,
        config: RecorderConfig,
    ) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::ConfigurationFailed)?;
        Ok(Self {
            backend,
            config,
            session: Mutex::new(None),
            movie_output: Mutex::new(None),
            queue: SessionQueue::new("capture-session-queue")?,
        })
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// The current session, if one has been created.
    pub fn session(&self) -> Option<SessionHandle> {
        self.session.lock().clone()
    }

    /// The movie output attached by the last successful attach step.
    pub fn movie_output(&self) -> Option<Arc<dyn MovieFileOutput>> {
        self.movie_output.lock().clone()
    }

    /// Return the shared session, creating a preview-only one if needed.
    ///
    /// A new session gets a single video input for the configured camera and
    /// nothing else. With no camera it has no input at all; that is logged,
    /// not reported.
    pub fn ensure_session(&self) -> SessionHandle {
        let mut slot = self.session.lock();
        if let Some(handle) = slot.as_ref() {
            return handle.clone();
        }

        let handle = SessionHandle::new(self.backend.new_session());
        {
            let mut tx = handle.transaction();
            match self.backend.default_camera(self.config.camera_position) {
                Some(device) => {
                    if let Err(e) = tx.add_input(CaptureInput::Video(device)) {
                        log::warn!("preview session has no video input: {}", e);
                    }
                }
                None => log::warn!("no camera available, preview session has no input"),
            }
        }
        log::info!("created capture session");

        *slot = Some(handle.clone());
        handle
    }

    /// Attach inputs and output, select a format and pin the frame rate,
    /// then start the session running.
    ///
    /// Steps run inside one configuration transaction, committed exactly once
    /// whichever step fails. Attachments made before a failure stay in place
    /// and are reused by the next call.
    pub fn configure_for_capture(
        &self,
        target: &CaptureTarget,
    ) -> Result<ConfiguredCapture, CaptureError> {
        let frame_duration = target.frame_duration()?;
        let session = self.ensure_session();

        let (device, selection, has_audio, movie_output) = {
            let mut tx = session.transaction();

            let device = self
                .backend
                .default_camera(self.config.camera_position)
                .ok_or(CaptureError::NoCameraAvailable)?;

            if !tx.has_input(MediaKind::Video) {
                tx.add_input(CaptureInput::Video(Arc::clone(&device)))
                    .map_err(into_input_error)?;
            }

            let has_audio = self.attach_microphone(&mut tx);
            let movie_output = self.attach_movie_output(&mut tx)?;

            let selection = select_format(
                &device.formats(),
                target.fps,
                target.min_width(),
                target.min_height(),
            )
            .ok_or(CaptureError::FormatNotFound {
                fps: target.fps,
                resolution: target.resolution,
            })?;

            self.apply_format(&device, &selection, frame_duration)?;

            (device, selection, has_audio, movie_output)
        };

        session.start_running();

        let device = device.info();
        log::info!(
            "configured {} for {} fps: {} ({})",
            device.name,
            target.fps,
            selection.format,
            if has_audio { "audio+video" } else { "video only" }
        );

        Ok(ConfiguredCapture {
            session,
            device,
            selection,
            frame_duration,
            has_audio,
            movie_output,
        })
    }

    /// Stop the session and detach everything. The next call to
    /// `ensure_session` builds a new one.
    pub fn close(&self) {
        let Some(handle) = self.session.lock().take() else {
            return;
        };
        handle.stop_running();
        {
            let mut tx = handle.transaction();
            tx.remove_all();
        }
        self.movie_output.lock().take();
        log::info!("capture session closed");
    }

    /// Best effort: no microphone, or a rejected input, means video only.
    fn attach_microphone(&self, tx: &mut ConfigurationTransaction<'_>) -> bool {
        if !self.config.enable_audio {
            return false;
        }
        if tx.has_input(MediaKind::Audio) {
            return true;
        }
        let Some(microphone) = self.backend.default_microphone() else {
            log::warn!("no microphone available, recording video only");
            return false;
        };
        match tx.add_input(CaptureInput::Audio(microphone)) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("could not add audio input, recording video only: {}", e);
                false
            }
        }
    }

    fn attach_movie_output(
        &self,
        tx: &mut ConfigurationTransaction<'_>,
    ) -> Result<Arc<dyn MovieFileOutput>, CaptureError> {
        let mut slot = self.movie_output.lock();
        if let Some(output) = slot.as_ref() {
            if tx.has_output() {
                return Ok(Arc::clone(output));
            }
        }

        let output = self.backend.new_movie_output();
        tx.add_output(Arc::clone(&output)).map_err(into_input_error)?;
        *slot = Some(Arc::clone(&output));
        Ok(output)
    }

    /// Apply the format and pin the frame duration on the session queue.
    fn apply_format(
        &self,
        device: &Arc<dyn CameraDevice>,
        selection: &FormatSelection,
        frame_duration: FrameDuration,
    ) -> Result<(), CaptureError> {
        let device = Arc::clone(device);
        let format = selection.format.handle;

        self.queue.run_sync(move || {
            let lock = DeviceConfigurationGuard::acquire(device.as_ref())?;
            lock.set_active_format(format)?;
            lock.pin_frame_duration(frame_duration)
        })?
    }
}

fn into_input_error(error: CaptureError) -> CaptureError {
    match error {
        CaptureError::InputAttach(_) => error,
        other => CaptureError::InputAttach(other.to_string()),
    }
}
