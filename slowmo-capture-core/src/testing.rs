//! Hand-written fakes of the backend traits for unit tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::models::config::CameraPosition;
use crate::models::error::CaptureError;
use crate::models::format::{CaptureDeviceFormat, FormatHandle, FrameDuration, FrameRateRange};
use crate::models::orientation::VideoOrientation;
use crate::traits::camera_device::{AudioDevice, CameraDevice, DeviceInfo, MediaKind};
use crate::traits::capture_backend::CaptureBackend;
use crate::traits::capture_session::{CaptureInput, CaptureSession};
use crate::traits::movie_output::{MovieFileOutput, RecordingDelegate};
use crate::traits::preview_layer::{PreviewLayer, SurfaceSize, VideoGravity};

pub fn format(id: u64, width: i32, height: i32, max_fps: f64) -> CaptureDeviceFormat {
    CaptureDeviceFormat {
        handle: FormatHandle(id),
        width,
        height,
        frame_rate_ranges: vec![FrameRateRange::new(1.0, max_fps)],
    }
}

/// 720p up to 240 fps, then 1080p up to 60 and 240 fps.
pub fn slowmo_formats() -> Vec<CaptureDeviceFormat> {
    vec![
        format(1, 1280, 720, 240.0),
        format(2, 1920, 1080, 60.0),
        format(3, 1920, 1080, 240.0),
    ]
}

// -- Session --

#[derive(Default)]
pub struct SessionLog {
    pub begins: usize,
    pub commits: usize,
    pub starts: usize,
    pub inputs: Vec<MediaKind>,
    pub outputs: usize,
    pub running: bool,
    pub in_transaction: bool,
    /// Deepest begin/commit nesting observed.
    pub max_depth: usize,
    depth: usize,
    pub reject_video: bool,
    pub reject_audio: bool,
    pub previews: Vec<Arc<FakePreview>>,
}

pub struct FakeSession {
    log: Arc<Mutex<SessionLog>>,
}

impl FakeSession {
    pub fn new() -> (Self, Arc<Mutex<SessionLog>>) {
        let log = Arc::new(Mutex::new(SessionLog::default()));
        (Self { log: Arc::clone(&log) }, log)
    }
}

impl CaptureSession for FakeSession {
    fn begin_configuration(&mut self) {
        let mut log = self.log.lock();
        log.begins += 1;
        log.depth += 1;
        log.max_depth = log.max_depth.max(log.depth);
        log.in_transaction = true;
    }

    fn commit_configuration(&mut self) {
        let mut log = self.log.lock();
        log.commits += 1;
        log.depth = log.depth.saturating_sub(1);
        log.in_transaction = log.depth > 0;
    }

    fn add_input(&mut self, input: CaptureInput) -> Result<(), CaptureError> {
        let mut log = self.log.lock();
        let rejected = match input.kind() {
            MediaKind::Video => log.reject_video,
            MediaKind::Audio => log.reject_audio,
        };
        if rejected {
            return Err(CaptureError::InputAttach(format!("{:?} input rejected", input.kind())));
        }
        log.inputs.push(input.kind());
        Ok(())
    }

    fn has_input(&self, kind: MediaKind) -> bool {
        self.log.lock().inputs.contains(&kind)
    }

    fn add_output(&mut self, _output: Arc<dyn MovieFileOutput>) -> Result<(), CaptureError> {
        self.log.lock().outputs += 1;
        Ok(())
    }

    fn has_output(&self) -> bool {
        self.log.lock().outputs > 0
    }

    fn remove_all(&mut self) {
        let mut log = self.log.lock();
        log.inputs.clear();
        log.outputs = 0;
    }

    fn start_running(&mut self) {
        let mut log = self.log.lock();
        log.starts += 1;
        log.running = true;
    }

    fn stop_running(&mut self) {
        self.log.lock().running = false;
    }

    fn is_running(&self) -> bool {
        self.log.lock().running
    }

    fn connect_preview(&mut self) -> Result<Arc<dyn PreviewLayer>, CaptureError> {
        let preview = Arc::new(FakePreview::default());
        self.log.lock().previews.push(Arc::clone(&preview));
        Ok(preview)
    }
}

// -- Devices --

#[derive(Default)]
pub struct CameraLog {
    pub locked: bool,
    pub lock_calls: usize,
    pub active_format: Option<FormatHandle>,
    pub frame_durations: Option<(FrameDuration, FrameDuration)>,
    pub configured_on: Option<String>,
}

pub struct FakeCamera {
    pub formats: Vec<CaptureDeviceFormat>,
    pub refuse_lock: bool,
    pub log: Mutex<CameraLog>,
}

impl FakeCamera {
    pub fn new(formats: Vec<CaptureDeviceFormat>) -> Self {
        Self {
            formats,
            refuse_lock: false,
            log: Mutex::new(CameraLog::default()),
        }
    }
}

impl CameraDevice for FakeCamera {
    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: "fake-back-wide".into(),
            name: "Fake Back Camera".into(),
            kind: MediaKind::Video,
        }
    }

    fn formats(&self) -> Vec<CaptureDeviceFormat> {
        self.formats.clone()
    }

    fn lock_for_configuration(&self) -> Result<(), CaptureError> {
        let mut log = self.log.lock();
        log.lock_calls += 1;
        if self.refuse_lock || log.locked {
            return Err(CaptureError::DeviceLock("device is busy".into()));
        }
        log.locked = true;
        Ok(())
    }

    fn unlock_for_configuration(&self) {
        self.log.lock().locked = false;
    }

    fn set_active_format(&self, format: FormatHandle) -> Result<(), CaptureError> {
        let mut log = self.log.lock();
        assert!(log.locked, "format changed without configuration lock");
        log.active_format = Some(format);
        log.configured_on = thread::current().name().map(str::to_owned);
        Ok(())
    }

    fn set_active_frame_durations(
        &self,
        min: FrameDuration,
        max: FrameDuration,
    ) -> Result<(), CaptureError> {
        let mut log = self.log.lock();
        assert!(log.locked, "frame duration changed without configuration lock");
        log.frame_durations = Some((min, max));
        Ok(())
    }
}

pub struct FakeMicrophone;

impl AudioDevice for FakeMicrophone {
    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: "fake-mic".into(),
            name: "Fake Microphone".into(),
            kind: MediaKind::Audio,
        }
    }
}

// -- Output --

#[derive(Default)]
struct OutputState {
    recording: Option<(PathBuf, Arc<dyn RecordingDelegate>)>,
    starts: usize,
    stops: usize,
}

/// Movie output whose completion is driven by the test.
#[derive(Default)]
pub struct FakeOutput {
    state: Mutex<OutputState>,
    pub fail_start: bool,
    /// Finish from a background thread as soon as stop is requested.
    pub finish_on_stop: Option<Option<String>>,
    /// Finish from a background thread right after writing starts.
    pub finish_on_start: Option<Option<String>>,
}

impl FakeOutput {
    /// An output that refuses to start.
    pub fn failing_start() -> Self {
        Self {
            fail_start: true,
            ..Default::default()
        }
    }

    /// An output that completes on its own once stopped, with `error`.
    pub fn finishing_on_stop(error: Option<String>) -> Self {
        Self {
            finish_on_stop: Some(error),
            ..Default::default()
        }
    }

    /// An output that ends on its own as soon as it starts, with `error`.
    pub fn finishing_on_start(error: Option<String>) -> Self {
        Self {
            finish_on_start: Some(error),
            ..Default::default()
        }
    }

    pub fn starts(&self) -> usize {
        self.state.lock().starts
    }

    pub fn stops(&self) -> usize {
        self.state.lock().stops
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.state.lock().recording.as_ref().map(|(p, _)| p.clone())
    }

    /// Report completion the way the platform would: from another thread.
    pub fn finish(&self, error: Option<String>) {
        let Some((path, delegate)) = self.state.lock().recording.take() else {
            return;
        };
        thread::spawn(move || delegate.did_finish_recording(&path, error))
            .join()
            .unwrap();
    }
}

impl MovieFileOutput for FakeOutput {
    fn start_recording(
        &self,
        path: &Path,
        delegate: Arc<dyn RecordingDelegate>,
    ) -> Result<(), CaptureError> {
        if self.fail_start {
            return Err(CaptureError::RecordingFailed("output unavailable".into()));
        }
        fs::write(path, b"fake movie").map_err(|e| CaptureError::StorageError(e.to_string()))?;
        let mut state = self.state.lock();
        state.starts += 1;
        match self.finish_on_start.clone() {
            Some(error) => {
                let path = path.to_path_buf();
                thread::spawn(move || delegate.did_finish_recording(&path, error));
            }
            None => state.recording = Some((path.to_path_buf(), delegate)),
        }
        Ok(())
    }

    fn stop_recording(&self) {
        let mut state = self.state.lock();
        state.stops += 1;
        if let Some(error) = self.finish_on_stop.clone() {
            if let Some((path, delegate)) = state.recording.take() {
                thread::spawn(move || delegate.did_finish_recording(&path, error));
            }
        }
    }

    fn is_recording(&self) -> bool {
        self.state.lock().recording.is_some()
    }
}

// -- Preview --

#[derive(Default)]
pub struct FakePreview {
    pub gravity: Mutex<Option<VideoGravity>>,
    pub orientation: Mutex<Option<VideoOrientation>>,
    pub frame: Mutex<Option<SurfaceSize>>,
}

impl PreviewLayer for FakePreview {
    fn set_video_gravity(&self, gravity: VideoGravity) {
        *self.gravity.lock() = Some(gravity);
    }

    fn supports_video_orientation(&self) -> bool {
        true
    }

    fn set_video_orientation(&self, orientation: VideoOrientation) {
        *self.orientation.lock() = Some(orientation);
    }

    fn video_orientation(&self) -> Option<VideoOrientation> {
        *self.orientation.lock()
    }

    fn set_frame(&self, size: SurfaceSize) {
        *self.frame.lock() = Some(size);
    }
}

// -- Backend --

pub struct FakeBackend {
    pub camera: Option<Arc<FakeCamera>>,
    pub microphone: bool,
    pub output: Arc<FakeOutput>,
    pub reject_audio: bool,
    pub sessions: Mutex<Vec<Arc<Mutex<SessionLog>>>>,
}

impl FakeBackend {
    pub fn new(camera: Option<FakeCamera>) -> Self {
        Self {
            camera: camera.map(Arc::new),
            microphone: true,
            output: Arc::new(FakeOutput::default()),
            reject_audio: false,
            sessions: Mutex::new(Vec::new()),
        }
    }

    pub fn slowmo() -> Self {
        Self::new(Some(FakeCamera::new(slowmo_formats())))
    }

    pub fn camera(&self) -> &FakeCamera {
        self.camera.as_ref().expect("backend has no camera")
    }

    pub fn session_log(&self, index: usize) -> Arc<Mutex<SessionLog>> {
        Arc::clone(&self.sessions.lock()[index])
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}

impl CaptureBackend for FakeBackend {
    fn platform_version(&self) -> String {
        "FakeOS 1.0".into()
    }

    fn default_camera(&self, position: CameraPosition) -> Option<Arc<dyn CameraDevice>> {
        match position {
            CameraPosition::Back => self
                .camera
                .as_ref()
                .map(|c| Arc::clone(c) as Arc<dyn CameraDevice>),
            CameraPosition::Front => None,
        }
    }

    fn default_microphone(&self) -> Option<Arc<dyn AudioDevice>> {
        if self.microphone {
            Some(Arc::new(FakeMicrophone))
        } else {
            None
        }
    }

    fn new_session(&self) -> Box<dyn CaptureSession> {
        let (session, log) = FakeSession::new();
        log.lock().reject_audio = self.reject_audio;
        self.sessions.lock().push(log);
        Box::new(session)
    }

    fn new_movie_output(&self) -> Arc<dyn MovieFileOutput> {
        Arc::clone(&self.output) as Arc<dyn MovieFileOutput>
    }
}
