//! `CaptureBackend` over the virtual devices.

use std::sync::Arc;

use parking_lot::Mutex;

use slowmo_capture_core::models::config::CameraPosition;
use slowmo_capture_core::models::error::CaptureError;
use slowmo_capture_core::traits::camera_device::{AudioDevice, CameraDevice};
use slowmo_capture_core::traits::capture_backend::CaptureBackend;
use slowmo_capture_core::traits::capture_session::CaptureSession;
use slowmo_capture_core::traits::movie_output::MovieFileOutput;

use crate::profile::VirtualCameraProfile;
use crate::virtual_camera::{VirtualCamera, VirtualMicrophone};
use crate::virtual_movie_output::VirtualMovieOutput;
use crate::virtual_session::{SessionStats, VirtualSession};

/// A whole simulated device: one rear camera, optionally a microphone.
pub struct VirtualBackend {
    profile: VirtualCameraProfile,
    camera: Option<Arc<VirtualCamera>>,
    microphone: Option<Arc<VirtualMicrophone>>,
    sessions: Mutex<Vec<Arc<Mutex<SessionStats>>>>,
}

impl VirtualBackend {
    pub fn new(profile: VirtualCameraProfile) -> Result<Self, CaptureError> {
        profile.validate().map_err(CaptureError::ConfigurationFailed)?;

        let camera = profile
            .has_camera
            .then(|| Arc::new(VirtualCamera::new(profile.formats.clone(), profile.refuse_lock)));
        let microphone = profile.has_microphone.then(|| Arc::new(VirtualMicrophone));
        log::info!(
            "virtual backend ready (camera: {}, microphone: {}, formats: {})",
            camera.is_some(),
            microphone.is_some(),
            profile.formats.len()
        );

        Ok(Self {
            profile,
            camera,
            microphone,
            sessions: Mutex::new(Vec::new()),
        })
    }

    pub fn profile(&self) -> &VirtualCameraProfile {
        &self.profile
    }

    pub fn camera(&self) -> Option<&Arc<VirtualCamera>> {
        self.camera.as_ref()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Snapshot of the `index`-th session created.
    pub fn session_stats(&self, index: usize) -> Option<SessionStats> {
        self.sessions.lock().get(index).map(|s| s.lock().clone())
    }
}

impl CaptureBackend for VirtualBackend {
    fn platform_version(&self) -> String {
        self.profile.platform.clone()
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
        self.microphone
            .as_ref()
            .map(|m| Arc::clone(m) as Arc<dyn AudioDevice>)
    }

    fn new_session(&self) -> Box<dyn CaptureSession> {
        let (session, stats) = VirtualSession::new(self.profile.reject_inputs);
        self.sessions.lock().push(stats);
        Box::new(session)
    }

    fn new_movie_output(&self) -> Arc<dyn MovieFileOutput> {
        Arc::new(VirtualMovieOutput::new(
            self.camera.clone(),
            self.profile.fail_output.clone(),
        ))
    }
}
