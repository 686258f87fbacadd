//! Virtual camera and microphone devices.
//!
//! The camera enforces the same configuration discipline a real device does:
//! format and frame-duration changes are refused unless the configuration
//! lock is held. It records what was applied so callers can verify it.

use parking_lot::Mutex;

use slowmo_capture_core::models::error::CaptureError;
use slowmo_capture_core::models::format::{CaptureDeviceFormat, FormatHandle, FrameDuration};
use slowmo_capture_core::traits::camera_device::{AudioDevice, CameraDevice, DeviceInfo, MediaKind};

#[derive(Debug, Default)]
struct CameraState {
    locked: bool,
    active_format: Option<FormatHandle>,
    frame_durations: Option<(FrameDuration, FrameDuration)>,
}

/// Rear wide-angle camera backed by a fixed format list.
pub struct VirtualCamera {
    formats: Vec<CaptureDeviceFormat>,
    refuse_lock: bool,
    state: Mutex<CameraState>,
}

impl VirtualCamera {
    pub fn new(formats: Vec<CaptureDeviceFormat>, refuse_lock: bool) -> Self {
        Self {
            formats,
            refuse_lock,
            state: Mutex::new(CameraState::default()),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock().locked
    }

    /// The applied format, if any.
    pub fn active_format(&self) -> Option<CaptureDeviceFormat> {
        let handle = self.state.lock().active_format?;
        self.formats.iter().find(|f| f.handle == handle).cloned()
    }

    /// The applied `(min, max)` frame durations, if any.
    pub fn frame_durations(&self) -> Option<(FrameDuration, FrameDuration)> {
        self.state.lock().frame_durations
    }

    /// Frame rate the camera is pinned to, when min and max agree.
    pub fn pinned_frame_rate(&self) -> Option<f64> {
        match self.frame_durations()? {
            (min, max) if min == max => Some(min.frames_per_second()),
            _ => None,
        }
    }
}

impl CameraDevice for VirtualCamera {
    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: "virtual-camera-back".into(),
            name: "Virtual Back Camera".into(),
            kind: MediaKind::Video,
        }
    }

    fn formats(&self) -> Vec<CaptureDeviceFormat> {
        self.formats.clone()
    }

    fn lock_for_configuration(&self) -> Result<(), CaptureError> {
        if self.refuse_lock {
            return Err(CaptureError::DeviceLock("device is in use by another client".into()));
        }
        let mut state = self.state.lock();
        if state.locked {
            return Err(CaptureError::DeviceLock("configuration lock already held".into()));
        }
        state.locked = true;
        Ok(())
    }

    fn unlock_for_configuration(&self) {
        self.state.lock().locked = false;
    }

    fn set_active_format(&self, format: FormatHandle) -> Result<(), CaptureError> {
        let mut state = self.state.lock();
        if !state.locked {
            return Err(CaptureError::ConfigurationFailed(
                "format change requires the configuration lock".into(),
            ));
        }
        if !self.formats.iter().any(|f| f.handle == format) {
            return Err(CaptureError::ConfigurationFailed(format!(
                "unknown format handle {}",
                format.0
            )));
        }
        state.active_format = Some(format);
        // A new format resets the frame duration to the format's default.
        state.frame_durations = None;
        log::debug!("virtual camera format set to #{}", format.0);
        Ok(())
    }

    fn set_active_frame_durations(
        &self,
        min: FrameDuration,
        max: FrameDuration,
    ) -> Result<(), CaptureError> {
        let mut state = self.state.lock();
        if !state.locked {
            return Err(CaptureError::ConfigurationFailed(
                "frame duration change requires the configuration lock".into(),
            ));
        }
        let handle = state.active_format.ok_or_else(|| {
            CaptureError::ConfigurationFailed("no active format".into())
        })?;
        let supported = self
            .formats
            .iter()
            .find(|f| f.handle == handle)
            .map(|f| f.max_frame_rate())
            .unwrap_or(0.0);
        // Shortest duration is the highest rate.
        if min.frames_per_second() > supported + f64::EPSILON {
            return Err(CaptureError::ConfigurationFailed(format!(
                "{:.0} fps exceeds the active format's {:.0} fps",
                min.frames_per_second(),
                supported
            )));
        }
        state.frame_durations = Some((min, max));
        Ok(())
    }
}

/// Built-in microphone.
pub struct VirtualMicrophone;

impl AudioDevice for VirtualMicrophone {
    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: "virtual-microphone".into(),
            name: "Virtual Microphone".into(),
            kind: MediaKind::Audio,
        }
    }
}
