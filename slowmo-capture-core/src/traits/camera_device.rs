use crate::models::error::CaptureError;
use crate::models::format::{CaptureDeviceFormat, FormatHandle, FrameDuration};

/// Kind of media a device or session input produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
}

/// Descriptive information about a capture device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    pub kind: MediaKind,
}

/// A camera the platform exposes for capture.
///
/// Formats are owned by the device enumeration and read-only to the core.
/// Format and frame-duration changes are only valid between
/// `lock_for_configuration` and `unlock_for_configuration`; use
/// [`DeviceConfigurationGuard`] rather than calling them directly.
pub trait CameraDevice: Send + Sync {
    fn info(&self) -> DeviceInfo;

    /// Formats in the platform's enumeration order.
    fn formats(&self) -> Vec<CaptureDeviceFormat>;

    /// Acquire exclusive configuration access.
    ///
    /// Returns `CaptureError::DeviceLock` when the device is held elsewhere.
    fn lock_for_configuration(&self) -> Result<(), CaptureError>;

    fn unlock_for_configuration(&self);

    fn set_active_format(&self, format: FormatHandle) -> Result<(), CaptureError>;

    /// Bound the per-frame duration. Equal bounds pin a fixed frame rate.
    fn set_active_frame_durations(
        &self,
        min: FrameDuration,
        max: FrameDuration,
    ) -> Result<(), CaptureError>;
}

/// A microphone the platform exposes for capture.
pub trait AudioDevice: Send + Sync {
    fn info(&self) -> DeviceInfo;
}

/// Holds a camera's configuration lock, releasing it on drop.
pub struct DeviceConfigurationGuard<'a> {
    device: &'a dyn CameraDevice,
}

impl<'a> DeviceConfigurationGuard<'a> {
    pub fn acquire(device: &'a dyn CameraDevice) -> Result<Self, CaptureError> {
        device.lock_for_configuration()?;
        Ok(Self { device })
    }

    pub fn set_active_format(&self, format: FormatHandle) -> Result<(), CaptureError> {
        self.device.set_active_format(format)
    }

    /// Pin min and max frame duration to the same value.
    pub fn pin_frame_duration(&self, duration: FrameDuration) -> Result<(), CaptureError> {
        self.device.set_active_frame_durations(duration, duration)
    }
}

impl Drop for DeviceConfigurationGuard<'_> {
    fn drop(&mut self) {
        self.device.unlock_for_configuration();
    }
}
