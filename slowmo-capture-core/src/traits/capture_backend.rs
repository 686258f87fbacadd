use std::sync::Arc;

use crate::models::config::CameraPosition;
use crate::traits::camera_device::{AudioDevice, CameraDevice};
use crate::traits::capture_session::CaptureSession;
use crate::traits::movie_output::MovieFileOutput;

/// Entry point into a platform camera stack.
///
/// Implemented by:
/// - `VirtualBackend` (in-process simulation, `slowmo-capture-virtual`)
pub trait CaptureBackend: Send + Sync {
    /// Platform name and version, e.g. `"iOS 17.4"`.
    fn platform_version(&self) -> String;

    /// Default wide-angle camera at `position`, if the device has one.
    fn default_camera(&self, position: CameraPosition) -> Option<Arc<dyn CameraDevice>>;

    /// Default microphone, if the device has one.
    fn default_microphone(&self) -> Option<Arc<dyn AudioDevice>>;

    /// A fresh, empty capture session.
    fn new_session(&self) -> Box<dyn CaptureSession>;

    /// A fresh movie-file output, not yet attached to any session.
    fn new_movie_output(&self) -> Arc<dyn MovieFileOutput>;
}
