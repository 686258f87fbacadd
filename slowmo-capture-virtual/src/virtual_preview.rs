//! Preview layer that remembers how it was configured.

use parking_lot::Mutex;

use slowmo_capture_core::models::orientation::VideoOrientation;
use slowmo_capture_core::traits::preview_layer::{PreviewLayer, SurfaceSize, VideoGravity};

#[derive(Debug, Default)]
pub struct VirtualPreviewLayer {
    gravity: Mutex<Option<VideoGravity>>,
    orientation: Mutex<Option<VideoOrientation>>,
    frame: Mutex<Option<SurfaceSize>>,
}

impl VirtualPreviewLayer {
    pub fn gravity(&self) -> Option<VideoGravity> {
        *self.gravity.lock()
    }

    pub fn frame(&self) -> Option<SurfaceSize> {
        *self.frame.lock()
    }
}

impl PreviewLayer for VirtualPreviewLayer {
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
