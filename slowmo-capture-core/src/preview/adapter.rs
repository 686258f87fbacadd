use std::sync::Arc;

use crate::models::error::CaptureError;
use crate::models::orientation::{DeviceOrientation, VideoOrientation};
use crate::session::handle::{ConsumerKind, ConsumerLease, SessionHandle};
use crate::session::manager::CaptureSessionManager;
use crate::traits::camera_device::MediaKind;
use crate::traits::preview_layer::{PreviewLayer, SurfaceSize, VideoGravity};

/// Live preview of the shared capture session.
///
/// Reuses the recorder's session when there is one so recording can start
/// without rebuilding the graph. The adapter never removes inputs or tears
/// the session down; dropping it only releases its consumer lease.
pub struct PreviewSurfaceAdapter {
    session: SessionHandle,
    layer: Arc<dyn PreviewLayer>,
    size: SurfaceSize,
    _lease: ConsumerLease,
}

impl PreviewSurfaceAdapter {
    pub fn attach(
        manager: &CaptureSessionManager,
        container: SurfaceSize,
    ) -> Result<Self, CaptureError> {
        let session = manager.ensure_session();
        let lease = session.attach(ConsumerKind::Preview);

        let layer = session.connect_preview()?;
        layer.set_video_gravity(VideoGravity::ResizeAspectFill);
        if layer.supports_video_orientation() {
            layer.set_video_orientation(VideoOrientation::Portrait);
        }
        layer.set_frame(container);

        if session.has_input(MediaKind::Video) {
            session.start_running();
        }

        Ok(Self {
            session,
            layer,
            size: container,
            _lease: lease,
        })
    }

    /// Rotate the preview to follow the device.
    ///
    /// Returns the orientation applied, or `None` if the layer was left
    /// unchanged (flat/unknown orientation, or no orientation support).
    pub fn handle_orientation_change(
        &self,
        orientation: DeviceOrientation,
    ) -> Option<VideoOrientation> {
        if !self.layer.supports_video_orientation() {
            return None;
        }
        let video = orientation.video_orientation()?;
        self.layer.set_video_orientation(video);
        log::debug!("preview orientation {:?} -> {:?}", orientation, video);
        Some(video)
    }

    /// Keep the layer fixed to its container's size.
    pub fn resize(&mut self, container: SurfaceSize) {
        self.size = container;
        self.layer.set_frame(container);
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn layer(&self) -> &Arc<dyn PreviewLayer> {
        &self.layer
    }
}
