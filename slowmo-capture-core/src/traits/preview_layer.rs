use serde::{Deserialize, Serialize};

use crate::models::orientation::VideoOrientation;

/// How the preview fills its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoGravity {
    ResizeAspect,
    ResizeAspectFill,
    Resize,
}

/// Size of the container hosting a preview, in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A rendering layer bound to a capture session.
pub trait PreviewLayer: Send + Sync {
    fn set_video_gravity(&self, gravity: VideoGravity);

    fn supports_video_orientation(&self) -> bool;

    fn set_video_orientation(&self, orientation: VideoOrientation);

    fn video_orientation(&self) -> Option<VideoOrientation>;

    /// Resize the layer to exactly cover its container.
    fn set_frame(&self, size: SurfaceSize);
}
