use std::sync::Arc;

use crate::models::error::CaptureError;
use crate::traits::camera_device::{AudioDevice, CameraDevice, MediaKind};
use crate::traits::movie_output::MovieFileOutput;
use crate::traits::preview_layer::PreviewLayer;

/// An input the session can attach.
#[derive(Clone)]
pub enum CaptureInput {
    Video(Arc<dyn CameraDevice>),
    Audio(Arc<dyn AudioDevice>),
}

impl CaptureInput {
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Video(_) => MediaKind::Video,
            Self::Audio(_) => MediaKind::Audio,
        }
    }
}

/// The platform's capture session: the graph of inputs and outputs the
/// camera framework schedules together.
///
/// Graph changes should happen between `begin_configuration` and
/// `commit_configuration` so observers never see a half-built graph. The
/// core only reaches a session through `SessionHandle`, which enforces that.
pub trait CaptureSession: Send {
    fn begin_configuration(&mut self);

    fn commit_configuration(&mut self);

    /// Attach an input. Fails if the session rejects it.
    fn add_input(&mut self, input: CaptureInput) -> Result<(), CaptureError>;

    fn has_input(&self, kind: MediaKind) -> bool;

    /// Attach a movie-file output. Fails if the session rejects it.
    fn add_output(&mut self, output: Arc<dyn MovieFileOutput>) -> Result<(), CaptureError>;

    fn has_output(&self) -> bool;

    /// Detach every input and output.
    fn remove_all(&mut self);

    fn start_running(&mut self);

    fn stop_running(&mut self);

    fn is_running(&self) -> bool;

    /// Create a preview layer rendering this session.
    fn connect_preview(&mut self) -> Result<Arc<dyn PreviewLayer>, CaptureError>;
}
