//! # slowmo-capture-core
//!
//! Platform-agnostic slow-motion camera recording core.
//!
//! Provides capture-format selection, shared session orchestration,
//! start/stop recording with one-shot completion, live preview wiring and a
//! string-keyed method-call surface. Platform backends (and the in-process
//! virtual backend) implement the `CaptureBackend` family of traits and plug
//! into the generic `CaptureSessionManager`.
//!
//! ## Architecture
//!
//! ```text
//! slowmo-capture-core (this crate)
//! ├── traits/       ← CaptureBackend, CaptureSession, CameraDevice, MovieFileOutput, etc.
//! ├── models/       ← CaptureError, RecorderState, CaptureTarget, PendingResult, etc.
//! ├── selection/    ← select_format (first format/range able to serve a target)
//! ├── session/      ← SessionHandle, SessionQueue, CaptureSessionManager
//! ├── recording/    ← RecordingController
//! ├── preview/      ← PreviewSurfaceAdapter
//! ├── channel/      ← SlowmoRecorderPlugin, MethodCall dispatch
//! └── storage/      ← output paths, checksums
//! ```

pub mod channel;
pub mod models;
pub mod preview;
pub mod recording;
pub mod selection;
pub mod session;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience.
pub use channel::method_call::{MethodCall, MethodResponse, MethodResult, CHANNEL_NAME};
pub use channel::plugin::SlowmoRecorderPlugin;
pub use models::completion::{PendingResult, RecordingOutcome};
pub use models::config::{CameraPosition, RecorderConfig};
pub use models::error::CaptureError;
pub use models::format::{CaptureDeviceFormat, FormatHandle, FrameDuration, FrameRateRange};
pub use models::orientation::{DeviceOrientation, VideoOrientation};
pub use models::recording_result::{RecordingMetadata, RecordingResult};
pub use models::state::RecorderState;
pub use models::target::{CaptureTarget, ResolutionTier};
pub use preview::adapter::PreviewSurfaceAdapter;
pub use recording::controller::RecordingController;
pub use selection::format_selector::{select_format, FormatSelection};
pub use session::handle::{ConsumerKind, ConsumerLease, SessionHandle};
pub use session::manager::{CaptureSessionManager, ConfiguredCapture};
pub use traits::camera_device::{AudioDevice, CameraDevice, DeviceInfo, MediaKind};
pub use traits::capture_backend::CaptureBackend;
pub use traits::capture_delegate::CaptureDelegate;
pub use traits::capture_session::{CaptureInput, CaptureSession};
pub use traits::movie_output::{MovieFileOutput, RecordingDelegate};
pub use traits::preview_layer::{PreviewLayer, SurfaceSize, VideoGravity};
