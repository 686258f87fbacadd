//! # slowmo-capture-virtual
//!
//! In-process virtual camera backend for slowmo-capture-kit.
//!
//! Provides:
//! - `VirtualBackend` — `CaptureBackend` over a simulated phone camera
//! - `VirtualCameraProfile` — describes the simulated hardware and its failure modes
//! - `VirtualCamera` / `VirtualMicrophone` — capture devices with lock discipline
//! - `VirtualSession` — capture session graph with observable counters
//! - `VirtualMovieOutput` — writes frame containers on a writer thread
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use slowmo_capture_core::{MethodCall, MethodResult, RecorderConfig, SlowmoRecorderPlugin};
//! use slowmo_capture_virtual::{VirtualBackend, VirtualCameraProfile};
//!
//! let backend = Arc::new(VirtualBackend::new(VirtualCameraProfile::iphone_like())?);
//! let plugin = SlowmoRecorderPlugin::new(backend, RecorderConfig::default())?;
//! let (result, rx) = MethodResult::channel();
//! plugin.handle(MethodCall::new("getPlatformVersion", serde_json::Value::Null), result);
//! ```

pub mod backend;
pub mod profile;
pub mod virtual_camera;
pub mod virtual_movie_output;
pub mod virtual_preview;
pub mod virtual_session;

pub use backend::VirtualBackend;
pub use profile::VirtualCameraProfile;
pub use virtual_camera::{VirtualCamera, VirtualMicrophone};
pub use virtual_movie_output::{inspect, ContainerInfo, VirtualMovieOutput};
pub use virtual_preview::VirtualPreviewLayer;
pub use virtual_session::{SessionStats, VirtualSession};
