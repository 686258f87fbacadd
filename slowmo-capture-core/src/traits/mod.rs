pub mod camera_device;
pub mod capture_backend;
pub mod capture_delegate;
pub mod capture_session;
pub mod movie_output;
pub mod preview_layer;
