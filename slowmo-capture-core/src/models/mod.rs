pub mod completion;
pub mod config;
pub mod error;
pub mod format;
pub mod orientation;
pub mod recording_result;
pub mod state;
pub mod target;
