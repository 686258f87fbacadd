pub mod handle;
pub mod manager;
pub mod queue;
