pub mod method_call;
pub mod plugin;
