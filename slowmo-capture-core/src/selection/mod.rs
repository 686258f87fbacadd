pub mod format_selector;
