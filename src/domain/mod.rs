pub mod document;
pub mod window;

pub use document::{to_pretty_json, Document};
pub use window::{in_window, DateWindow, WINDOW_SLACK_DAYS};
