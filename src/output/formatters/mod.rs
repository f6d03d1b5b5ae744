//! Output formatter implementations

pub mod json;
pub mod text;

pub use json::{JsonFormatter, format_all_errors_as_json};
pub use text::TextFormatter;
