//! Output formatting for CLI.

mod json;
mod text;

pub use json::{CartOutput, JsonFormatter};
pub use text::TextFormatter;
