//! Display formatting for terminal output

pub mod summary;

pub use summary::{format_preview, format_summary};
