//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the report pipeline.

pub mod prompt;
pub mod report;

pub use prompt::{resolve_inputs, InputArgs, Prompter, ResolvedInputs, TerminalPrompter};
pub use report::{handle_report_command, ReportArgs, TOKEN_ENV};
