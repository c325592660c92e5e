//! Configuration module for signin-audit
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings persistence

pub mod paths;
pub mod settings;

pub use paths::AuditPaths;
pub use settings::Settings;
