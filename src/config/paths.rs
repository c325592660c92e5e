//! Path management for signin-audit
//!
//! Provides XDG-compliant path resolution for the configuration directory.
//!
//! ## Path Resolution Order
//!
//! 1. `SIGNIN_AUDIT_CONFIG_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/signin-audit` or `~/.config/signin-audit`
//! 3. Windows: `%APPDATA%\signin-audit`

use std::path::PathBuf;

use crate::error::AuditError;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "SIGNIN_AUDIT_CONFIG_DIR";

/// Manages all paths used by signin-audit
#[derive(Debug, Clone)]
pub struct AuditPaths {
    /// Base directory for signin-audit configuration
    base_dir: PathBuf,
}

impl AuditPaths {
    /// Create a new AuditPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, AuditError> {
        let base_dir = if let Ok(custom) = std::env::var(CONFIG_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create AuditPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/signin-audit/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), AuditError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| AuditError::Io(format!("Failed to create config directory: {}", e)))
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, AuditError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                AuditError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("signin-audit"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, AuditError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| AuditError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("signin-audit"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AuditPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("signin-audit");
        let paths = AuditPaths::with_base_dir(nested.clone());

        paths.ensure_directories().unwrap();

        assert!(nested.is_dir());
    }
}
