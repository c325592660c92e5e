//! User settings for signin-audit
//!
//! Holds the Graph endpoint, the legacy application identifier, paging and
//! output preferences. Every field has a default so a partial or missing
//! config file still yields a usable configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::paths::AuditPaths;
use crate::error::AuditError;

/// Application id of the legacy Azure AD PowerShell client
pub const LEGACY_POWERSHELL_APP_ID: &str = "1b730954-1685-4b74-9bfd-dac224a7b894";

/// Largest `$top` the signIns endpoint accepts
pub const MAX_PAGE_SIZE: u32 = 999;

/// Largest accepted `lookback_days`
pub const MAX_LOOKBACK_DAYS: u32 = 3650;

/// User settings for signin-audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Graph API root, without trailing slash
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,

    /// Application identifier the sign-in query is filtered by
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// Days before the end date used when no start date is given
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Directory report files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name prefix for report files
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_graph_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_app_id() -> String {
    LEGACY_POWERSHELL_APP_ID.to_string()
}

fn default_lookback_days() -> u32 {
    30
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_prefix() -> String {
    "LegacySignIns".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            graph_base_url: default_graph_base_url(),
            app_id: default_app_id(),
            lookback_days: default_lookback_days(),
            page_size: default_page_size(),
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &AuditPaths) -> Result<Self, AuditError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| AuditError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                AuditError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AuditPaths) -> Result<(), AuditError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AuditError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| AuditError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Check values a JSON schema cannot express
    pub fn validate(&self) -> Result<(), AuditError> {
        self.parsed_app_id()?;

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(AuditError::Config(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }

        if !self.graph_base_url.starts_with("https://") && !self.graph_base_url.starts_with("http://") {
            return Err(AuditError::Config(format!(
                "graph_base_url must be an http(s) URL: {}",
                self.graph_base_url
            )));
        }

        if self.lookback_days == 0 || self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(AuditError::Config(format!(
                "lookback_days must be between 1 and {}, got {}",
                MAX_LOOKBACK_DAYS, self.lookback_days
            )));
        }

        if self.file_prefix.trim().is_empty() {
            return Err(AuditError::Config("file_prefix cannot be empty".into()));
        }

        Ok(())
    }

    /// The application identifier as a UUID
    pub fn parsed_app_id(&self) -> Result<Uuid, AuditError> {
        Uuid::parse_str(self.app_id.trim()).map_err(|e| {
            AuditError::Config(format!("app_id '{}' is not a valid GUID: {}", self.app_id, e))
        })
    }
}
