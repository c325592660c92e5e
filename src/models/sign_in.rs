//! Sign-in models
//!
//! `RawSignIn` mirrors the fields of a Microsoft Graph `signIn` resource the
//! reporter reads; `SignInRecord` is the flat row written to reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a sign-in attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignInStatus {
    Success,
    Failure,
}

impl SignInStatus {
    /// Derive the status from a Graph error code (zero means success)
    pub fn from_error_code(code: i64) -> Self {
        if code == 0 {
            Self::Success
        } else {
            Self::Failure
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for SignInStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Failure => write!(f, "Failure"),
        }
    }
}

/// `status` object of a raw sign-in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatus {
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// `location` object of a raw sign-in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country_or_region: Option<String>,
}

/// One sign-in entry as returned by Graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSignIn {
    #[serde(default)]
    pub id: Option<String>,
    pub created_date_time: DateTime<Utc>,
    #[serde(default)]
    pub user_principal_name: Option<String>,
    #[serde(default)]
    pub app_display_name: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub risk_level_during_sign_in: Option<String>,
    #[serde(default)]
    pub status: Option<RawStatus>,
    #[serde(default)]
    pub location: Option<RawLocation>,
}

/// One page of the signIns collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignInPage {
    #[serde(default)]
    pub value: Vec<RawSignIn>,

    /// Continuation cursor; absent on the last page
    #[serde(rename = "@odata.nextLink", default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

/// A flat report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRecord {
    pub user_principal_name: String,
    pub app_display_name: String,
    pub ip_address: String,
    /// City, state and country joined with ", "
    pub location: String,
    pub sign_in_time: DateTime<Utc>,
    pub status: SignInStatus,
    pub risk_level: String,
    pub correlation_id: String,
}

impl SignInRecord {
    /// Sign-in time as written to reports
    pub fn formatted_time(&self) -> String {
        self.sign_in_time.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
