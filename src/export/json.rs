//! JSON Export functionality
//!
//! Writes the report rows inside a versioned envelope.

use crate::error::AuditResult;
use crate::models::{DateRange, SignInRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// JSON report structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub generated_at: DateTime<Utc>,

    /// Application identifier the query was filtered by
    pub app_id: String,

    /// Reported date range
    pub range: DateRange,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_filter: Option<String>,

    pub record_count: usize,

    pub records: Vec<SignInRecord>,
}

impl JsonReport {
    pub fn new(
        records: &[SignInRecord],
        app_id: &str,
        range: DateRange,
        user_filter: Option<&str>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            generated_at,
            app_id: app_id.to_string(),
            range,
            user_filter: user_filter
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from),
            record_count: records.len(),
            records: records.to_vec(),
        }
    }
}

/// Export a JSON report
pub fn export_sign_ins_json<W: Write>(report: &JsonReport, writer: &mut W) -> AuditResult<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignInStatus;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_export_sign_ins_json() {
        let record = SignInRecord {
            user_principal_name: "megan@contoso.com".into(),
            app_display_name: "Azure Active Directory PowerShell".into(),
            ip_address: "203.0.113.7".into(),
            location: "Redmond, Washington, US".into(),
            sign_in_time: Utc.with_ymd_and_hms(2025, 1, 10, 14, 2, 11).unwrap(),
            status: SignInStatus::Failure,
            risk_level: "none".into(),
            correlation_id: "d79f5bee".into(),
        };
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        );
        let report = JsonReport::new(
            &[record],
            "1b730954-1685-4b74-9bfd-dac224a7b894",
            range,
            Some(" "),
            Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        );

        let mut output = Vec::new();
        export_sign_ins_json(&report, &mut output).unwrap();

        let parsed: JsonReport = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.record_count, 1);
        assert_eq!(parsed.records[0].status, SignInStatus::Failure);
        assert!(parsed.user_filter.is_none());
        assert_eq!(parsed.schema_version, EXPORT_SCHEMA_VERSION);
    }
}
