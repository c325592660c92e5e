//! Export module for signin-audit
//!
//! Writes one row set to every report format:
//! - CSV: spreadsheet-compatible rows
//! - HTML: styled table with client-side column sort
//! - JSON: optional machine-readable envelope

pub mod csv;
pub mod html;
pub mod json;

pub use self::csv::{export_sign_ins_csv, COLUMNS};
pub use html::{export_sign_ins_html, render_sign_ins_html, HtmlReportMeta};
pub use json::{export_sign_ins_json, JsonReport, EXPORT_SCHEMA_VERSION};

use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::{AuditError, AuditResult};
use crate::models::{DateRange, SignInRecord};

/// Title written into the HTML report
pub const REPORT_TITLE: &str = "Legacy Sign-In Report";

/// Deterministic output file locations for one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub csv: PathBuf,
    pub html: PathBuf,
    pub json: Option<PathBuf>,
}

impl ReportFiles {
    /// `{prefix}_{start}_{end}.{ext}` inside `dir`
    pub fn new(dir: &Path, prefix: &str, range: &DateRange, with_json: bool) -> Self {
        let stem = format!("{}_{}_{}", prefix.trim(), range.start, range.end);
        Self {
            csv: dir.join(format!("{}.csv", stem)),
            html: dir.join(format!("{}.html", stem)),
            json: with_json.then(|| dir.join(format!("{}.json", stem))),
        }
    }
}

/// Everything a report needs besides its rows
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub app_id: &'a str,
    pub range: DateRange,
    pub user_filter: Option<&'a str>,
    pub generated_at: DateTime<Utc>,
}

/// Write every report file for `records`
pub fn write_reports(
    records: &[SignInRecord],
    files: &ReportFiles,
    context: &ReportContext<'_>,
) -> AuditResult<()> {
    if let Some(parent) = files.csv.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AuditError::Io(format!(
                "Failed to create output directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut writer = BufWriter::new(create_file(&files.csv)?);
    self::csv::export_sign_ins_csv(records, &mut writer)?;
    tracing::info!(path = %files.csv.display(), rows = records.len(), "Wrote CSV report");

    let meta = HtmlReportMeta {
        title: REPORT_TITLE,
        range: context.range,
        user_filter: context.user_filter,
        generated_at: context.generated_at,
    };
    let mut writer = BufWriter::new(create_file(&files.html)?);
    html::export_sign_ins_html(records, &meta, &mut writer)?;
    tracing::info!(path = %files.html.display(), rows = records.len(), "Wrote HTML report");

    if let Some(json_path) = &files.json {
        let report = JsonReport::new(
            records,
            context.app_id,
            context.range,
            context.user_filter,
            context.generated_at,
        );
        let mut writer = BufWriter::new(create_file(json_path)?);
        json::export_sign_ins_json(&report, &mut writer)?;
        tracing::info!(path = %json_path.display(), "Wrote JSON report");
    }

    Ok(())
}

fn create_file(path: &Path) -> AuditResult<File> {
    File::create(path).map_err(|e| {
        AuditError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignInStatus;
    use chrono::{NaiveDate, TimeZone};
    use tempfile::TempDir;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
    }

    fn record(user: &str, status: SignInStatus) -> SignInRecord {
        SignInRecord {
            user_principal_name: user.into(),
            app_display_name: "Azure Active Directory PowerShell".into(),
            ip_address: "203.0.113.7".into(),
            location: "Oslo, NO".into(),
            sign_in_time: Utc.with_ymd_and_hms(2025, 1, 12, 10, 0, 0).unwrap(),
            status,
            risk_level: "none".into(),
            correlation_id: "abc".into(),
        }
    }

    #[test]
    fn test_file_names_are_deterministic() {
        let files = ReportFiles::new(Path::new("out"), "LegacySignIns", &range(), false);
        assert_eq!(files.csv, Path::new("out/LegacySignIns_2025-01-01_2025-01-31.csv"));
        assert_eq!(files.html, Path::new("out/LegacySignIns_2025-01-01_2025-01-31.html"));
        assert!(files.json.is_none());

        let again = ReportFiles::new(Path::new("out"), "LegacySignIns", &range(), false);
        assert_eq!(files, again);
    }

    #[test]
    fn test_csv_and_html_row_counts_match() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("reports");
        let files = ReportFiles::new(&out_dir, "LegacySignIns", &range(), true);
        let records = vec![
            record("a@contoso.com", SignInStatus::Success),
            record("b@contoso.com", SignInStatus::Failure),
        ];
        let context = ReportContext {
            app_id: "1b730954-1685-4b74-9bfd-dac224a7b894",
            range: range(),
            user_filter: None,
            generated_at: Utc::now(),
        };

        write_reports(&records, &files, &context).unwrap();

        let mut reader = ::csv::Reader::from_path(&files.csv).unwrap();
        let csv_rows = reader.records().count();

        let html = std::fs::read_to_string(&files.html).unwrap();
        let html_rows = html.matches("            <tr><td>").count();

        assert_eq!(csv_rows, 2);
        assert_eq!(csv_rows, html_rows);
        assert!(files.json.as_ref().unwrap().exists());
    }
}
