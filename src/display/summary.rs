//! Terminal summary of a finished report

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::export::ReportFiles;
use crate::models::SignInRecord;

/// Rows shown in the terminal preview
pub const PREVIEW_ROWS: usize = 10;

#[derive(Tabled)]
struct PreviewRow {
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Time (UTC)")]
    time: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Format a preview table of the first rows
pub fn format_preview(records: &[SignInRecord]) -> String {
    if records.is_empty() {
        return "No sign-in records.".to_string();
    }

    let rows: Vec<PreviewRow> = records
        .iter()
        .take(PREVIEW_ROWS)
        .map(|r| PreviewRow {
            user: r.user_principal_name.clone(),
            time: r.formatted_time(),
            ip: r.ip_address.clone(),
            location: r.location.clone(),
            status: r.status.to_string(),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    if records.len() > PREVIEW_ROWS {
        output.push_str(&format!("\n... and {} more", records.len() - PREVIEW_ROWS));
    }
    output
}

/// Format the closing summary: counts and written paths
pub fn format_summary(records: &[SignInRecord], files: &ReportFiles) -> String {
    let failures = records.iter().filter(|r| !r.status.is_success()).count();

    let mut output = String::new();
    output.push_str(&format!(
        "Sign-ins: {} ({} succeeded, {} failed)\n",
        records.len(),
        records.len() - failures,
        failures
    ));
    output.push_str(&format!("CSV report:  {}\n", files.csv.display()));
    output.push_str(&format!("HTML report: {}\n", files.html.display()));
    if let Some(json) = &files.json {
        output.push_str(&format!("JSON report: {}\n", json.display()));
    }
    output
}
