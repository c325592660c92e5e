//! CSV Export functionality
//!
//! Writes report rows as RFC 4180 CSV with a fixed header.

use crate::error::{AuditError, AuditResult};
use crate::models::SignInRecord;
use std::io::Write;

/// Column headers shared by the CSV and HTML reports
pub const COLUMNS: [&str; 8] = [
    "UserPrincipalName",
    "AppDisplayName",
    "IPAddress",
    "Location",
    "SignInTime",
    "Status",
    "RiskLevel",
    "CorrelationId",
];

/// Cell values of one row, in `COLUMNS` order
pub fn row_cells(record: &SignInRecord) -> [String; 8] {
    [
        record.user_principal_name.clone(),
        record.app_display_name.clone(),
        record.ip_address.clone(),
        record.location.clone(),
        record.formatted_time(),
        record.status.to_string(),
        record.risk_level.clone(),
        record.correlation_id.clone(),
    ]
}

/// Export sign-in rows to CSV
pub fn export_sign_ins_csv<W: Write>(records: &[SignInRecord], writer: W) -> AuditResult<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    csv_writer.write_record(COLUMNS)?;
    for record in records {
        csv_writer.write_record(row_cells(record))?;
    }

    csv_writer
        .flush()
        .map_err(|e| AuditError::Export(format!("Failed to flush CSV output: {}", e)))?;

    Ok(())
}
