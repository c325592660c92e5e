//! Legacy Sign-In Report
//!
//! Runs the whole pipeline for one report: fetch every page, transform each
//! entry, then apply the optional user filter.

use chrono::{DateTime, Utc};

use crate::error::AuditResult;
use crate::export::{write_reports, ReportContext, ReportFiles};
use crate::graph::{fetch_sign_ins, SignInQuery, SignInSource};
use crate::models::{DateRange, SignInRecord};
use crate::services::{filter_by_user, to_records};

/// A materialized sign-in report
#[derive(Debug, Clone)]
pub struct SignInReport {
    /// Application identifier the rows were fetched for
    pub app_id: String,
    /// Reported range
    pub range: DateRange,
    /// User filter applied, if any
    pub user_filter: Option<String>,
    /// Rows fetched before filtering
    pub fetched_count: usize,
    /// Rows after filtering
    pub rows: Vec<SignInRecord>,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
}

impl SignInReport {
    /// Fetch, transform and filter
    pub fn generate<S: SignInSource + ?Sized>(
        source: &S,
        query: &SignInQuery,
        user_filter: Option<&str>,
    ) -> AuditResult<Self> {
        let raws = fetch_sign_ins(source, query)?;
        let fetched = to_records(&raws);
        let fetched_count = fetched.len();

        let user_filter = user_filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(String::from);
        let rows = filter_by_user(fetched, user_filter.as_deref());

        if user_filter.is_some() {
            tracing::info!(
                fetched = fetched_count,
                kept = rows.len(),
                "Applied user filter"
            );
        }

        Ok(Self {
            app_id: query.app_id.to_string(),
            range: query.range,
            user_filter,
            fetched_count,
            rows,
            generated_at: Utc::now(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Explain why the report has no rows
    pub fn empty_reason(&self) -> String {
        if self.range.is_empty() {
            format!(
                "No sign-in records: start date {} is after end date {}.",
                self.range.start, self.range.end
            )
        } else if self.fetched_count > 0 {
            format!(
                "No sign-in records matched user filter '{}' ({} fetched for {}).",
                self.user_filter.as_deref().unwrap_or_default(),
                self.fetched_count,
                self.range
            )
        } else {
            format!("No sign-in records found for {}.", self.range)
        }
    }

    /// Write every report file
    pub fn write(&self, files: &ReportFiles) -> AuditResult<()> {
        let context = ReportContext {
            app_id: &self.app_id,
            range: self.range,
            user_filter: self.user_filter.as_deref(),
            generated_at: self.generated_at,
        };
        write_reports(&self.rows, files, &context)
    }
}
