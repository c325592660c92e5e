//! Reporting date range
//!
//! A pair of UTC calendar dates, inclusive on both ends. A range whose start
//! falls after its end is valid and simply contains nothing.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AuditError;

/// Accepted input format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive range of UTC days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a new range; no ordering is enforced
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` days leading up to and including `end`
    pub fn trailing(end: NaiveDate, days: u32) -> Result<Self, AuditError> {
        let start = end.checked_sub_days(Days::new(u64::from(days))).ok_or_else(|| {
            AuditError::Validation(format!(
                "A lookback of {} days before {} is out of range",
                days, end
            ))
        })?;
        Ok(Self { start, end })
    }

    /// True when no instant can fall inside the range
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Check whether a timestamp falls on a day inside the range
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        let day = timestamp.date_naive();
        day >= self.start && day <= self.end
    }

    /// Lower bound as an OData datetime literal
    pub fn start_literal(&self) -> String {
        format!("{}T00:00:00Z", self.start.format(DATE_FORMAT))
    }

    /// Upper bound as an OData datetime literal
    pub fn end_literal(&self) -> String {
        format!("{}T23:59:59Z", self.end.format(DATE_FORMAT))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate, AuditError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        AuditError::Validation(format!(
            "Invalid date '{}'. Use YYYY-MM-DD (e.g., 2025-01-31)",
            trimmed
        ))
    })
}
