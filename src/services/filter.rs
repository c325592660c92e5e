//! User filter for report rows

use crate::models::SignInRecord;

/// Keep rows whose user principal name contains `needle`, ignoring case
///
/// A blank needle keeps every row.
pub fn filter_by_user(records: Vec<SignInRecord>, needle: Option<&str>) -> Vec<SignInRecord> {
    let needle = match needle.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_lowercase(),
        _ => return records,
    };

    records
        .into_iter()
        .filter(|r| r.user_principal_name.to_lowercase().contains(&needle))
        .collect()
}
