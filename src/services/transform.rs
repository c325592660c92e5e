//! Raw sign-in to report row mapping

use crate::models::{RawLocation, RawSignIn, SignInRecord, SignInStatus};

/// Risk level written when Graph omits one
pub const DEFAULT_RISK_LEVEL: &str = "none";

/// Map one raw Graph entry to a report row
pub fn to_record(raw: &RawSignIn) -> SignInRecord {
    let error_code = raw
        .status
        .as_ref()
        .and_then(|s| s.error_code)
        .unwrap_or(0);

    SignInRecord {
        user_principal_name: text(&raw.user_principal_name),
        app_display_name: text(&raw.app_display_name),
        ip_address: text(&raw.ip_address),
        location: raw.location.as_ref().map(join_location).unwrap_or_default(),
        sign_in_time: raw.created_date_time,
        status: SignInStatus::from_error_code(error_code),
        risk_level: raw
            .risk_level_during_sign_in
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_RISK_LEVEL)
            .to_string(),
        correlation_id: text(&raw.correlation_id),
    }
}

/// Map a batch, preserving order
pub fn to_records(raws: &[RawSignIn]) -> Vec<SignInRecord> {
    raws.iter().map(to_record).collect()
}

/// Join the present location parts with ", "
pub fn join_location(location: &RawLocation) -> String {
    [&location.city, &location.state, &location.country_or_region]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .map(|part| part.trim().trim_matches(','))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}
