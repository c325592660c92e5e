//! Core data models for signin-audit
//!
//! Raw Graph sign-in entries, the flat report row they map to, and the date
//! range a report covers.

pub mod range;
pub mod sign_in;

pub use range::{parse_date, DateRange, DATE_FORMAT};
pub use sign_in::{RawLocation, RawSignIn, RawStatus, SignInPage, SignInRecord, SignInStatus};
