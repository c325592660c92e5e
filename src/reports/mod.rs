//! Reports module for signin-audit
//!
//! Ties fetch, transform, filter and export together for one report run.

pub mod sign_ins;

pub use sign_ins::SignInReport;
