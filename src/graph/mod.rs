//! Microsoft Graph access
//!
//! - `auth`: bearer token wrapper and claim checks
//! - `fetch`: the paginated fetch loop and its transport trait
//! - `client`: the reqwest-backed transport

pub mod auth;
pub mod client;
pub mod fetch;

pub use auth::{AccessToken, TokenClaims, REQUIRED_SCOPES};
pub use client::GraphClient;
pub use fetch::{fetch_sign_ins, SignInQuery, SignInSource};
