//! signin-audit - legacy-client sign-in reporting for Microsoft Entra ID
//!
//! This library fetches sign-in events for one application identifier from
//! the Microsoft Graph audit log, flattens them into report rows and writes
//! CSV and sortable HTML reports.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Raw Graph entries, report rows, date ranges
//! - `graph`: Access token handling and the paginated fetcher
//! - `services`: Row transformation and filtering
//! - `reports`: The end-to-end report pipeline
//! - `export`: CSV, HTML and JSON writers
//! - `display`: Terminal output
//! - `cli`: Command handlers and input prompts
//!
//! # Example
//!
//! ```rust,ignore
//! use signin_audit::graph::{AccessToken, GraphClient, SignInQuery};
//! use signin_audit::reports::SignInReport;
//!
//! let client = GraphClient::new(&settings.graph_base_url, token, timeout)?;
//! let report = SignInReport::generate(&client, &query, Some("megan"))?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod graph;
pub mod models;
pub mod reports;
pub mod services;

pub use error::{AuditError, AuditResult};
