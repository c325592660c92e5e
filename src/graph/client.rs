//! Blocking Microsoft Graph client

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;

use super::auth::AccessToken;
use super::fetch::{SignInQuery, SignInSource};
use crate::error::{AuditError, AuditResult};
use crate::models::SignInPage;

/// Graph error envelope: `{ "error": { "code": ..., "message": ... } }`
#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: GraphErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GraphErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Sign-in source backed by the Graph REST API
pub struct GraphClient {
    http: Client,
    base_url: String,
    token: AccessToken,
}

impl GraphClient {
    /// Build a client for `base_url` (e.g. `https://graph.microsoft.com/v1.0`)
    pub fn new(base_url: &str, token: AccessToken, timeout: Duration) -> AuditResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("signin-audit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuditError::Client(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// URL of the signIns collection
    pub fn sign_ins_url(&self) -> String {
        format!("{}/auditLogs/signIns", self.base_url)
    }

    fn read_page(&self, response: Response) -> AuditResult<SignInPage> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<SignInPage>()
                .map_err(|e| AuditError::Fetch(format!("Failed to decode sign-in page: {}", e)));
        }

        let body = response.text().unwrap_or_default();
        Err(error_for_status(status, &body))
    }
}

impl SignInSource for GraphClient {
    fn first_page(&self, query: &SignInQuery) -> AuditResult<SignInPage> {
        let url = self.sign_ins_url();
        tracing::debug!(%url, filter = %query.filter_expression(), "Requesting first sign-in page");

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token.secret()))
            .header(ACCEPT, "application/json")
            .query(&[
                ("$filter", query.filter_expression()),
                ("$top", query.page_size.to_string()),
            ])
            .send()
            .map_err(|e| AuditError::Fetch(format!("Request to {} failed: {}", url, e)))?;

        self.read_page(response)
    }

    fn next_page(&self, next_link: &str) -> AuditResult<SignInPage> {
        tracing::debug!("Following continuation cursor");

        let response = self
            .http
            .get(next_link)
            .header(AUTHORIZATION, format!("Bearer {}", self.token.secret()))
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| AuditError::Fetch(format!("Request for next page failed: {}", e)))?;

        self.read_page(response)
    }
}

/// Map a non-success response to an error, preferring Graph's own message
fn error_for_status(status: StatusCode, body: &str) -> AuditError {
    let detail = serde_json::from_str::<GraphErrorBody>(body)
        .ok()
        .map(|b| b.error);

    let message = match &detail {
        Some(GraphErrorDetail {
            code: Some(code),
            message: Some(message),
        }) => format!("{}: {}", code, message),
        Some(GraphErrorDetail {
            message: Some(message),
            ..
        }) => message.clone(),
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string(),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AuditError::Auth(format!("Graph rejected the token ({}): {}", status.as_u16(), message))
        }
        _ => AuditError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
