//! Access token handling
//!
//! The reporter never performs an OAuth flow itself; it is handed a bearer
//! token. When that token is a JWT its claims are inspected so an expired or
//! under-scoped token fails before the first request.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{AuditError, AuditResult};

/// Read permissions the signIns query needs
pub const REQUIRED_SCOPES: [&str; 3] = ["AuditLog.Read.All", "Directory.Read.All", "User.Read.All"];

/// Claims the reporter reads from a Graph access token
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub upn: Option<String>,
    #[serde(default)]
    pub unique_name: Option<String>,
    #[serde(default)]
    pub app_displayname: Option<String>,
    #[serde(default)]
    pub tid: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    /// Delegated permissions, space-separated
    #[serde(default)]
    pub scp: Option<String>,
    /// Application permissions
    #[serde(default)]
    pub roles: Vec<String>,
}

impl TokenClaims {
    /// Human-readable identity of whoever the token was issued to
    pub fn identity(&self) -> Option<&str> {
        self.upn
            .as_deref()
            .or(self.unique_name.as_deref())
            .or(self.app_displayname.as_deref())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Granted permissions from either `scp` or `roles`
    pub fn permissions(&self) -> Vec<&str> {
        let mut granted: Vec<&str> = self
            .scp
            .as_deref()
            .map(|scp| scp.split_whitespace().collect())
            .unwrap_or_default();
        granted.extend(self.roles.iter().map(String::as_str));
        granted
    }

    /// Required scopes absent from the token
    pub fn missing_scopes(&self) -> Vec<&'static str> {
        let granted = self.permissions();
        REQUIRED_SCOPES
            .iter()
            .copied()
            .filter(|required| !granted.iter().any(|g| grants(g, required)))
            .collect()
    }
}

/// Whether a granted permission satisfies a required one
///
/// `X.ReadWrite.All` includes `X.Read.All`. Comparison ignores case.
fn grants(granted: &str, required: &str) -> bool {
    if granted.eq_ignore_ascii_case(required) {
        return true;
    }
    match required.strip_suffix(".Read.All") {
        Some(resource) => granted.eq_ignore_ascii_case(&format!("{}.ReadWrite.All", resource)),
        None => false,
    }
}

/// A bearer token, wiped from memory on drop
pub struct AccessToken {
    secret: Zeroizing<String>,
    claims: Option<TokenClaims>,
}

impl AccessToken {
    /// Wrap a raw token string, decoding JWT claims when present
    pub fn new(raw: impl Into<String>) -> AuditResult<Self> {
        let mut raw: String = raw.into();
        let secret = Zeroizing::new(raw.trim().to_string());
        raw.zeroize();
        if secret.is_empty() {
            return Err(AuditError::Auth("Access token is empty".into()));
        }
        let claims = decode_claims(&secret);
        Ok(Self { secret, claims })
    }

    /// The bearer value for the Authorization header
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Decoded claims, `None` for opaque tokens
    pub fn claims(&self) -> Option<&TokenClaims> {
        self.claims.as_ref()
    }

    /// Fail fast on an expired or under-privileged token
    pub fn validate(&self, now: DateTime<Utc>) -> AuditResult<()> {
        let Some(claims) = &self.claims else {
            tracing::warn!("Access token is not a JWT; skipping expiry and scope checks");
            return Ok(());
        };

        if let Some(expires_at) = claims.expires_at() {
            if expires_at <= now {
                return Err(AuditError::Auth(format!(
                    "Access token expired at {}",
                    expires_at.format("%Y-%m-%d %H:%M:%S UTC")
                )));
            }
        }

        let missing = claims.missing_scopes();
        if !missing.is_empty() {
            return Err(AuditError::Auth(format!(
                "Access token is missing required permissions: {}",
                missing.join(", ")
            )));
        }

        tracing::info!(
            identity = claims.identity().unwrap_or("unknown"),
            tenant = claims.tid.as_deref().unwrap_or("unknown"),
            "Authenticated to Microsoft Graph"
        );
        Ok(())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Decode the payload segment of a JWT
fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Read a token interactively without echoing it
pub fn prompt_token() -> AuditResult<AccessToken> {
    let raw = rpassword::prompt_password("Graph access token: ")
        .map_err(|e| AuditError::Auth(format!("Failed to read access token: {}", e)))?;
    AccessToken::new(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.sig", header, payload)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_delegated_token_with_all_scopes() {
        let raw = jwt(serde_json::json!({
            "upn": "admin@contoso.com",
            "exp": now().timestamp() + 3600,
            "scp": "AuditLog.Read.All Directory.Read.All User.Read.All openid"
        }));
        let token = AccessToken::new(raw).unwrap();

        assert_eq!(token.claims().unwrap().identity(), Some("admin@contoso.com"));
        assert!(token.validate(now()).is_ok());
    }

    #[test]
    fn test_application_roles_count_as_scopes() {
        let raw = jwt(serde_json::json!({
            "app_displayname": "audit-runner",
            "roles": ["AuditLog.Read.All", "Directory.Read.All", "User.Read.All"]
        }));
        let token = AccessToken::new(raw).unwrap();
        assert!(token.validate(now()).is_ok());
    }

    #[test]
    fn test_expired_token_rejected() {
        let raw = jwt(serde_json::json!({
            "exp": now().timestamp() - 1,
            "scp": "AuditLog.Read.All Directory.Read.All User.Read.All"
        }));
        let err = AccessToken::new(raw).unwrap().validate(now()).unwrap_err();
        assert!(err.is_auth());
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_missing_scopes_listed() {
        let raw = jwt(serde_json::json!({ "scp": "AuditLog.Read.All" }));
        let err = AccessToken::new(raw).unwrap().validate(now()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Directory.Read.All"));
        assert!(message.contains("User.Read.All"));
        assert!(!message.contains("AuditLog.Read.All,"));
    }

    #[test]
    fn test_readwrite_scopes_satisfy_read() {
        let raw = jwt(serde_json::json!({
            "upn": "admin@contoso.com",
            "scp": "AuditLog.Read.All Directory.ReadWrite.All user.readwrite.all"
        }));
        let token = AccessToken::new(raw).unwrap();
        assert!(token.claims().unwrap().missing_scopes().is_empty());
        assert!(token.validate(now()).is_ok());

        let roles = jwt(serde_json::json!({
            "roles": ["AuditLog.ReadWrite.All", "Directory.Read.All", "User.Read.All"]
        }));
        assert!(AccessToken::new(roles).unwrap().validate(now()).is_ok());
    }

    #[test]
    fn test_unrelated_write_scope_does_not_satisfy_read() {
        let raw = jwt(serde_json::json!({
            "scp": "AuditLog.Read.All Directory.Read.All Mail.ReadWrite.All User.Read"
        }));
        let claims = AccessToken::new(raw).unwrap().claims().cloned().unwrap();
        assert_eq!(claims.missing_scopes(), vec!["User.Read.All"]);
    }

    #[test]
    fn test_opaque_token_skips_checks() {
        let token = AccessToken::new("EwBwA8l6BAAU-opaque").unwrap();
        assert!(token.claims().is_none());
        assert!(token.validate(now()).is_ok());
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(AccessToken::new("   ").unwrap_err().is_auth());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let token = AccessToken::new("super-secret-value").unwrap();
        assert!(!format!("{:?}", token).contains("super-secret-value"));
    }
}
