//! Session - explicit auth context handed to the gateway
//!
//! The token is opaque to this crate. Claims are decoded without signature
//! verification and are for display only, never for authorization.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;

use crate::{ClientError, ClientResult};

/// Display fields carried in the access token payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Lower-cased on decode
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub exp: Option<u64>,
}

/// Authenticated (or anonymous) session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// Session without credentials; mutating calls go out unauthenticated
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Set on login
    pub fn login(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Cleared on logout
    pub fn logout(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Decode the JWT payload (header.payload.signature) without verifying it
    pub fn claims(&self) -> ClientResult<Option<TokenClaims>> {
        let Some(token) = self.token.as_deref() else {
            return Ok(None);
        };

        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(ClientError::Session("token is not a JWT".into()));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(parts[1].trim_end_matches('='))
            .map_err(|e| ClientError::Session(format!("bad token payload: {e}")))?;
        let mut claims: TokenClaims = serde_json::from_slice(&payload)?;
        claims.role = claims.role.to_lowercase();
        Ok(Some(claims))
    }

    /// Expired according to the unverified `exp` claim
    ///
    /// Tokens without `exp`, or that cannot be decoded, are not considered expired.
    pub fn is_expired(&self, now_unix: u64) -> bool {
        matches!(self.claims(), Ok(Some(TokenClaims { exp: Some(exp), .. })) if exp <= now_unix)
    }
}

#[cfg(test)]
pub(crate) fn fake_jwt(payload: &str) -> String {
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload)
    )
}
