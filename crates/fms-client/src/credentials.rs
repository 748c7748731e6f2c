use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::error::ClientError;

/// Tokens issued by the FMS login endpoint.
///
/// Replaced whole on refresh; never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// `data.token`, sent as `fms-token`.
    pub primary_token: String,
    /// `data.third_party_token` (or `data.thirdPartyToken`), sent as `Authorization`.
    pub secondary_token: Option<String>,
    pub obtained_at: DateTime<Utc>,
}

impl Credentials {
    /// Parse a login response body.
    pub fn from_login_response(body: &Value, now: DateTime<Utc>) -> Result<Self, ClientError> {
        let data = body.get("data").unwrap_or(&Value::Null);
        let token_at = |key: &str| {
            data.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let primary_token = token_at("token")
            .ok_or_else(|| ClientError::Auth("login succeeded but data.token is missing".into()))?;
        let secondary_token = token_at("third_party_token").or_else(|| token_at("thirdPartyToken"));

        Ok(Self {
            primary_token,
            secondary_token,
            obtained_at: now,
        })
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.obtained_at).to_std() {
            Ok(age) => age < ttl,
            // obtained_at in the future: clock went backwards, treat as stale.
            Err(_) => false,
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> &str {
        self.secondary_token.as_deref().unwrap_or(&self.primary_token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("primary_token", &"<redacted>")
            .field("secondary_token", &self.secondary_token.as_ref().map(|_| "<redacted>"))
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}
