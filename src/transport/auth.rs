//! Signed bearer tokens.
//!
//! The platform key has the form `<id>.<secret>`. Each request carries a
//! fresh HS256 token whose claims name the key id and the signing time in
//! milliseconds.

use jwt_compact::alg::{Hs256, Hs256Key};
use jwt_compact::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{Error, Result};

/// Validity window written into every token.
pub const TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Platform API key split into id and secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    id: String,
    secret: String,
}

impl ApiKey {
    /// Parse `<id>.<secret>`, splitting on the first dot.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::ApiKeyMissing);
        }
        match raw.split_once('.') {
            Some((id, secret)) => Ok(Self {
                id: id.to_string(),
                secret: secret.to_string(),
            }),
            None => Err(Error::ApiKeyMalformed),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SignTypeFields {
    sign_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub api_key: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Milliseconds since the Unix epoch.
    pub exp: i64,
}

/// Sign a token for `key` as of `now`.
pub fn sign_token(key: &ApiKey, now: SystemTime) -> Result<String> {
    let timestamp = now
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Signing(e.to_string()))?
        .as_millis() as i64;

    let header = Header::new(SignTypeFields { sign_type: "SIGN" });
    let claims = Claims::new(TokenClaims {
        api_key: key.id.clone(),
        timestamp,
        exp: timestamp + TOKEN_TTL.as_millis() as i64,
    });
    let signing_key = Hs256Key::new(key.secret.as_bytes());

    Hs256
        .token(&header, &claims, &signing_key)
        .map_err(|e| Error::Signing(e.to_string()))
}
