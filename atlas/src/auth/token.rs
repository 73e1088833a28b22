//! Signed bearer tokens (JWT, HS256).
//!
//! Access and refresh tokens are signed with distinct secrets so that a leaked
//! access secret cannot mint refresh tokens. Verification checks structure and
//! signature only; the embedded `exp` claim is not enforced here. Refresh token
//! expiry is enforced through the stored session instead.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::config::Config;
use tracing::{debug, warn};
use uuid::Uuid;

use super::duration::parse_duration;
use super::error::TokenError;

/// Access token lifetime when the configured duration is unusable: 15 minutes.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;

/// Refresh token lifetime when the configured duration is unusable: 30 days.
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// Random per token, so two tokens minted in the same second still differ.
    pub jti: String,
}

impl TokenClaims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }
}

/// A freshly signed token and the window it was signed for.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Sign a token for `subject` valid for `ttl` from now.
pub fn issue_token(subject: &str, secret: &[u8], ttl: Duration) -> Result<IssuedToken, TokenError> {
    let issued_at = Utc::now();
    let expires_at = issued_at + ttl;

    let claims = TokenClaims {
        sub: subject.to_string(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))?;

    Ok(IssuedToken {
        token,
        issued_at,
        expires_at,
    })
}

/// Verify structure and signature, returning the embedded claims.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<TokenClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;

    decode::<TokenClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed(e.to_string()),
        })
}

/// Secrets and lifetimes for both token classes.
#[derive(Clone)]
pub struct TokenSettings {
    access_secret: Vec<u8>,
    refresh_secret: Vec<u8>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenSettings {
    pub fn new(
        access_secret: impl Into<Vec<u8>>,
        refresh_secret: impl Into<Vec<u8>>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Resolve secrets and lifetimes from configuration. Duration strings that
    /// do not parse fall back to 15 minutes (access) and 30 days (refresh).
    pub fn from_config(config: &Config) -> Self {
        let access_ttl = resolve_ttl(
            &config.jwt_access_expires,
            Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            "JWT_ACCESS_EXPIRES",
        );
        let refresh_ttl = resolve_ttl(
            &config.jwt_refresh_expires,
            Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
            "JWT_REFRESH_EXPIRES",
        );

        Self::new(
            config.jwt_access_secret.as_bytes(),
            config.jwt_refresh_secret.as_bytes(),
            access_ttl,
            refresh_ttl,
        )
    }

    pub fn ttl(&self, class: TokenClass) -> Duration {
        match class {
            TokenClass::Access => self.access_ttl,
            TokenClass::Refresh => self.refresh_ttl,
        }
    }

    fn secret(&self, class: TokenClass) -> &[u8] {
        match class {
            TokenClass::Access => &self.access_secret,
            TokenClass::Refresh => &self.refresh_secret,
        }
    }
}

/// Parse a configured lifetime, falling back on anything unusable.
///
/// Deliberately wider than a parse-error fallback: zero also falls back, as
/// does a negative value (`parse_duration` rejects a leading `-`).
fn resolve_ttl(raw: &str, fallback: Duration, var: &str) -> Duration {
    match parse_duration(raw) {
        Some(ttl) if ttl > Duration::zero() => ttl,
        _ if raw.is_empty() => {
            debug!("{} not set, using default of {}s", var, fallback.num_seconds());
            fallback
        }
        _ => {
            warn!(
                "{}={:?} is not a usable duration, using default of {}s",
                var,
                raw,
                fallback.num_seconds()
            );
            fallback
        }
    }
}

/// Issues and verifies tokens, picking the secret by token class.
#[derive(Clone)]
pub struct TokenCodec {
    settings: TokenSettings,
}

impl TokenCodec {
    pub fn new(settings: TokenSettings) -> Self {
        Self { settings }
    }

    pub fn issue(&self, subject: &str, class: TokenClass) -> Result<IssuedToken, TokenError> {
        issue_token(subject, self.settings.secret(class), self.settings.ttl(class))
    }

    pub fn verify(&self, token: &str, class: TokenClass) -> Result<TokenClaims, TokenError> {
        verify_token(token, self.settings.secret(class))
    }
}
