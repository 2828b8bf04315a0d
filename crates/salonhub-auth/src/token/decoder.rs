//! Token decoding with optional signature verification.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use salonhub_core::config::SessionConfig;
use salonhub_core::error::AppError;
use salonhub_core::result::AppResult;

use super::claims::{Claims, DecodedToken};
use crate::error::AuthError;
use crate::session::Identity;

/// Decodes bearer tokens into claims and identities.
///
/// Without a verification secret the payload is read as-is, the same way a
/// browser client reads its JWT. With a secret, HMAC signatures are checked
/// before the claims are trusted.
#[derive(Clone)]
pub struct TokenDecoder {
    /// Signature verification, when a secret is configured.
    verifier: Option<Verifier>,
    /// Tolerated clock skew for expiry checks.
    leeway: Duration,
}

#[derive(Clone)]
struct Verifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("verifies_signature", &self.verifier.is_some())
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl TokenDecoder {
    /// Creates a decoder from session configuration.
    ///
    /// Fails when `clock_leeway_seconds` is too large to represent.
    pub fn new(config: &SessionConfig) -> AppResult<Self> {
        let leeway = i64::try_from(config.clock_leeway_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "session.clock_leeway_seconds {} is out of range",
                    config.clock_leeway_seconds
                ))
            })?;

        Ok(match config.verification_secret.as_deref() {
            Some(secret) => Self::verifying(secret.as_bytes(), leeway),
            None => Self {
                verifier: None,
                leeway,
            },
        })
    }

    /// Creates a decoder that does not check signatures.
    pub fn unverified() -> Self {
        Self {
            verifier: None,
            leeway: Duration::zero(),
        }
    }

    /// Creates a decoder that checks HMAC signatures against `secret`.
    pub fn verifying(secret: &[u8], leeway: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // Expiry is checked by the session so it can tell expired from malformed.
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            verifier: Some(Verifier {
                key: DecodingKey::from_secret(secret),
                validation,
            }),
            leeway,
        }
    }

    /// Returns the configured clock leeway.
    pub fn leeway(&self) -> Duration {
        self.leeway
    }

    /// Decodes a token into claims and identity.
    ///
    /// Does not reject expired tokens; use [`TokenDecoder::is_expired`].
    pub fn decode(&self, token: &str) -> Result<DecodedToken, AuthError> {
        let claims = match &self.verifier {
            Some(verifier) => decode_verified(token, verifier)?,
            None => decode_unverified(token)?,
        };

        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AuthError::Malformed(format!("exp {} is out of range", claims.exp)))?;
        let identity = Identity::from_claims(&claims)?;

        Ok(DecodedToken {
            claims,
            identity,
            expires_at,
        })
    }

    /// Checks whether a decoded token is expired at `now`.
    pub fn is_expired(&self, token: &DecodedToken, now: DateTime<Utc>) -> bool {
        token.is_expired_at(now, self.leeway)
    }
}

fn decode_verified(token: &str, verifier: &Verifier) -> Result<Claims, AuthError> {
    decode::<Claims>(token, &verifier.key, &verifier.validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::Malformed(e.to_string()),
        })
}

fn decode_unverified(token: &str) -> Result<Claims, AuthError> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::Malformed(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let header = decode_segment(header, "header")?;
    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(&header)
        .map_err(|e| AuthError::Malformed(format!("header is not a JSON object: {e}")))?;

    let payload = decode_segment(payload, "payload")?;
    serde_json::from_slice::<Claims>(&payload)
        .map_err(|e| AuthError::Malformed(format!("claims could not be read: {e}")))
}

fn decode_segment(segment: &str, what: &str) -> Result<Vec<u8>, AuthError> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| AuthError::Malformed(format!("{what} is not base64url: {e}")))
}
