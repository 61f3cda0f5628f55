//! HS256 tokens for the FT on-site notification widget.
//!
//! The widget authenticates players with a compact JWT:
//!
//! ```text
//! base64url(header) . base64url(claims) . base64url(HMAC-SHA256(signing_input, secret))
//! ```
//!
//! `iat` is backdated by [`CLOCK_DRIFT_ALLOWANCE`] seconds and the token
//! lives for [`TOKEN_LIFETIME`] seconds.

use serde::{Deserialize, Serialize};

/// Seconds `iat` is moved into the past to tolerate clock drift.
pub const CLOCK_DRIFT_ALLOWANCE: i64 = 60;

/// Token lifetime in seconds.
pub const TOKEN_LIFETIME: i64 = 60 * 60;

/// Secret used when neither the player nor the platform configured one.
pub const FALLBACK_SECRET: &str = "your-256-bit-secret";

/// Errors produced by token operations.
#[derive(Debug, thiserror::Error)]
pub enum WidgetTokenError {
    #[error("invalid token format")]
    InvalidFormat,
    #[error("invalid base64 encoding")]
    InvalidBase64,
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported algorithm")]
    UnsupportedAlgorithm,
    #[error("invalid signature")]
    SignatureMismatch,
    #[error("token expired")]
    Expired,
}

impl From<ring::error::Unspecified> for WidgetTokenError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Claims carried by a widget token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetClaims {
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
}

impl WidgetClaims {
    /// Claims for `user_id` issued at `now` (unix seconds).
    pub fn issue(user_id: impl Into<String>, now: i64) -> Self {
        Self {
            user_id: user_id.into(),
            iat: now - CLOCK_DRIFT_ALLOWANCE,
            exp: now + TOKEN_LIFETIME,
        }
    }
}

fn encode_part<T: Serialize>(part: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(part)?;
    Ok(fast32::base64::RFC4648_URL_NOPAD.encode(&json))
}

fn decode_part(part: &str) -> Result<Vec<u8>, WidgetTokenError> {
    fast32::base64::RFC4648_URL_NOPAD
        .decode_str(part)
        .map_err(|_| WidgetTokenError::InvalidBase64)
}

fn hmac_key(secret: &[u8]) -> ring::hmac::Key {
    ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret)
}

/// Sign `claims` into a compact HS256 token.
pub fn sign(claims: &WidgetClaims, secret: &[u8]) -> Result<String, serde_json::Error> {
    let header = Header {
        alg: "HS256".to_string(),
        typ: "JWT".to_string(),
    };
    let signing_input = format!("{}.{}", encode_part(&header)?, encode_part(claims)?);
    let signature = ring::hmac::sign(&hmac_key(secret), signing_input.as_bytes());
    Ok(format!(
        "{}.{}",
        signing_input,
        fast32::base64::RFC4648_URL_NOPAD.encode(signature.as_ref())
    ))
}

/// Verify a token's signature and expiry against `now` (unix seconds).
pub fn verify(token: &str, secret: &[u8], now: i64) -> Result<WidgetClaims, WidgetTokenError> {
    let mut parts = token.split('.');
    let (Some(header), Some(claims), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(WidgetTokenError::InvalidFormat);
    };

    let parsed_header: Header = serde_json::from_slice(&decode_part(header)?)?;
    if parsed_header.alg != "HS256" {
        return Err(WidgetTokenError::UnsupportedAlgorithm);
    }

    let signing_input = format!("{header}.{claims}");
    ring::hmac::verify(
        &hmac_key(secret),
        signing_input.as_bytes(),
        &decode_part(signature)?,
    )?;

    let claims: WidgetClaims = serde_json::from_slice(&decode_part(claims)?)?;
    if claims.exp <= now {
        return Err(WidgetTokenError::Expired);
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_window() {
        let claims = WidgetClaims::issue("test-user", 1_700_000_000);
        assert_eq!(claims.iat, 1_700_000_000 - 60);
        assert_eq!(claims.exp, 1_700_000_000 + 3600);
    }

    #[test]
    fn test_sign_and_verify() {
        let now = 1_700_000_000;
        let claims = WidgetClaims::issue("test-user", now);
        let token = sign(&claims, b"secret").unwrap();
        assert_eq!(token.split('.').count(), 3);

        let verified = verify(&token, b"secret", now).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn test_verify_rejects_wrong_secret_and_expired() {
        let now = 1_700_000_000;
        let token = sign(&WidgetClaims::issue("test-user", now), b"secret").unwrap();

        assert!(matches!(
            verify(&token, b"other", now),
            Err(WidgetTokenError::SignatureMismatch)
        ));
        assert!(matches!(
            verify(&token, b"secret", now + TOKEN_LIFETIME + 1),
            Err(WidgetTokenError::Expired)
        ));
        assert!(matches!(
            verify("not-a-token", b"secret", now),
            Err(WidgetTokenError::InvalidFormat)
        ));
    }
}
