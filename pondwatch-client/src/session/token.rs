//! Offline decoding of the bearer token's claims.
//!
//! The token is a JWT-shaped `header.payload.signature` string. Only the
//! payload is read, and the signature is never checked: the claims are used
//! for display until the backend confirms the profile.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::UserId;

/// Reasons a token could not be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not made of three dot-separated segments")]
    Malformed,

    #[error("token payload is not base64url: {0}")]
    Base64(String),

    #[error("token payload is not valid claims JSON: {0}")]
    Json(String),
}

/// Identity claims carried in the token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, alias = "id", alias = "userId")]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Expiry as seconds since the Unix epoch, if present.
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode the claims segment of `token`.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    if payload.is_empty() {
        return Err(TokenError::Malformed);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::Base64(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| TokenError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "eyJhbGciOiJIUzI1NiJ9.{}.signature",
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn decodes_claims() {
        let token =
            token_with_payload(r#"{"id":42,"email":"sari@tambak.id","role":"user","exp":1}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.user_id, Some(UserId::Number(42)));
        assert_eq!(claims.email.as_deref(), Some("sari@tambak.id"));
        assert_eq!(claims.role.as_deref(), Some("user"));
    }

    #[test]
    fn decodes_non_ascii_payload() {
        let token = token_with_payload(r#"{"userId":"u-1","email":"dévi@tambak.id"}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.user_id, Some(UserId::Text("u-1".into())));
        assert_eq!(claims.email.as_deref(), Some("dévi@tambak.id"));
    }

    #[test]
    fn tolerates_padding() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"id":1}"#);
        let token = format!("h.{}.s", payload);
        assert!(decode_claims(&token).is_ok());
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert_eq!(decode_claims("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(decode_claims("a.b"), Err(TokenError::Malformed));
        assert_eq!(decode_claims("a.b.c.d"), Err(TokenError::Malformed));
        assert_eq!(decode_claims("a..c"), Err(TokenError::Malformed));
    }

    #[test]
    fn rejects_bad_base64() {
        assert!(matches!(
            decode_claims("h.!!!!.s"),
            Err(TokenError::Base64(_))
        ));
    }

    #[test]
    fn rejects_non_json_payload() {
        let token = token_with_payload("plain text");
        assert!(matches!(decode_claims(&token), Err(TokenError::Json(_))));
    }
}
