//! Bearer credential codec.
//!
//! A credential is `header.payload.signature`; the payload is base64url JSON with at least
//! a numeric `exp` (seconds since epoch). The client never verifies the signature: the
//! backend is the only party that trusts or rejects a credential, this module only tells
//! whether the payload is readable and not yet expired.
//!
//! Decoding is all-or-nothing. A payload either yields a complete [`Claims`] value or an
//! [`Error`]; identity claims that are missing are filled with the fallbacks documented
//! in [`crate::identity`].

use crate::identity::{lenient_role, Identity, Role};
use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid token format")]
    TokenFormat,
    #[error("invalid base64url encoding")]
    Base64,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
    #[error("missing expiration")]
    MissingExpiry,
    #[error("token expired at {exp} (now {now})")]
    Expired { exp: i64, now: i64 },
}

impl Error {
    /// True when the payload decoded but the expiry has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, Error::Expired { .. })
    }
}

/// Decoded credential payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub exp: i64,
    pub subject: Option<String>,
    pub username: Option<String>,
    pub role: Option<Role>,
}

impl Claims {
    /// A credential is valid only while `exp` is strictly in the future.
    #[must_use]
    pub fn is_expired(&self, now_unix: i64) -> bool {
        self.exp <= now_unix
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(self.subject.clone(), self.username.clone(), self.role)
    }
}

#[derive(Deserialize)]
struct RawClaims {
    #[serde(default, deserialize_with = "numeric_date")]
    exp: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "lenient_string")]
    object_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    sub: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    username: Option<String>,
    #[serde(default, deserialize_with = "lenient_role")]
    role: Option<Role>,
}

fn numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|seconds| seconds.floor() as i64))
            .map(Some)
            .ok_or_else(|| de::Error::custom("exp out of range")),
        Some(_) => Err(de::Error::custom("exp must be numeric")),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) if !value.trim().is_empty() => Some(value),
        Some(Value::Number(value)) => Some(value.to_string()),
        _ => None,
    })
}

fn b64d_json<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, Error> {
    let bytes = Base64UrlUnpadded::decode_vec(segment.trim_end_matches('='))
        .map_err(|_| Error::Base64)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Decode the payload of a three-segment credential.
///
/// # Errors
/// Returns an error if the credential does not have exactly three non-empty segments,
/// the payload is not base64url JSON, or `exp` is missing or not numeric.
pub fn decode(token: &str) -> Result<Claims, Error> {
    let mut segments = token.trim().split('.');
    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(Error::TokenFormat);
    };

    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return Err(Error::TokenFormat);
    }

    let raw: RawClaims = b64d_json(payload)?;
    let exp = raw.exp.ok_or(Error::MissingExpiry)?;

    Ok(Claims {
        exp,
        subject: raw.id.or(raw.object_id).or(raw.sub),
        username: raw.username,
        role: raw.role,
    })
}

/// Decode a credential and reject it if it has expired at `now_unix`.
///
/// # Errors
/// Returns [`Error::Expired`] for an expired credential, or any [`decode`] error.
pub fn validate(token: &str, now_unix: i64) -> Result<Claims, Error> {
    let claims = decode(token)?;
    if claims.is_expired(now_unix) {
        return Err(Error::Expired {
            exp: claims.exp,
            now: now_unix,
        });
    }
    Ok(claims)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn token_with(payload: &Value) -> String {
        let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = Base64UrlUnpadded::encode_string(payload.to_string().as_bytes());
        format!("{header}.{body}.c2lnbmF0dXJl")
    }

    #[test]
    fn test_decode_reads_identity_claims() {
        let token = token_with(&json!({
            "id": "64f1c0",
            "username": "alice",
            "role": "superadmin",
            "exp": NOW + 3600
        }));

        let claims = decode(&token).unwrap();
        assert_eq!(claims.exp, NOW + 3600);
        assert_eq!(claims.subject.as_deref(), Some("64f1c0"));
        assert_eq!(claims.username.as_deref(), Some("alice"));
        assert_eq!(claims.role, Some(Role::SuperAdmin));
        assert!(claims.identity().is_super_admin());
    }

    #[test]
    fn test_decode_falls_back_to_sub_and_placeholder() {
        let claims = decode(&token_with(&json!({ "sub": "u-1", "exp": NOW }))).unwrap();
        assert_eq!(claims.subject.as_deref(), Some("u-1"));

        let claims = decode(&token_with(&json!({ "exp": NOW }))).unwrap();
        let identity = claims.identity();
        assert_eq!(identity.id, crate::identity::PLACEHOLDER_SUBJECT);
        assert_eq!(identity.role, None);
    }

    #[test]
    fn test_decode_accepts_fractional_exp() {
        let claims = decode(&token_with(&json!({ "exp": 1_700_000_000.75 }))).unwrap();
        assert_eq!(claims.exp, NOW);
    }

    #[test]
    fn test_decode_rejects_wrong_segment_count() {
        assert!(matches!(decode("abc"), Err(Error::TokenFormat)));
        assert!(matches!(decode("a.b"), Err(Error::TokenFormat)));
        assert!(matches!(decode("a.b.c.d"), Err(Error::TokenFormat)));
        assert!(matches!(decode("a..c"), Err(Error::TokenFormat)));
        assert!(matches!(decode(""), Err(Error::TokenFormat)));
    }

    #[test]
    fn test_decode_rejects_garbage_payload() {
        assert!(matches!(decode("a.!!!.c"), Err(Error::Base64)));

        let not_json = Base64UrlUnpadded::encode_string(b"not json");
        assert!(matches!(
            decode(&format!("a.{not_json}.c")),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_decode_requires_numeric_exp() {
        assert!(matches!(
            decode(&token_with(&json!({ "username": "alice" }))),
            Err(Error::MissingExpiry)
        ));
        assert!(matches!(
            decode(&token_with(&json!({ "exp": "tomorrow" }))),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_validate_treats_exp_equal_to_now_as_expired() {
        let token = token_with(&json!({ "exp": NOW }));
        let err = validate(&token, NOW).unwrap_err();
        assert!(err.is_expired());

        assert!(validate(&token, NOW - 1).is_ok());
    }

    #[test]
    fn test_validate_rejects_past_exp() {
        let token = token_with(&json!({ "exp": NOW - 10 }));
        match validate(&token, NOW) {
            Err(Error::Expired { exp, now }) => {
                assert_eq!(exp, NOW - 10);
                assert_eq!(now, NOW);
            }
            other => panic!("expected expiry error, got {other:?}"),
        }
    }
}
