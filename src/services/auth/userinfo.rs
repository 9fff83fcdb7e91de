//! `X-Userinfo` decoding (base64 -> JSON -> IdentityRecord).
//!
//! Responsibility:
//! - Turn the upstream-asserted identity header into a typed `IdentityRecord`
//! - Classify failures as missing / bad encoding / bad JSON
//!
//! Trust model:
//! - The header is NOT signed. It is only trustworthy when this service is reachable
//!   exclusively through the gateway that introspects the token and sets the header.
//!   Anything that can reach this service directly can impersonate any principal.
//! - `active` is not checked here; see `IdentityRecord::ensure_active`.

use axum::http::{HeaderName, HeaderValue};
use base64::{
    Engine as _, alphabet,
    engine::{GeneralPurpose, general_purpose},
};
use serde::{Deserialize, de};
use serde_json::Value;
use thiserror::Error;

use super::scopes::ScopeSet;

pub const X_USERINFO: HeaderName = HeaderName::from_static("x-userinfo");

// Standard alphabet, padding required, non-zero trailing bits in the last symbol tolerated.
const USERINFO_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    general_purpose::PAD.with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing user info")]
    Missing,
    #[error("invalid user info format")]
    InvalidFormat,
    #[error("invalid user info JSON")]
    InvalidJson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("token is not active")]
pub struct InactiveIdentity;

/// Wire shape of the decoded header (token introspection response subset).
///
/// Missing and `null` fields both fall back to the zero value.
#[derive(Debug, Default, Deserialize)]
struct UserInfoClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    active: Option<bool>,
}

/// Parsed identity of the caller. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    subject: String,
    scopes: ScopeSet,
    client_id: String,
    active: bool,
}

impl IdentityRecord {
    pub fn new(
        subject: impl Into<String>,
        scopes: ScopeSet,
        client_id: impl Into<String>,
        active: bool,
    ) -> Self {
        Self {
            subject: subject.into(),
            scopes,
            client_id: client_id.into(),
            active,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn scopes(&self) -> &ScopeSet {
        &self.scopes
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn ensure_active(self) -> Result<Self, InactiveIdentity> {
        if self.is_active() {
            Ok(self)
        } else {
            Err(InactiveIdentity)
        }
    }

    /// (subject, scopes, client_id)
    pub fn into_parts(self) -> (String, ScopeSet, String) {
        (self.subject, self.scopes, self.client_id)
    }
}

impl From<UserInfoClaims> for IdentityRecord {
    fn from(c: UserInfoClaims) -> Self {
        Self::new(
            c.sub.unwrap_or_default(),
            ScopeSet::parse(&c.scope.unwrap_or_default()),
            c.client_id.unwrap_or_default(),
            c.active.unwrap_or_default(),
        )
    }
}

// Parsed through `Value` first: a repeated key keeps its last value, and a bare `null`
// document yields all-zero claims. Arrays are rejected here, since derived structs
// would otherwise accept them positionally.
fn parse_claims(bytes: &[u8]) -> Result<UserInfoClaims, serde_json::Error> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Null => Ok(UserInfoClaims::default()),
        object @ Value::Object(_) => serde_json::from_value(object),
        _ => Err(de::Error::custom("user info must be a JSON object")),
    }
}

/// Decode the raw `X-Userinfo` header value.
///
/// Steps short-circuit in order: presence -> base64 -> JSON.
pub fn decode(raw: Option<&HeaderValue>) -> Result<IdentityRecord, DecodeError> {
    let raw = match raw {
        Some(v) if !v.is_empty() => v,
        _ => return Err(DecodeError::Missing),
    };

    // Non-visible-ASCII bytes can never be standard base64.
    let encoded = raw.to_str().map_err(|_| DecodeError::InvalidFormat)?;

    let bytes = USERINFO_ENGINE
        .decode(encoded)
        .map_err(|_| DecodeError::InvalidFormat)?;

    let claims = parse_claims(&bytes).map_err(|_| DecodeError::InvalidJson)?;

    Ok(claims.into())
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;

    use super::*;

    fn header(json: &str) -> HeaderValue {
        HeaderValue::from_str(&STANDARD.encode(json)).unwrap()
    }

    #[test]
    fn missing_header() {
        assert_eq!(decode(None), Err(DecodeError::Missing));
    }

    #[test]
    fn empty_header_is_missing() {
        let v = HeaderValue::from_static("");
        assert_eq!(decode(Some(&v)), Err(DecodeError::Missing));
    }

    #[test]
    fn invalid_base64() {
        let v = HeaderValue::from_static("not base64!!");
        assert_eq!(decode(Some(&v)), Err(DecodeError::InvalidFormat));
    }

    #[test]
    fn non_ascii_bytes_are_invalid_format() {
        let v = HeaderValue::from_bytes(&[0xff, 0xfe, 0x41]).unwrap();
        assert_eq!(decode(Some(&v)), Err(DecodeError::InvalidFormat));
    }

    #[test]
    fn invalid_json() {
        assert_eq!(decode(Some(&header("not json"))), Err(DecodeError::InvalidJson));
    }

    #[test]
    fn type_mismatch_is_invalid_json() {
        let v = header(r#"{"sub":"u1","scope":"a","client_id":"c1","active":"yes"}"#);
        assert_eq!(decode(Some(&v)), Err(DecodeError::InvalidJson));
    }

    #[test]
    fn encoding_error_wins_over_inactive_payload() {
        // Valid JSON for an inactive token, followed by a byte outside the alphabet.
        let mut encoded = STANDARD.encode(r#"{"active":false}"#);
        encoded.push('*');
        let v = HeaderValue::from_str(&encoded).unwrap();
        assert_eq!(decode(Some(&v)), Err(DecodeError::InvalidFormat));
    }

    #[test]
    fn decodes_full_record() {
        let v = header(r#"{"sub":"u1","scope":"b a c a","client_id":"c1","active":true}"#);
        let record = decode(Some(&v)).unwrap();

        assert_eq!(record.subject(), "u1");
        assert_eq!(record.client_id(), "c1");
        assert!(record.is_active());
        assert_eq!(record.scopes().join(), "b a c");
        for s in ["a", "b", "c"] {
            assert!(record.scopes().contains(s));
        }
    }

    #[test]
    fn missing_fields_take_zero_values() {
        let record = decode(Some(&header(r#"{"sub":"u1","extra":1}"#))).unwrap();
        assert!(!record.is_active());
        assert_eq!(record.client_id(), "");
        assert!(record.scopes().contains(""));
    }

    #[test]
    fn null_fields_take_zero_values() {
        let v = header(r#"{"sub":"u1","scope":"users:read","client_id":null,"active":true}"#);
        let record = decode(Some(&v)).unwrap();
        assert_eq!(record.client_id(), "");
        assert!(record.is_active());
        assert!(record.scopes().contains("users:read"));

        let record = decode(Some(&header(r#"{"sub":null,"scope":null,"active":null}"#))).unwrap();
        assert_eq!(record.subject(), "");
        assert!(record.scopes().contains(""));
        assert!(!record.is_active());
    }

    #[test]
    fn null_document_is_an_inactive_record() {
        let record = decode(Some(&header("null"))).unwrap();
        assert_eq!(record.subject(), "");
        assert_eq!(record.ensure_active(), Err(InactiveIdentity));
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let record = decode(Some(&header(r#"{"sub":"u1","active":false,"active":true}"#))).unwrap();
        assert!(record.is_active());

        let record = decode(Some(&header(r#"{"sub":"u1","sub":"u2","active":true}"#))).unwrap();
        assert_eq!(record.subject(), "u2");
    }

    #[test]
    fn non_object_document_is_invalid_json() {
        for doc in ["42", r#""u1""#, "[]", "true"] {
            assert_eq!(decode(Some(&header(doc))), Err(DecodeError::InvalidJson), "{doc}");
        }
    }

    #[test]
    fn tolerates_non_zero_trailing_bits() {
        // "e30=" is `{}`; "e31=" differs only in the unused low bits of the last symbol.
        let v = HeaderValue::from_static("e31=");
        let record = decode(Some(&v)).unwrap();
        assert!(!record.is_active());
    }

    #[test]
    fn padding_is_still_required() {
        let v = HeaderValue::from_static("e30");
        assert_eq!(decode(Some(&v)), Err(DecodeError::InvalidFormat));
    }

    #[test]
    fn ensure_active_rejects_inactive() {
        let record = decode(Some(&header(r#"{"sub":"u1","scope":"a","active":false}"#))).unwrap();
        assert_eq!(record.ensure_active(), Err(InactiveIdentity));
    }
}
