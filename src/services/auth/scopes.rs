//! Scope set + scope-based authorization.
//!
//! Responsibility:
//! - Parse the space-delimited `scope` claim into a set (`ScopeSet`)
//! - Decide Allow / Deny for a route's required scopes (`authorize`)
//! - Derive the propagation headers handed to downstream handlers
//!
//! Notes:
//! - Every required scope must be held (AND). An empty requirement list always allows.
//! - A Deny never says which scope was missing.

use std::collections::HashSet;

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use super::userinfo::IdentityRecord;

pub const X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");
pub const X_USER_SCOPES: HeaderName = HeaderName::from_static("x-user-scopes");
pub const X_CLIENT_ID: HeaderName = HeaderName::from_static("x-client-id");

/// Scopes held by a principal.
///
/// - Split on a single space, so `""` yields `{""}` and `"a  b"` yields `{"a", "", "b"}`
/// - Duplicates collapse; first-occurrence order is kept for `join()`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeSet {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl ScopeSet {
    pub fn parse(raw: &str) -> Self {
        let mut set = Self::default();
        for scope in raw.split(' ') {
            if set.members.insert(scope.to_owned()) {
                set.ordered.push(scope.to_owned());
            }
        }
        set
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.members.contains(scope)
    }

    pub fn join(&self) -> String {
        self.ordered.join(" ")
    }
}

/// Outcome of `authorize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow(GrantedHeaders),
    Deny(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    InsufficientScope,
}

/// Identity attributes propagated to the downstream handler on Allow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantedHeaders {
    pub user_id: String,
    pub scopes: String,
    pub client_id: String,
}

impl GrantedHeaders {
    /// Write `X-User-ID` / `X-User-Scopes` / `X-Client-ID` onto `headers`.
    ///
    /// Values that are not valid header values are skipped (the claim came from JSON,
    /// so control characters are possible).
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        for (name, value) in [
            (X_USER_ID, &self.user_id),
            (X_USER_SCOPES, &self.scopes),
            (X_CLIENT_ID, &self.client_id),
        ] {
            match HeaderValue::from_str(value) {
                Ok(v) => {
                    headers.insert(name, v);
                }
                Err(_) => {
                    // A spoofed inbound value must not survive.
                    headers.remove(&name);
                    tracing::debug!(header = %name, "propagation header value not representable; skipped");
                }
            }
        }
    }
}

pub fn authorize(record: &IdentityRecord, required: &[String]) -> Decision {
    let held = record.scopes();

    // short-circuits on the first missing scope
    if !required.iter().all(|scope| held.contains(scope)) {
        return Decision::Deny(DenyReason::InsufficientScope);
    }

    Decision::Allow(GrantedHeaders {
        user_id: record.subject().to_owned(),
        scopes: record.scopes().join(),
        client_id: record.client_id().to_owned(),
    })
}
