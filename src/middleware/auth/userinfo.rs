//! X-Userinfo 検証 + scope 認可 → AuthCtx を extensions に入れる
//!
//! Pipeline (each step is terminal on failure):
//! - decode: header presence -> base64 -> JSON (401)
//! - active check (401)
//! - scope check against the route's required scopes (403)
//! - on success: set X-User-ID / X-User-Scopes / X-Client-ID and insert `AuthCtx`
//!
//! Required scopes are fixed per route at registration time:
//! ```ignore
//! .route("/", RequireScopes::new(["users:read"]).wrap(get(list)))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{self, Decision, GrantedHeaders, IdentityRecord, X_USERINFO};

/// Route decorator carrying the scopes an operation requires (all of them, AND).
///
/// An empty list (`RequireScopes::default()`) allows any active identity.
#[derive(Debug, Clone, Default)]
pub struct RequireScopes {
    scopes: Arc<[String]>,
}

impl RequireScopes {
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Wrap the handlers of `route` with the userinfo pipeline.
    ///
    /// `route_layer` only touches the registered methods, so 405 for other methods is untouched.
    pub fn wrap<S>(self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        route.route_layer(middleware::from_fn_with_state(self, userinfo_middleware))
    }
}

/// decode → active → authorize. Pure over the request headers.
pub fn evaluate(
    headers: &HeaderMap,
    required: &[String],
) -> Result<(IdentityRecord, GrantedHeaders), AppError> {
    let record = auth::decode(headers.get(X_USERINFO))?.ensure_active()?;

    match auth::authorize(&record, required) {
        Decision::Allow(granted) => Ok((record, granted)),
        Decision::Deny(reason) => Err(reason.into()),
    }
}

async fn userinfo_middleware(
    State(required): State<RequireScopes>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (record, granted) = match evaluate(req.headers(), required.scopes()) {
        Ok(allowed) => allowed,
        Err(err) => {
            // caller-controlled input: log only what the caller is told
            tracing::debug!(status = %err.status(), reason = %err, "userinfo rejected");
            return Err(err);
        }
    };

    granted.apply_to(req.headers_mut());

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::from(record));

    Ok(next.run(req).await)
}
