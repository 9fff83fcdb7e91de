/*
 * Responsibility
 * - v1 の URL 構造と、route ごとの required scopes を定義
 * - RequireScopes::wrap は登録時に一度だけ組み立てる (リクエスト時ではない)
 * - /health は認可なし
 */
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::middleware::auth::RequireScopes;
use crate::state::AppState;

use crate::api::v1::handlers::{health::health, resources};

pub fn routes() -> Router<AppState> {
    let read = || RequireScopes::new(["users:read"]);
    let write = || RequireScopes::new(["users:write"]);

    Router::new()
        .route("/health", get(health))
        .route(
            "/",
            read()
                .wrap(get(resources::list))
                .merge(write().wrap(post(resources::create))),
        )
        .route(
            "/{id}",
            read()
                .wrap(get(resources::read))
                .merge(write().wrap(put(resources::update)))
                .merge(RequireScopes::new(["users:delete"]).wrap(delete(resources::delete))),
        )
        .route(
            "/admin/stats",
            RequireScopes::new(["admin:read", "users:read"]).wrap(get(resources::admin_stats)),
        )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use tower::ServiceExt;

    use super::*;

    fn userinfo(sub: &str, scope: &str) -> String {
        STANDARD.encode(format!(
            r#"{{"sub":"{sub}","scope":"{scope}","client_id":"c1","active":true}}"#
        ))
    }

    async fn call(method: &str, uri: &str, header: Option<String>) -> (StatusCode, String) {
        let app = routes().with_state(AppState::new("users"));

        let mut req = Request::builder().method(method).uri(uri);
        if let Some(h) = header {
            req = req.header("x-userinfo", h);
        }
        let res = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();

        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, body) = call("GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "users service is healthy!");
    }

    #[tokio::test]
    async fn list_with_read_scope() {
        let (status, body) = call("GET", "/", Some(userinfo("u1", "users:read"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello from users service! User: u1, Scopes: [users:read]");
    }

    #[tokio::test]
    async fn create_requires_write_scope() {
        let (status, body) = call("POST", "/", Some(userinfo("u1", "users:read"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "Forbidden: Insufficient permissions");

        let (status, body) = call("POST", "/", Some(userinfo("u1", "users:write"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Create in users service by user u1!");
    }

    #[tokio::test]
    async fn item_routes_use_per_method_scopes() {
        let h = || Some(userinfo("u1", "users:read users:write"));

        let (status, body) = call("GET", "/42", h()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Read users with id 42 by user u1!");

        let (status, body) = call("PUT", "/42", h()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Update users with id 42 by user u1!");

        let (status, _) = call("DELETE", "/42", h()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call("DELETE", "/42", Some(userinfo("u1", "users:delete"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Delete users with id 42 by user u1!");
    }

    #[tokio::test]
    async fn admin_stats_needs_both_scopes() {
        let (status, _) = call("GET", "/admin/stats", Some(userinfo("a1", "admin:read"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call(
            "GET",
            "/admin/stats",
            Some(userinfo("a1", "admin:read users:read")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            "Admin stats for users service. Admin: a1, Scopes: [admin:read users:read]"
        );
    }

    #[tokio::test]
    async fn protected_route_without_header_is_401() {
        let (status, body) = call("GET", "/42", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Unauthorized: Missing user info");
    }
}
