/*
 * Responsibility
 * - 保護対象のダミー handler 群 (echo のみ、業務ロジックなし)
 * - 認可済みの主体は AuthCtxExtractor 経由でのみ受け取る
 */
use axum::extract::{Path, State};

use crate::{
    api::v1::extractors::{AuthCtx, AuthCtxExtractor},
    state::AppState,
};

fn scope_list(ctx: &AuthCtx) -> String {
    format!("[{}]", ctx.scopes().join())
}

// write 系は誰が (どの client 経由で) 行ったかを残す
fn audit(action: &'static str, ctx: &AuthCtx) {
    tracing::info!(
        action,
        user_id = ctx.user_id(),
        client_id = ctx.client_id(),
        "write operation"
    );
}

pub async fn list(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> String {
    format!(
        "Hello from {} service! User: {}, Scopes: {}",
        state.service_name,
        ctx.user_id(),
        scope_list(&ctx)
    )
}

pub async fn create(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> String {
    audit("create", &ctx);
    format!(
        "Create in {} service by user {}!",
        state.service_name,
        ctx.user_id()
    )
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> String {
    format!(
        "Read {} with id {} by user {}!",
        state.service_name,
        id,
        ctx.user_id()
    )
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> String {
    audit("update", &ctx);
    format!(
        "Update {} with id {} by user {}!",
        state.service_name,
        id,
        ctx.user_id()
    )
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> String {
    audit("delete", &ctx);
    format!(
        "Delete {} with id {} by user {}!",
        state.service_name,
        id,
        ctx.user_id()
    )
}

pub async fn admin_stats(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> String {
    format!(
        "Admin stats for {} service. Admin: {}, Scopes: {}",
        state.service_name,
        ctx.user_id(),
        scope_list(&ctx)
    )
}
