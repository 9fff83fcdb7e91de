/*
 * Responsibility
 * - GET /health (疎通用)
 * - userinfo middleware を通さない
 */
use axum::extract::State;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> String {
    format!("{} service is healthy!", state.service_name)
}
