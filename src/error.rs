/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / text/plain body)
 * - services::auth の DecodeError / InactiveIdentity / DenyReason を統一的に変換
 *
 * Notes
 * - body の文言はクライアントとの契約なので変更しないこと
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::auth::{DecodeError, DenyReason, InactiveIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Unauthorized: Missing user info")]
    MissingIdentity,
    #[error("Unauthorized: Invalid user info format")]
    MalformedEncoding,
    #[error("Unauthorized: Invalid user info JSON")]
    MalformedPayload,
    #[error("Unauthorized: Token is not active")]
    InactiveIdentity,
    #[error("Forbidden: Insufficient permissions")]
    InsufficientScope,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingIdentity
            | AppError::MalformedEncoding
            | AppError::MalformedPayload
            | AppError::InactiveIdentity => StatusCode::UNAUTHORIZED,
            AppError::InsufficientScope => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<DecodeError> for AppError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::Missing => AppError::MissingIdentity,
            DecodeError::InvalidFormat => AppError::MalformedEncoding,
            DecodeError::InvalidJson => AppError::MalformedPayload,
        }
    }
}

impl From<InactiveIdentity> for AppError {
    fn from(_: InactiveIdentity) -> Self {
        AppError::InactiveIdentity
    }
}

impl From<DenyReason> for AppError {
    fn from(r: DenyReason) -> Self {
        match r {
            DenyReason::InsufficientScope => AppError::InsufficientScope,
        }
    }
}
