/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - http: 横断的な transport 関心事 / auth: X-Userinfo による認可
 */
pub mod auth;
pub mod http;
