/*
 * Responsibility
 * - X-Userinfo の decode (userinfo) と scope 認可 (scopes)
 * - HTTP レスポンスへの変換は middleware/error 側の責務
 */
pub mod scopes;
pub mod userinfo;

pub use scopes::{Decision, DenyReason, GrantedHeaders, ScopeSet, authorize};
pub use userinfo::{DecodeError, IdentityRecord, InactiveIdentity, X_USERINFO, decode};
