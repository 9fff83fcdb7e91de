/*
 * Responsibility
 * - Handler から見える「認可済みコンテキスト」の型
 * - middleware が X-Userinfo を decode/認可して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - X-User-ID / X-User-Scopes / X-Client-ID ヘッダと同じ 3 項目を持つ
 * - 読み取り専用 (1 リクエストの間だけ生きる)
 */
use crate::services::auth::{IdentityRecord, ScopeSet};

/// 認可済みのリクエストに付与されるコンテキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    user_id: String,
    scopes: ScopeSet,
    client_id: String,
}

impl AuthCtx {
    pub fn new(user_id: impl Into<String>, scopes: ScopeSet, client_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            scopes,
            client_id: client_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn scopes(&self) -> &ScopeSet {
        &self.scopes
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl From<IdentityRecord> for AuthCtx {
    fn from(record: IdentityRecord) -> Self {
        let (user_id, scopes, client_id) = record.into_parts();
        Self::new(user_id, scopes, client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_record_scopes_as_parsed() {
        let record = IdentityRecord::new("u1", ScopeSet::parse("b a  b"), "c1", true);
        let expected = record.scopes().clone();

        let ctx = AuthCtx::from(record);

        assert_eq!(ctx.user_id(), "u1");
        assert_eq!(ctx.client_id(), "c1");
        assert_eq!(ctx.scopes(), &expected);
        assert_eq!(ctx.scopes().join(), "b a ");
    }
}
