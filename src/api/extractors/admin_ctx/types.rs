/*
 * Responsibility
 * - Handler から見える「管理者として認証済み」のコンテキスト
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 */
use crate::services::auth::CredentialSource;

#[derive(Debug, Clone, Copy)]
pub struct AdminCtx {
    pub source: CredentialSource,
}

impl AdminCtx {
    pub fn new(source: CredentialSource) -> Self {
        Self { source }
    }
}
