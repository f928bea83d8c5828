/// Factory: build `AdminAuth` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AdminAuth, AdminTokens};

pub fn build_admin_auth(config: &Config) -> Arc<AdminAuth> {
    // 管理者パスワードがそのまま HS256 の秘密鍵になる
    let tokens = AdminTokens::new(
        &config.admin_password,
        config.admin_token_ttl_seconds,
        config.admin_token_leeway_seconds,
    );

    Arc::new(AdminAuth::new(config.admin_password.clone(), tokens))
}
