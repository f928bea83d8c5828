/*
 * Responsibility
 * - /api 以下の URL 構造を定義
 * - 読み取りは公開、書き込み系メソッドだけ admin::protect で認証を掛ける
 * - /upload は Cookie のみ受け付ける
 */
use axum::{
    Router,
    routing::{MethodRouter, get, post, put},
};

use crate::api::handlers::{
    auth::{session_check, session_login, session_logout, token_login, verify_token},
    posts::{create_post, delete_post, get_post, list_posts, update_post},
    uploads::upload,
};
use crate::middleware::auth::admin;
use crate::services::auth::AcceptedCredentials;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let admin_only = |method_router: MethodRouter<AppState>| {
        admin::protect(method_router, state, AcceptedCredentials::BearerOrCookie)
    };

    Router::new()
        .route("/posts", get(list_posts).merge(admin_only(post(create_post))))
        .route(
            "/posts/{post_id}",
            get(get_post).merge(admin_only(put(update_post).delete(delete_post))),
        )
        .route(
            "/upload",
            admin::protect(post(upload), state, AcceptedCredentials::CookieOnly),
        )
        .route("/admin/login", post(token_login))
        .route("/admin/verify", get(verify_token))
        .route("/auth/login", post(session_login))
        .route("/auth/logout", post(session_logout))
        .route("/auth/check", get(session_check))
}
