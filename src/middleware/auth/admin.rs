//! 管理者認証 (Bearer JWT or セッション Cookie) → AdminCtx を extensions に入れる
//!
//! - ルートごとに受け付ける資格情報の種類 (`AcceptedCredentials`) を指定する
//! - 検証は `AdminAuth::authorize` に一本化 (ここはヘッダ/Cookie の取り出しだけ)
//! - 拒否時は handler に到達しない (= ストア/ストレージに触れない)

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::extractors::AdminCtx;
use crate::error::AppError;
use crate::services::auth::{
    AcceptedCredentials, PresentedCredentials, admin_auth::SESSION_COOKIE_NAME,
};
use crate::state::AppState;

#[derive(Clone)]
struct AdminGate {
    state: AppState,
    accepted: AcceptedCredentials,
}

/// 書き込み系のメソッドだけに認証を掛ける。
///
/// 例：
/// ```ignore
/// .route("/posts", get(list_posts).merge(admin::protect(post(create_post), &state, AcceptedCredentials::BearerOrCookie)))
/// ```
pub fn protect(
    method_router: MethodRouter<AppState>,
    state: &AppState,
    accepted: AcceptedCredentials,
) -> MethodRouter<AppState> {
    let gate = AdminGate {
        state: state.clone(),
        accepted,
    };
    // route_layer: 未マッチのメソッド (405) には認証を掛けない
    method_router.route_layer(middleware::from_fn_with_state(gate, admin_middleware))
}

/// `Authorization: Bearer <token>` の token 部分
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn admin_middleware(
    State(gate): State<AdminGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let source = {
        let headers = req.headers();
        let jar = CookieJar::from_headers(headers);
        let presented = PresentedCredentials {
            bearer: bearer_token(headers),
            session_cookie: jar.get(SESSION_COOKIE_NAME).map(|c| c.value()),
        };
        gate.state.auth.authorize(presented, gate.accepted)
    };

    let Some(source) = source else {
        tracing::warn!(
            method = %req.method(),
            path = %req.uri().path(),
            accepted = ?gate.accepted,
            "admin authentication failed"
        );
        return Err(match gate.accepted {
            AcceptedCredentials::BearerOrCookie => AppError::Unauthorized,
            AcceptedCredentials::CookieOnly => AppError::UploadUnauthorized,
        });
    };

    tracing::debug!(via = ?source, "admin authenticated");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AdminCtx::new(source));

    Ok(next.run(req).await)
}
