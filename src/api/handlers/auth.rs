/*
 * Responsibility
 * - 管理者ログイン 2 系統
 *   - /admin/login, /admin/verify: Bearer JWT (ポップアップ管理パネル用)
 *   - /auth/login, /auth/logout, /auth/check: セッション Cookie (/admin ページ用)
 */
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    api::{
        dto::auth::{
            LoginRequest, SessionCheckResponse, SuccessResponse, TokenLoginResponse,
            VerifyResponse,
        },
        extractors::ApiJson,
    },
    error::AppError,
    middleware::auth::admin::bearer_token,
    services::auth::{
        AdminAuth,
        admin_auth::{SESSION_COOKIE_MAX_AGE_SECONDS, SESSION_COOKIE_NAME, SESSION_COOKIE_VALUE},
    },
    state::AppState,
};

pub async fn token_login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<TokenLoginResponse>, AppError> {
    if !state.auth.password_matches(&req.password) {
        return Err(AppError::WrongPassword);
    }

    let token = state.auth.issue_token().map_err(|err| {
        tracing::error!(error = %err, "failed to sign admin token");
        AppError::Internal
    })?;

    tracing::info!("admin token issued");

    Ok(Json(TokenLoginResponse {
        success: true,
        token,
        token_type: "Bearer",
        expires_in: state.auth.tokens().ttl_seconds(),
        message: "تم تسجيل الدخول بنجاح",
    }))
}

pub async fn verify_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<VerifyResponse>) {
    let Some(token) = bearer_token(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(VerifyResponse {
                valid: false,
                error: Some("رمز التفويض مفقود"),
            }),
        );
    };

    match state.auth.verify_token(token) {
        Ok(()) => (
            StatusCode::OK,
            Json(VerifyResponse {
                valid: true,
                error: None,
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "admin token verification failed");
            (
                StatusCode::UNAUTHORIZED,
                Json(VerifyResponse {
                    valid: false,
                    error: Some("رمز غير صحيح أو منتهي الصلاحية"),
                }),
            )
        }
    }
}

pub async fn session_login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<SuccessResponse>), AppError> {
    if !state.auth.password_matches(&req.password) {
        return Err(AppError::InvalidPassword);
    }

    let cookie = Cookie::build((SESSION_COOKIE_NAME, SESSION_COOKIE_VALUE))
        .http_only(true)
        .secure(state.app_env.is_production())
        .path("/")
        .max_age(time::Duration::seconds(SESSION_COOKIE_MAX_AGE_SECONDS));

    tracing::info!("admin session cookie issued");

    Ok((jar.add(cookie), Json(SuccessResponse { success: true })))
}

pub async fn session_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    let cleared = Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .secure(state.app_env.is_production())
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::ZERO);

    (jar.add(cleared), Json(SuccessResponse { success: true }))
}

pub async fn session_check(jar: CookieJar) -> (StatusCode, Json<SessionCheckResponse>) {
    let authenticated =
        AdminAuth::session_cookie_valid(jar.get(SESSION_COOKIE_NAME).map(|c| c.value()));

    let status = if authenticated {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };

    (status, Json(SessionCheckResponse { authenticated }))
}
