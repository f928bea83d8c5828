use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::AdminCtx;

/// Handler で AdminCtx を受け取るための extractor
/// middleware が AdminCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 (ミドルウェア未設定のルートでも書き込みを通さない)
pub struct AdminCtxExtractor(pub AdminCtx);

impl<S> FromRequestParts<S> for AdminCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminCtx>()
            .copied()
            .map(AdminCtxExtractor)
            .ok_or(AppError::Unauthorized)
    }
}
