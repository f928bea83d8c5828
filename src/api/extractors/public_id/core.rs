/*
 * Responsibility
 * - Path の String を公開 ID 型として受け、復号してストア内部のキーへ変換する
 * - Axum の FromRequestParts 実装
 * - 復号できない ID は「存在しない記事」として 404 に寄せる
 *
 * 置かないもの
 *  - Post といった具体リソース名 (types.rs 側)
 */
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;
use crate::state::AppState;

pub struct PublicId<T> {
    pub key: i64,
    _marker: PhantomData<T>,
}

impl<T> PublicId<T> {
    fn new(key: i64) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }
}

impl<T> FromRequestParts<AppState> for PublicId<T>
where
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(public_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::PostNotFound)?;

        let key = state.id_codec.decode(&public_id).map_err(|err| {
            tracing::debug!(public_id = %public_id, error = %err, "undecodable public id");
            AppError::PostNotFound
        })?;

        Ok(Self::new(key))
    }
}

impl<T> std::fmt::Debug for PublicId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicId").field("key", &self.key).finish()
    }
}
