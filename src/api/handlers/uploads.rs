/*
 * Responsibility
 * - POST /upload (multipart, フィールド名 `file`)
 * - `<unix millis>.<拡張子>` の名前で BlobStore に public-read で保存し、URL を返す
 *   (同名が既にあれば次のミリ秒で取り直す。上書きはしない)
 * - 認証は Cookie のみ (middleware 側で CookieOnly を指定)
 */
use axum::{Json, extract::State};
use axum_extra::extract::{Multipart, multipart::MultipartRejection};
use bytes::Bytes;
use chrono::Utc;

use crate::{
    api::{dto::uploads::UploadResponse, extractors::AdminCtxExtractor},
    error::AppError,
    services::blob::{BlobError, StoredBlob, timestamped_name},
    state::AppState,
};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const MAX_NAME_ATTEMPTS: i64 = 5;

/// Same-millisecond uploads collide on `<millis>.<ext>`; the next millisecond
/// is tried instead of replacing the stored object.
async fn store_with_fresh_name(
    state: &AppState,
    original_name: &str,
    content_type: &str,
    body: Bytes,
) -> Result<(String, StoredBlob), AppError> {
    let started = Utc::now().timestamp_millis();
    let mut last_err = None;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let filename = timestamped_name(original_name, started + attempt);
        match state
            .blobs
            .put_public(&filename, content_type, body.clone())
            .await
        {
            Ok(stored) => return Ok((filename, stored)),
            Err(err @ BlobError::AlreadyExists(_)) => {
                tracing::debug!(filename = %filename, "upload name taken, retrying");
                last_err = Some(err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(last_err.map(AppError::from).unwrap_or(AppError::Internal))
}

pub async fn upload(
    State(state): State<AppState>,
    AdminCtxExtractor(_admin): AdminCtxExtractor,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|rejection| {
        AppError::body_rejected(rejection.status(), rejection.body_text())
    })?;

    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|err| AppError::body_rejected(err.status(), err.body_text()))?
            .ok_or(AppError::MissingFile)?;

        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let body = field
            .bytes()
            .await
            .map_err(|err| AppError::body_rejected(err.status(), err.body_text()))?;

        let size = body.len() as u64;
        let (filename, stored) =
            store_with_fresh_name(&state, &original_name, &content_type, body).await?;

        tracing::info!(
            filename = %filename,
            size,
            backend = state.blobs.backend_name(),
            "file uploaded"
        );

        return Ok(Json(UploadResponse {
            success: true,
            filename,
            url: stored.url,
            size,
            content_type,
        }));
    }
}
