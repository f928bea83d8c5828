/*
 * Responsibility
 * - /posts 系 CRUD handler
 * - Path の {post_id} は公開 ID → extractor で復号化して内部キーに変換して受け取る
 * - 書き込み系は AdminCtx を要求する (middleware で検証済み)
 * - ストアのエラーは操作ごとのメッセージ付きで AppError に変換
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{
        dto::posts::{DeletePostResponse, PostRequest, PostResponse},
        extractors::{AdminCtxExtractor, ApiJson, public_id::PublicPostId},
    },
    error::{AppError, PostOp},
    repos::posts::PostRecord,
    state::AppState,
};

fn record_to_response(state: &AppState, record: PostRecord) -> Result<PostResponse, AppError> {
    let public_id = state.id_codec.encode(record.key).map_err(|err| {
        tracing::error!(key = record.key, error = %err, "failed to encode public id");
        AppError::Internal
    })?;

    Ok(PostResponse::from_record(public_id, record))
}

pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let records = state
        .posts
        .list_newest_first()
        .await
        .map_err(AppError::store(PostOp::List))?;

    tracing::debug!(count = records.len(), "listed posts");

    let mut res = Vec::with_capacity(records.len());
    for record in records {
        res.push(record_to_response(&state, record)?);
    }

    Ok(Json(res))
}

pub async fn create_post(
    State(state): State<AppState>,
    AdminCtxExtractor(admin): AdminCtxExtractor,
    ApiJson(req): ApiJson<PostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let draft = req.into_draft().map_err(AppError::MissingFields)?;

    let record = state
        .posts
        .insert(draft)
        .await
        .map_err(AppError::store(PostOp::Create))?;

    tracing::info!(key = record.key, via = ?admin.source, "post created");

    let res = record_to_response(&state, record)?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn get_post(
    State(state): State<AppState>,
    post_id: PublicPostId,
) -> Result<Json<PostResponse>, AppError> {
    let record = state
        .posts
        .find(post_id.key)
        .await
        .map_err(AppError::store(PostOp::Get))?
        .ok_or(AppError::PostNotFound)?;

    Ok(Json(record_to_response(&state, record)?))
}

pub async fn update_post(
    State(state): State<AppState>,
    AdminCtxExtractor(admin): AdminCtxExtractor,
    post_id: PublicPostId,
    ApiJson(req): ApiJson<PostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let draft = req.into_draft().map_err(AppError::MissingFields)?;

    let record = state
        .posts
        .replace(post_id.key, draft)
        .await
        .map_err(AppError::store(PostOp::Update))?
        .ok_or(AppError::PostNotFound)?;

    tracing::info!(key = record.key, via = ?admin.source, "post updated");

    Ok(Json(record_to_response(&state, record)?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AdminCtxExtractor(admin): AdminCtxExtractor,
    post_id: PublicPostId,
) -> Result<Json<DeletePostResponse>, AppError> {
    let removed = state
        .posts
        .delete(post_id.key)
        .await
        .map_err(AppError::store(PostOp::Delete))?
        .ok_or(AppError::PostNotFound)?;

    tracing::info!(key = removed.key, via = ?admin.source, "post deleted");

    Ok(Json(DeletePostResponse {
        message: "تم حذف المقال بنجاح",
    }))
}
