/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / BlobError / validation / auth error を統一的に変換
 * - クライアントに見せるメッセージはローカライズ済みの文字列 (主にアラビア語)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::blob::BlobError;

/// Which post operation hit the store; selects the localized failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOp {
    List,
    Create,
    Get,
    Update,
    Delete,
}

impl PostOp {
    fn failure_message(self) -> &'static str {
        match self {
            PostOp::List => "فشل في تحميل المقالات",
            PostOp::Create => "فشل في إنشاء المقال",
            PostOp::Get => "فشل في تحميل المقال",
            PostOp::Update => "فشل في تحديث المقال",
            PostOp::Delete => "فشل في حذف المقال",
        }
    }
}

/// Field-level detail for a 400 on post create/update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MissingFields {
    pub title: bool,
    pub content: bool,
    pub author: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: &'static str,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<MissingFields>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing required fields: {0:?}")]
    MissingFields(MissingFields),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("no file uploaded")]
    MissingFile,
    #[error("unauthorized")]
    Unauthorized,
    #[error("unauthorized upload")]
    UploadUnauthorized,
    #[error("wrong admin password")]
    WrongPassword,
    #[error("invalid password")]
    InvalidPassword,
    #[error("post not found")]
    PostNotFound,
    #[error("post store failed during {op:?}: {source}")]
    Store {
        op: PostOp,
        #[source]
        source: RepoError,
    },
    #[error("upload failed: {0}")]
    Upload(#[from] BlobError),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    /// Body extraction failure; an over-limit body keeps its 413.
    pub fn body_rejected(status: StatusCode, reason: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::InvalidBody(reason)
        }
    }

    pub fn store(op: PostOp) -> impl FnOnce(RepoError) -> Self {
        move |source| Self::Store { op, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_) | AppError::InvalidBody(_) | AppError::MissingFile => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized
            | AppError::UploadUnauthorized
            | AppError::WrongPassword
            | AppError::InvalidPassword => StatusCode::UNAUTHORIZED,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::PostNotFound => StatusCode::NOT_FOUND,
            AppError::Store { .. } | AppError::Upload(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorResponse {
        let (error, code) = match self {
            AppError::MissingFields(_) => ("حقول مطلوبة مفقودة", "MISSING_FIELDS"),
            AppError::InvalidBody(_) => ("طلب غير صالح", "INVALID_BODY"),
            AppError::PayloadTooLarge => ("حجم الطلب كبير جداً", "PAYLOAD_TOO_LARGE"),
            AppError::MissingFile => ("No file uploaded", "MISSING_FILE"),
            AppError::Unauthorized => ("غير مصرح - يرجى تسجيل الدخول أولاً", "UNAUTHORIZED"),
            AppError::UploadUnauthorized => ("Unauthorized", "UNAUTHORIZED"),
            AppError::WrongPassword => ("كلمة مرور خاطئة", "INVALID_PASSWORD"),
            AppError::InvalidPassword => ("Invalid password", "INVALID_PASSWORD"),
            AppError::PostNotFound => ("المقال غير موجود", "NOT_FOUND"),
            AppError::Store { op, .. } => (op.failure_message(), "STORE_ERROR"),
            AppError::Upload(_) => ("Upload failed", "UPLOAD_FAILED"),
            AppError::Internal => ("خطأ في الخادم", "INTERNAL"),
        };

        let details = match self {
            AppError::MissingFields(_) => Some("العنوان والمحتوى والكاتب مطلوبين".to_string()),
            AppError::InvalidBody(reason) => Some(reason.clone()),
            AppError::Store { source, .. } => Some(source.to_string()),
            AppError::Upload(source) => Some(source.to_string()),
            _ => None,
        };

        let missing_fields = match self {
            AppError::MissingFields(fields) => Some(*fields),
            _ => None,
        };

        ErrorResponse {
            error,
            code,
            details,
            missing_fields,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_carry_field_detail() {
        let err = AppError::MissingFields(MissingFields {
            title: true,
            content: false,
            author: true,
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["code"], "MISSING_FIELDS");
        assert_eq!(body["missingFields"]["title"], true);
        assert_eq!(body["missingFields"]["content"], false);
        assert_eq!(body["missingFields"]["author"], true);
    }

    #[test]
    fn store_failures_use_the_operation_message_and_keep_the_cause() {
        let err = AppError::store(PostOp::Delete)(RepoError::Db(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["error"], "فشل في حذف المقال");
        assert!(
            body["details"]
                .as_str()
                .unwrap()
                .contains("pool timed out")
        );
        assert!(body.get("missingFields").is_none());
    }

    #[test]
    fn oversized_bodies_keep_their_status() {
        let err = AppError::body_rejected(StatusCode::PAYLOAD_TOO_LARGE, "length limit".into());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            serde_json::to_value(err.body()).unwrap()["code"],
            "PAYLOAD_TOO_LARGE"
        );

        let err = AppError::body_rejected(StatusCode::BAD_REQUEST, "bad boundary".into());
        assert!(matches!(err, AppError::InvalidBody(ref r) if r == "bad boundary"));
    }

    #[test]
    fn not_found_has_no_details() {
        let body = serde_json::to_value(AppError::PostNotFound.body()).unwrap();
        assert_eq!(body["error"], "المقال غير موجود");
        assert!(body.get("details").is_none());
    }
}
