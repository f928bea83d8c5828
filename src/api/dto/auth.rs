/*
 * Responsibility
 * - 管理者ログイン (JWT / Cookie) の request/response DTO
 */
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    // 欠落は空文字として扱い、パスワード不一致 (401) に寄せる
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenLoginResponse {
    pub success: bool,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionCheckResponse {
    pub authenticated: bool,
}
