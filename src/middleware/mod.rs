/*
 * Responsibility
 * - middleware の公開インターフェース
 * - 各モジュールは `apply(router, ...)` 形式で Router に層を掛ける
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
