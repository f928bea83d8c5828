pub mod admin_ctx;
pub mod json;
pub mod public_id;

pub use admin_ctx::{AdminCtx, AdminCtxExtractor};
pub use json::ApiJson;
