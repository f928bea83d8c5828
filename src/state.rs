/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - posts: PostStore, id_codec: IdCodec, auth: AdminAuth, blobs: BlobStore
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - ストアは起動時に明示的に生成して注入する (グローバルなキャッシュは持たない)
 */
use std::sync::Arc;

use crate::config::AppEnv;
use crate::repos::posts::PostStore;
use crate::services::{auth::AdminAuth, blob::BlobStore, id_codec::IdCodec};

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub id_codec: IdCodec,
    pub auth: Arc<AdminAuth>,
    pub blobs: Arc<dyn BlobStore>,
    pub app_env: AppEnv,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("posts", &self.posts.backend_name())
            .field("blobs", &self.blobs.backend_name())
            .field("app_env", &self.app_env)
            .finish()
    }
}

impl AppState {
    pub fn new(
        posts: Arc<dyn PostStore>,
        id_codec: IdCodec,
        auth: Arc<AdminAuth>,
        blobs: Arc<dyn BlobStore>,
        app_env: AppEnv,
    ) -> Self {
        Self {
            posts,
            id_codec,
            auth,
            blobs,
            app_env,
        }
    }
}
