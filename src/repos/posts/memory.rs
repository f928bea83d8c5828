//! In-process post store (`STORE_BACKEND=memory`) used for local runs and tests.
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::repos::error::RepoResult;
use crate::repos::posts::store::{PostDraft, PostRecord, PostStore};

#[derive(Debug, Default)]
struct Inner {
    next_key: i64,
    posts: BTreeMap<i64, PostRecord>,
}

/// Cheap to clone; clones share the same collection.
#[derive(Clone, Debug, Default)]
pub struct MemoryPostStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed record as-is (explicit key and timestamps).
    pub async fn seed(&self, record: PostRecord) {
        let mut inner = self.inner.lock().await;
        inner.next_key = inner.next_key.max(record.key);
        inner.posts.insert(record.key, record);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_newest_first(&self) -> RepoResult<Vec<PostRecord>> {
        let inner = self.inner.lock().await;
        let mut posts: Vec<PostRecord> = inner.posts.values().cloned().collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.key.cmp(&a.key))
        });
        Ok(posts)
    }

    async fn find(&self, key: i64) -> RepoResult<Option<PostRecord>> {
        Ok(self.inner.lock().await.posts.get(&key).cloned())
    }

    async fn insert(&self, draft: PostDraft) -> RepoResult<PostRecord> {
        let mut inner = self.inner.lock().await;
        inner.next_key += 1;
        let now = Utc::now();

        let record = PostRecord {
            key: inner.next_key,
            title: draft.title,
            title_direction: draft.title_direction,
            content: draft.content,
            author: draft.author,
            tags: draft.tags,
            media: draft.media,
            youtube_url: draft.youtube_url,
            created_at: now,
            updated_at: now,
        };
        inner.posts.insert(record.key, record.clone());

        Ok(record)
    }

    async fn replace(&self, key: i64, draft: PostDraft) -> RepoResult<Option<PostRecord>> {
        let mut inner = self.inner.lock().await;
        let Some(post) = inner.posts.get_mut(&key) else {
            return Ok(None);
        };

        post.title = draft.title;
        post.title_direction = draft.title_direction;
        post.content = draft.content;
        post.author = draft.author;
        post.tags = draft.tags;
        post.media = draft.media;
        post.youtube_url = draft.youtube_url;
        post.updated_at = Utc::now();

        Ok(Some(post.clone()))
    }

    async fn delete(&self, key: i64) -> RepoResult<Option<PostRecord>> {
        Ok(self.inner.lock().await.posts.remove(&key))
    }
}
