//! Post persistence interface shared by the Postgres and in-memory backends.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::error::RepoResult;

/// Display hint for the title's writing direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleDirection {
    Rtl,
    Ltr,
    #[default]
    Auto,
}

impl TitleDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rtl => "rtl",
            Self::Ltr => "ltr",
            Self::Auto => "auto",
        }
    }

    /// Column values are constrained by the schema; anything else reads as `auto`.
    pub fn from_column(value: &str) -> Self {
        match value {
            "rtl" => Self::Rtl,
            "ltr" => Self::Ltr,
            _ => Self::Auto,
        }
    }
}

/// Editable fields of a post, already validated and normalized by the API layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub title_direction: TitleDirection,
    pub content: String,
    pub author: String,
    pub tags: Vec<String>,
    pub media: Option<String>,
    pub youtube_url: Option<String>,
}

/// A stored post. `key` is the store's internal id and never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub key: i64,
    pub title: String,
    pub title_direction: TitleDirection,
    pub content: String,
    pub author: String,
    pub tags: Vec<String>,
    pub media: Option<String>,
    pub youtube_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post collection operations.
///
/// Implementations must be shareable across requests (`Arc<dyn PostStore>`).
#[async_trait]
pub trait PostStore: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // All posts, newest `created_at` first; ties go to the higher key.
    async fn list_newest_first(&self) -> RepoResult<Vec<PostRecord>>;

    async fn find(&self, key: i64) -> RepoResult<Option<PostRecord>>;

    // Sets `created_at` and `updated_at` to now.
    async fn insert(&self, draft: PostDraft) -> RepoResult<PostRecord>;

    // Full replace of the editable fields. Keeps `created_at`, resets `updated_at`.
    // Returns `Ok(None)` if the key does not exist.
    async fn replace(&self, key: i64, draft: PostDraft) -> RepoResult<Option<PostRecord>>;

    // Returns the removed post, or `Ok(None)` if the key does not exist.
    async fn delete(&self, key: i64) -> RepoResult<Option<PostRecord>>;
}
