/*
 * Responsibility
 * - posts テーブル向け SQLx 操作 (PostStore の Postgres 実装)
 * - PgPool は起動時に lazy に生成し、最初のクエリで接続 → 以降はプールを再利用
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, postgres::PgPoolOptions};

use crate::repos::error::RepoResult;
use crate::repos::posts::store::{PostDraft, PostRecord, PostStore, TitleDirection};

#[derive(Debug, FromRow)]
struct PostRow {
    #[sqlx(rename = "postId")]
    post_id: i64,

    title: String,

    #[sqlx(rename = "titleDirection")]
    title_direction: String,

    content: String,
    author: String,
    tags: Vec<String>,
    media: Option<String>,

    #[sqlx(rename = "youtubeUrl")]
    youtube_url: Option<String>,

    #[sqlx(rename = "createdAt")]
    created_at: DateTime<Utc>,

    #[sqlx(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            key: row.post_id,
            title: row.title,
            title_direction: TitleDirection::from_column(&row.title_direction),
            content: row.content,
            author: row.author,
            tags: row.tags,
            media: row.media,
            youtube_url: row.youtube_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the pool without connecting; the first query opens the first connection.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> RepoResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)?;

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list_newest_first(&self) -> RepoResult<Vec<PostRecord>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                "postId", title, "titleDirection", content, author, tags, media,
                "youtubeUrl", "createdAt", "updatedAt"
            FROM posts
            ORDER BY "createdAt" DESC, "postId" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn find(&self, key: i64) -> RepoResult<Option<PostRecord>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                "postId", title, "titleDirection", content, author, tags, media,
                "youtubeUrl", "createdAt", "updatedAt"
            FROM posts
            WHERE "postId" = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRecord::from))
    }

    async fn insert(&self, draft: PostDraft) -> RepoResult<PostRecord> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts
                (title, "titleDirection", content, author, tags, media, "youtubeUrl")
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                "postId", title, "titleDirection", content, author, tags, media,
                "youtubeUrl", "createdAt", "updatedAt"
            "#,
        )
        .bind(&draft.title)
        .bind(draft.title_direction.as_str())
        .bind(&draft.content)
        .bind(&draft.author)
        .bind(&draft.tags)
        .bind(draft.media.as_deref())
        .bind(draft.youtube_url.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn replace(&self, key: i64, draft: PostDraft) -> RepoResult<Option<PostRecord>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET
                title = $2,
                "titleDirection" = $3,
                content = $4,
                author = $5,
                tags = $6,
                media = $7,
                "youtubeUrl" = $8,
                "updatedAt" = now()
            WHERE "postId" = $1
            RETURNING
                "postId", title, "titleDirection", content, author, tags, media,
                "youtubeUrl", "createdAt", "updatedAt"
            "#,
        )
        .bind(key)
        .bind(&draft.title)
        .bind(draft.title_direction.as_str())
        .bind(&draft.content)
        .bind(&draft.author)
        .bind(&draft.tags)
        .bind(draft.media.as_deref())
        .bind(draft.youtube_url.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRecord::from))
    }

    async fn delete(&self, key: i64) -> RepoResult<Option<PostRecord>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            DELETE FROM posts
            WHERE "postId" = $1
            RETURNING
                "postId", title, "titleDirection", content, author, tags, media,
                "youtubeUrl", "createdAt", "updatedAt"
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRecord::from))
    }
}
