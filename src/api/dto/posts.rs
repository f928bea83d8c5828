/*
 * Responsibility
 * - Posts の request/response DTO
 * - 公開 ID を返す (ストア内部のキーは漏らさない)
 * - 入力の正規化 (trim / tags のカンマ区切り文字列対応) とバリデーション
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MissingFields;
use crate::repos::posts::{PostDraft, PostRecord, TitleDirection};

/// `tags` arrives either as a JSON array or as one comma-joined string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Joined(String),
}

impl TagsInput {
    pub fn normalize(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            TagsInput::List(tags) => tags,
            TagsInput::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        };

        raw.iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Body of `POST /posts` and `PUT /posts/{id}` (full replace).
///
/// Unknown fields (`_id`, `createdAt`, ...) are ignored so clients can send a
/// fetched document straight back.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub title: Option<String>,
    pub title_direction: Option<TitleDirection>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub tags: Option<TagsInput>,
    pub media: Option<String>,
    pub youtube_url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl PostRequest {
    /// Validates the required fields and normalizes the rest.
    ///
    /// `title` and `author` are stored trimmed; `content` is stored verbatim.
    pub fn into_draft(self) -> Result<PostDraft, MissingFields> {
        let title = non_blank(self.title);
        let content = non_blank(self.content);
        let author = non_blank(self.author);

        let missing = MissingFields {
            title: title.is_none(),
            content: content.is_none(),
            author: author.is_none(),
        };

        let (Some(title), Some(content), Some(author)) = (title, content, author) else {
            return Err(missing);
        };

        Ok(PostDraft {
            title: title.trim().to_string(),
            title_direction: self.title_direction.unwrap_or_default(),
            content,
            author: author.trim().to_string(),
            tags: self.tags.map(TagsInput::normalize).unwrap_or_default(),
            media: non_blank(self.media).map(|m| m.trim().to_string()),
            youtube_url: non_blank(self.youtube_url).map(|u| u.trim().to_string()),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    #[serde(rename = "_id")]
    pub id: String, // encoded
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

impl PostResponse {
    pub fn from_record(public_id: String, record: PostRecord) -> Self {
        Self {
            id: public_id,
            title: record.title,
            title_direction: record.title_direction,
            content: record.content,
            author: record.author,
            tags: record.tags,
            media: record.media,
            youtube_url: record.youtube_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletePostResponse {
    pub message: &'static str,
}
