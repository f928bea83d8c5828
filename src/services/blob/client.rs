//! Object storage interface used by the upload endpoint.
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Result type for blob storage operations.
pub type BlobResult<T> = Result<T, BlobError>;

/// Storage-layer errors (transport/remote rejection/local io).
///
/// Note:
/// - Kept independent from `AppError`; the handler decides the HTTP mapping.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("invalid object name: {0}")]
    InvalidName(String),
    #[error("object already exists: {0}")]
    AlreadyExists(String),
    #[error("blob transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("blob storage rejected upload ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("blob storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid blob url: {0}")]
    Url(#[from] url::ParseError),
}

/// A stored object, readable by anyone at `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub url: String,
}

/// Implementations must be shareable across requests (`Arc<dyn BlobStore>`).
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    // Returns the storage backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Store `body` under `name` with public-read access.
    // An existing object is never replaced (`BlobError::AlreadyExists`).
    async fn put_public(&self, name: &str, content_type: &str, body: Bytes)
    -> BlobResult<StoredBlob>;
}

/// Object names are flat: no separators, no parent references.
pub fn ensure_flat_name(name: &str) -> BlobResult<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(BlobError::InvalidName(name.to_string()));
    }
    Ok(())
}
