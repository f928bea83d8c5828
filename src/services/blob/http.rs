use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use url::Url;

use crate::services::blob::client::{
    BlobError, BlobResult, BlobStore, StoredBlob, ensure_flat_name,
};

const API_VERSION: &str = "7";

/// Managed object storage over HTTP (Vercel Blob compatible `PUT /<name>`).
#[derive(Clone)]
pub struct HttpBlobStore {
    client: reqwest::Client,
    api_url: Url,
    token: String,
}

impl std::fmt::Debug for HttpBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the token
        f.debug_struct("HttpBlobStore")
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    url: String,
}

impl HttpBlobStore {
    pub fn new(client: reqwest::Client, api_url: Url, token: String) -> Self {
        Self {
            client,
            api_url,
            token,
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    async fn put_public(
        &self,
        name: &str,
        content_type: &str,
        body: Bytes,
    ) -> BlobResult<StoredBlob> {
        ensure_flat_name(name)?;
        let target = self.api_url.join(name)?;

        let resp = self
            .client
            .put(target)
            .bearer_auth(&self.token)
            .header("x-api-version", API_VERSION)
            .header("x-content-type", content_type)
            .header("x-add-random-suffix", "0")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        // x-add-random-suffix: 0 → 同名オブジェクトは上書きせず 409
        if status == reqwest::StatusCode::CONFLICT {
            return Err(BlobError::AlreadyExists(name.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BlobError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let stored: PutResponse = resp.json().await?;
        Ok(StoredBlob { url: stored.url })
    }
}
