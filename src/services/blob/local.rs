use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::services::blob::client::{
    BlobError, BlobResult, BlobStore, StoredBlob, ensure_flat_name,
};

/// URL path the app serves local uploads from.
pub const PUBLIC_PREFIX: &str = "uploads";

/// Files under a local directory, served back by this app under `/uploads/`.
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    dir: PathBuf,
    public_root: Url,
}

impl LocalBlobStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: &Url) -> BlobResult<Self> {
        let mut base = public_base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let public_root = base.join(&format!("{PUBLIC_PREFIX}/"))?;

        Ok(Self {
            dir: dir.into(),
            public_root,
        })
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn put_public(
        &self,
        name: &str,
        _content_type: &str,
        body: Bytes,
    ) -> BlobResult<StoredBlob> {
        ensure_flat_name(name)?;

        tokio::fs::create_dir_all(&self.dir).await?;

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.dir.join(name))
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(BlobError::AlreadyExists(name.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        file.write_all(&body).await?;
        file.flush().await?;

        let url = self.public_root.join(name)?;
        Ok(StoredBlob { url: url.into() })
    }
}
