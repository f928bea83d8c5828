#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, Response, StatusCode},
};
use bytes::Bytes;
use mudawwana::{
    app,
    config::AppEnv,
    repos::posts::MemoryPostStore,
    services::{
        auth::{AdminAuth, AdminTokens},
        blob::{BlobError, BlobResult, BlobStore, StoredBlob},
        id_codec::IdCodec,
    },
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub const PASSWORD: &str = "كلمة-سر-الاختبار";
pub const SESSION_COOKIE: &str = "admin-auth=true";
const DAY: u64 = 24 * 60 * 60;
const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A put_public call as seen by the storage backend.
#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub name: String,
    pub content_type: String,
    pub body: Bytes,
}

/// Accepts every put, except that the next `taken` names report as existing.
#[derive(Debug, Default)]
pub struct RecordingBlobStore {
    puts: Mutex<Vec<RecordedPut>>,
    attempts: Mutex<Vec<String>>,
    taken: AtomicUsize,
}

impl RecordingBlobStore {
    pub fn puts(&self) -> Vec<RecordedPut> {
        self.puts.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn mark_next_names_taken(&self, count: usize) {
        self.taken.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    async fn put_public(
        &self,
        name: &str,
        content_type: &str,
        body: Bytes,
    ) -> BlobResult<StoredBlob> {
        self.attempts.lock().unwrap().push(name.to_string());
        if self
            .taken
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(BlobError::AlreadyExists(name.to_string()));
        }

        self.puts.lock().unwrap().push(RecordedPut {
            name: name.to_string(),
            content_type: content_type.to_string(),
            body,
        });
        Ok(StoredBlob {
            url: format!("https://blobs.test/{name}"),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub posts: MemoryPostStore,
    pub blobs: Arc<RecordingBlobStore>,
    pub auth: Arc<AdminAuth>,
    pub id_codec: IdCodec,
}

impl TestApp {
    pub fn new() -> Self {
        let posts = MemoryPostStore::new();
        let blobs = Arc::new(RecordingBlobStore::default());
        let auth = Arc::new(AdminAuth::new(
            PASSWORD.to_string(),
            AdminTokens::new(PASSWORD, DAY, 0),
        ));
        let id_codec = IdCodec::new(10, ALPHABET).unwrap();

        let state = AppState::new(
            Arc::new(posts.clone()),
            id_codec.clone(),
            auth.clone(),
            blobs.clone(),
            AppEnv::Development,
        );

        Self {
            router: app::router(state),
            posts,
            blobs,
            auth,
            id_codec,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.unwrap();
        TestResponse::read(res).await
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.auth.issue_token().unwrap())
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    async fn read(res: Response<Body>) -> Self {
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(axum::http::header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }
}

pub fn json_request(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
}

pub fn with_json(builder: axum::http::request::Builder, body: &Value) -> Request<Body> {
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn empty(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder().method(method).uri(uri)
}
