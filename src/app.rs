/*
 * Responsibility
 * - Config読み込み → 依存生成 (store / auth / blob) → Router 組み立て
 * - Middleware の適用 (HTTP / CORS / security headers)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::handlers::health::health;
use crate::config::{BlobBackend, Config, ConfigError, StoreBackend};
use crate::middleware;
use crate::repos::posts::{MemoryPostStore, PgPostStore, PostStore};
use crate::services::auth::build_admin_auth;
use crate::services::blob::{BlobStore, HttpBlobStore, LocalBlobStore, local::PUBLIC_PREFIX};
use crate::services::id_codec::IdCodec;
use crate::state::AppState;

const BLOB_CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,mudawwana=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing (stderr can be hidden depending on
        // how the process is launched).
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    // .env の RUST_LOG も tracing に効かせる
    dotenvy::dotenv().ok();
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting blog API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Builds process-level services and injects them into the shared state.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let posts = build_post_store(config).await?;

    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet)
        .context("invalid SQIDS_* configuration")?;

    let auth = build_admin_auth(config);
    let blobs = build_blob_store(config)?;

    tracing::info!(
        store = posts.backend_name(),
        blobs = blobs.backend_name(),
        "services ready"
    );

    Ok(AppState::new(posts, id_codec, auth, blobs, config.app_env))
}

async fn build_post_store(config: &Config) -> Result<Arc<dyn PostStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;

            // Connection is opened on first use and pooled for the process lifetime.
            let store = PgPostStore::connect_lazy(url, config.database_max_connections)
                .context("invalid DATABASE_URL")?;

            if config.database_auto_migrate {
                store
                    .migrate()
                    .await
                    .context("failed to run database migrations")?;
                tracing::info!("database migrations applied");
            }

            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory post store; posts are lost on restart");
            Ok(Arc::new(MemoryPostStore::new()))
        }
    }
}

fn build_blob_store(config: &Config) -> Result<Arc<dyn BlobStore>> {
    match config.blob_backend {
        BlobBackend::Local => {
            let store = LocalBlobStore::new(&config.upload_dir, &config.public_base_url)?;
            Ok(Arc::new(store))
        }
        BlobBackend::Http => {
            let token = config
                .blob_token
                .clone()
                .ok_or(ConfigError::Missing("BLOB_READ_WRITE_TOKEN"))?;
            let client = reqwest::Client::builder()
                .timeout(BLOB_CLIENT_TIMEOUT)
                .build()
                .context("failed to build blob storage client")?;

            Ok(Arc::new(HttpBlobStore::new(
                client,
                config.blob_api_url.clone(),
                token,
            )))
        }
    }
}

/// Routes + handlers + security headers, without transport-level layers.
pub fn router(state: AppState) -> Router {
    compose(state, None)
}

fn compose(state: AppState, upload_dir: Option<&str>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .nest("/api", api::routes(&state));

    if let Some(dir) = upload_dir {
        router = router.nest_service(&format!("/{PUBLIC_PREFIX}"), ServeDir::new(dir));
    }

    middleware::security_headers::apply(router.with_state(state))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let upload_dir = (config.blob_backend == BlobBackend::Local)
        .then_some(config.upload_dir.as_str());
    let router = compose(state, upload_dir);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config.max_body_bytes)
}
