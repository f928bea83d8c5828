/*
 * Responsibility
 * - 環境変数や設定の読み込み (ADMIN_PASSWORD, DATABASE_URL, BLOB_*, CORS 許可など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobBackend {
    Local,
    Http,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub max_body_bytes: usize,

    pub admin_password: String,
    pub admin_token_ttl_seconds: u64,
    pub admin_token_leeway_seconds: u64,

    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub database_auto_migrate: bool,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,

    pub blob_backend: BlobBackend,
    pub blob_api_url: Url,
    pub blob_token: Option<String>,
    pub upload_dir: String,
    pub public_base_url: Url,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // secrets (admin password, blob token, database url) are not printed
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("store_backend", &self.store_backend)
            .field("blob_backend", &self.blob_backend)
            .field("public_base_url", &self.public_base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = env_parse("PORT", 3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let max_body_bytes = env_parse("MAX_BODY_BYTES", 12 * 1024 * 1024);

        // ADMIN_PASSWORD は JWT の署名鍵も兼ねる
        let admin_password =
            env_non_empty("ADMIN_PASSWORD").ok_or(ConfigError::Missing("ADMIN_PASSWORD"))?;

        let admin_token_ttl_seconds = env_parse("ADMIN_TOKEN_TTL_SECONDS", 24 * 60 * 60);
        let admin_token_leeway_seconds = env_parse("ADMIN_TOKEN_LEEWAY_SECONDS", 0);

        let store_backend = match env_non_empty("STORE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" | "pg" => StoreBackend::Postgres,
            "memory" | "mem" => StoreBackend::Memory,
            _ => return Err(ConfigError::Invalid("STORE_BACKEND")),
        };

        let database_url = env_non_empty("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let database_max_connections = env_parse("DATABASE_MAX_CONNECTIONS", 5);
        let database_auto_migrate = env_parse("DATABASE_AUTO_MIGRATE", true);

        let sqids_min_length = env_parse("SQIDS_MIN_LENGTH", 10);

        let sqids_alphabet = std::env::var("SQIDS_ALPHABET").unwrap_or_else(|_| {
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string()
        });

        let blob_backend = match env_non_empty("BLOB_BACKEND")
            .unwrap_or_else(|| "local".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "local" | "fs" => BlobBackend::Local,
            "http" | "vercel" => BlobBackend::Http,
            _ => return Err(ConfigError::Invalid("BLOB_BACKEND")),
        };

        let blob_api_url = Url::parse(
            &env_non_empty("BLOB_API_URL")
                .unwrap_or_else(|| "https://blob.vercel-storage.com".to_string()),
        )
        .map_err(|_| ConfigError::Invalid("BLOB_API_URL"))?;

        let blob_token = env_non_empty("BLOB_READ_WRITE_TOKEN");
        if blob_backend == BlobBackend::Http && blob_token.is_none() {
            return Err(ConfigError::Missing("BLOB_READ_WRITE_TOKEN"));
        }

        let upload_dir = env_non_empty("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_string());

        let public_base_url = Url::parse(
            &env_non_empty("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{}", port)),
        )
        .map_err(|_| ConfigError::Invalid("PUBLIC_BASE_URL"))?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            max_body_bytes,
            admin_password,
            admin_token_ttl_seconds,
            admin_token_leeway_seconds,
            store_backend,
            database_url,
            database_max_connections,
            database_auto_migrate,
            sqids_min_length,
            sqids_alphabet,
            blob_backend,
            blob_api_url,
            blob_token,
            upload_dir,
            public_base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_accepts_short_and_long_production_names() {
        assert_eq!(AppEnv::parse("production"), AppEnv::Production);
        assert_eq!(AppEnv::parse("PROD"), AppEnv::Production);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Development);
        assert!(!AppEnv::parse("").is_production());
    }
}
