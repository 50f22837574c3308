//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 记录存储后端。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub storage: StorageBackend,
    /// storage 为 Postgres 时必填
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: u64,
    /// 协议处理器访问远端的 HTTP 超时
    pub protocol_timeout_seconds: u64,
    pub admin_company: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = read_optional("LPWAN_JWT_SECRET")
            .ok_or_else(|| ConfigError::Missing("LPWAN_JWT_SECRET".to_string()))?;
        let http_addr =
            env::var("LPWAN_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:3200".to_string());
        let storage = read_storage("LPWAN_STORAGE")?;
        let database_url = read_optional("LPWAN_DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("LPWAN_DATABASE_URL".to_string()));
        }
        let jwt_ttl_seconds = read_u64_with_default("LPWAN_JWT_TTL_SECONDS", 86_400)?;
        let protocol_timeout_seconds =
            read_u64_with_default("LPWAN_PROTOCOL_TIMEOUT_SECONDS", 30)?;
        let admin_company =
            read_optional("LPWAN_ADMIN_COMPANY").unwrap_or_else(|| "SysAdmins".to_string());
        let admin_username = read_optional("LPWAN_ADMIN_USERNAME");
        let admin_password = read_optional("LPWAN_ADMIN_PASSWORD");
        if admin_username.is_some() != admin_password.is_some() {
            return Err(ConfigError::Missing(
                "LPWAN_ADMIN_USERNAME and LPWAN_ADMIN_PASSWORD must be set together".to_string(),
            ));
        }

        Ok(Self {
            http_addr,
            storage,
            database_url,
            jwt_secret,
            jwt_ttl_seconds,
            protocol_timeout_seconds,
            admin_company,
            admin_username,
            admin_password,
        })
    }
}

fn read_storage(key: &str) -> Result<StorageBackend, ConfigError> {
    match read_optional(key) {
        None => Ok(StorageBackend::Memory),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            _ => Err(ConfigError::Invalid(key.to_string(), value)),
        },
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
