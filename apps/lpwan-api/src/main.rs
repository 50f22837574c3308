//! LPWAN 设备管理 HTTP 服务入口。
//!
//! 启动顺序：.env → 配置 → tracing → 存储后端 → 协议注册表 → ModelApi 初始化
//! → 可选的管理员账号 → 认证服务 → axum 服务。

mod handlers;
mod middleware;
mod routes;
mod utils;

use axum::{Router, middleware as axum_middleware};
use lpwan_auth::{AuthService, JwtManager};
use lpwan_config::{AppConfig, ConfigError, StorageBackend};
use lpwan_model::ModelApi;
use lpwan_storage::{InMemoryRecordStore, PgRecordStore, RecordStore};
use lpwan_telemetry::init_tracing;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

/// 请求处理共享状态。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub models: Arc<ModelApi>,
    /// Postgres 后端时用于 readyz 探测
    pub db_pool: Option<PgPool>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let (store, db_pool): (Arc<dyn RecordStore>, Option<PgPool>) = match config.storage {
        StorageBackend::Memory => (Arc::new(InMemoryRecordStore::new()), None),
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| ConfigError::Missing("LPWAN_DATABASE_URL".to_string()))?;
            let pg = PgRecordStore::connect(url).await?;
            let pool = pg.pool.clone();
            (Arc::new(pg), Some(pool))
        }
    };
    tracing::info!(target: "lpwan.api", storage = ?config.storage, "record store ready");

    let registry =
        lpwan_protocol::default_registry(Duration::from_secs(config.protocol_timeout_seconds))?;
    let models = ModelApi::new(store, registry);
    models.initialize().await;

    if let (Some(username), Some(password)) = (
        config.admin_username.as_deref(),
        config.admin_password.as_deref(),
    ) {
        let admin = models
            .seed_admin(&config.admin_company, username, password)
            .await?;
        tracing::info!(target: "lpwan.api", user_id = %admin.id, username, "admin account ready");
    }

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_ttl_seconds);
    let auth = Arc::new(AuthService::new(
        models.data.users.clone(),
        models.data.companies.clone(),
        jwt,
    ));
    let state = AppState {
        auth,
        models: Arc::new(models),
        db_pool,
    };

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(target: "lpwan.api", addr = %config.http_addr, "http server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// 组装完整路由：探针在根路径，业务接口在 /api 下。
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_health_router())
        .nest("/api", routes::create_api_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(axum_middleware::from_fn(middleware::request_context))
}
