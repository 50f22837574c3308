//! 数据库连接管理
//!
//! - connect_pool：建立 Postgres 连接池（最大连接数 8）

use crate::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// 建立 Postgres 连接池
///
/// # 参数
/// - `database_url`：Postgres 连接字符串
pub async fn connect_pool(database_url: &str) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await?;
    tracing::info!(target: "lpwan.storage", "postgres pool ready");
    Ok(pool)
}
