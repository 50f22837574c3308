//! 存储层错误类型
//!
//! 定义统一的存储错误类型：
//! - NotFound：记录不存在
//! - Unauthorized：跨公司访问（归属校验失败）
//! - Store：底层存储错误（连接、约束、序列化）

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("{0}")]
    Store(String),
}

impl StorageError {
    /// 构造底层存储错误。
    pub fn new(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// 构造记录不存在错误（表名 + ID）。
    pub fn not_found(table: &str, id: &str) -> Self {
        Self::NotFound(format!("{table}/{id}"))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("record encoding: {err}"))
    }
}
