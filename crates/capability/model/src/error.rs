//! 模型层错误与级联结果

use crate::security::SecurityError;
use lpwan_protocol::ProtocolError;
use lpwan_storage::StorageError;
use serde::Serialize;

/// 模型层错误
///
/// 存储错误按原分类透传；Security 与 Protocol 为模型层新增分类。
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// 口令策略等业务校验失败，消息即失败规则的说明
    #[error("{0}")]
    Validation(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("security error: {0}")]
    Security(#[from] SecurityError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl From<StorageError> for ModelError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => Self::NotFound(what),
            StorageError::Unauthorized(what) => Self::Unauthorized(what),
            StorageError::Store(message) => Self::Store(message),
        }
    }
}

/// 级联删除中失败的一个类别
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeFailure {
    /// 类别名，嵌套级联以 `.` 连接（如 `applications.devices`）
    pub category: String,
    pub message: String,
}

/// 级联删除结果：父记录已删除，列出未能清理的子类别
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub failed: Vec<CascadeFailure>,
}

impl CascadeReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// 记录一个类别的清理结果；失败时写日志并计入报告
    pub(crate) fn record<T>(&mut self, parent: &str, category: &str, result: Result<T, ModelError>) {
        if let Err(err) = result {
            tracing::warn!(
                target: "lpwan.model",
                parent,
                category,
                error = %err,
                "cascade delete step failed"
            );
            self.failed.push(CascadeFailure {
                category: category.to_string(),
                message: err.to_string(),
            });
        }
    }

    /// 合并子记录的级联结果，类别加前缀
    pub(crate) fn absorb(&mut self, prefix: &str, nested: CascadeReport) {
        self.failed
            .extend(nested.failed.into_iter().map(|failure| CascadeFailure {
                category: format!("{prefix}.{}", failure.category),
                message: failure.message,
            }));
    }

    pub(crate) fn finish(self, parent: &str, id: &str) -> Self {
        if !self.is_clean() {
            lpwan_telemetry::record_cascade_failures(self.failed.len() as u64);
            tracing::warn!(
                target: "lpwan.model",
                parent,
                id,
                failed = self.failed.len(),
                "cascade delete finished with failures"
            );
        }
        self
    }
}
