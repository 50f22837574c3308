//! 记录存储接口 Trait 定义
//!
//! RecordStore 是文档集合之上的通用 CRUD 原语，按逻辑表名寻址：
//! - insert：插入并返回存储后的记录（含生成的 ID）
//! - fetch_one：按键值查找单条记录
//! - fetch_many：按过滤条件分页查询，返回总数与当前页
//! - update / upsert：按键合并字段
//! - delete：按键删除
//!
//! 设计原则：
//! - 逻辑键 `id` 由实现翻译为原生主键字段
//! - 过滤键 `search` 翻译为 name 模糊匹配
//! - 所有接口返回 StorageError，不做重试
//! - 使用 async_trait 支持动态分发（后端在启动时注入）

use crate::error::StorageError;
use async_trait::async_trait;
use serde_json::Value;

/// 文档记录（JSON 对象）。
pub type Document = serde_json::Map<String, Value>;

/// 批量查询条件。
///
/// `filter` 中的数组值表示“字段取值属于该集合”。
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub filter: Document,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// 批量查询结果。
///
/// `total_count` 为分页前的匹配总数。
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub total_count: usize,
    pub records: Vec<Document>,
}

/// 记录存储接口
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 插入记录，未携带 ID 时自动生成
    async fn insert(&self, table: &str, record: Document) -> Result<Document, StorageError>;

    /// 按键值查找第一条匹配记录
    async fn fetch_one(
        &self,
        table: &str,
        key: &str,
        value: &Value,
    ) -> Result<Option<Document>, StorageError>;

    /// 分页查询
    async fn fetch_many(&self, table: &str, query: &RecordQuery)
    -> Result<RecordPage, StorageError>;

    /// 合并更新，`record[key]` 定位目标记录；目标不存在时返回 None
    async fn update(
        &self,
        table: &str,
        key: &str,
        record: Document,
    ) -> Result<Option<Document>, StorageError>;

    /// 存在则合并更新，否则插入
    async fn upsert(&self, table: &str, key: &str, record: Document)
    -> Result<Document, StorageError>;

    /// 删除第一条匹配记录，返回是否删除
    async fn delete(&self, table: &str, key: &str, value: &Value) -> Result<bool, StorageError>;
}
