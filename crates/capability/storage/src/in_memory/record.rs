//! 记录内存存储实现
//!
//! 功能：
//! - 按逻辑表名分集合保存文档
//! - 保持插入顺序（分页结果稳定）
//! - 过滤、搜索、成员匹配与后端 PostgreSQL 实现语义一致

use crate::adapter::{
    LOGICAL_ID, NATIVE_ID, generate_id, matches_filter, merge, native_key, scrub_filter,
    scrub_value, to_logical, to_native,
};
use crate::error::StorageError;
use crate::traits::{Document, RecordPage, RecordQuery, RecordStore};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// 记录内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryRecordStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryRecordStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// 指定集合中的记录数
    pub fn count(&self, table: &str) -> usize {
        self.collections
            .read()
            .map(|map| map.get(table).map(Vec::len).unwrap_or(0))
            .unwrap_or(0)
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn key_filter(key: &str, value: &Value) -> Document {
    let mut filter = Document::new();
    filter.insert(native_key(key).to_string(), scrub_value(value));
    filter
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, table: &str, record: Document) -> Result<Document, StorageError> {
        let mut document = to_native(record);
        let has_id = document
            .get(NATIVE_ID)
            .and_then(Value::as_str)
            .is_some_and(|id| !id.is_empty());
        if !has_id {
            document.insert(NATIVE_ID.to_string(), Value::String(generate_id()));
        }
        let mut map = self
            .collections
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let items = map.entry(table.to_string()).or_default();
        if items.iter().any(|item| item.get(NATIVE_ID) == document.get(NATIVE_ID)) {
            return Err(StorageError::new(format!("{table}: duplicate id")));
        }
        items.push(document.clone());
        Ok(to_logical(document))
    }

    async fn fetch_one(
        &self,
        table: &str,
        key: &str,
        value: &Value,
    ) -> Result<Option<Document>, StorageError> {
        let filter = key_filter(key, value);
        let map = self
            .collections
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let found = map
            .get(table)
            .and_then(|items| items.iter().find(|item| matches_filter(item, &filter)))
            .cloned()
            .map(to_logical);
        Ok(found)
    }

    async fn fetch_many(
        &self,
        table: &str,
        query: &RecordQuery,
    ) -> Result<RecordPage, StorageError> {
        let filter = scrub_filter(&query.filter);
        let map = self
            .collections
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let matched: Vec<&Document> = map
            .get(table)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| matches_filter(item, &filter))
                    .collect()
            })
            .unwrap_or_default();
        let total_count = matched.len();
        let limit = query.limit.filter(|limit| *limit > 0).unwrap_or(usize::MAX);
        let records = matched
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(limit)
            .cloned()
            .map(to_logical)
            .collect();
        Ok(RecordPage {
            total_count,
            records,
        })
    }

    async fn update(
        &self,
        table: &str,
        key: &str,
        record: Document,
    ) -> Result<Option<Document>, StorageError> {
        let Some(value) = record.get(key).cloned() else {
            return Err(StorageError::new(format!("{table}: update without {key}")));
        };
        let filter = key_filter(key, &value);
        let mut patch = to_native(record);
        patch.remove(NATIVE_ID);
        let mut map = self
            .collections
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(target) = map
            .get_mut(table)
            .and_then(|items| items.iter_mut().find(|item| matches_filter(item, &filter)))
        else {
            return Ok(None);
        };
        merge(target, patch);
        Ok(Some(to_logical(target.clone())))
    }

    async fn upsert(
        &self,
        table: &str,
        key: &str,
        record: Document,
    ) -> Result<Document, StorageError> {
        if let Some(updated) = self.update(table, key, record.clone()).await? {
            return Ok(updated);
        }
        let mut record = record;
        if key != LOGICAL_ID {
            record.remove(LOGICAL_ID);
        }
        self.insert(table, record).await
    }

    async fn delete(&self, table: &str, key: &str, value: &Value) -> Result<bool, StorageError> {
        let filter = key_filter(key, value);
        let mut map = self
            .collections
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(items) = map.get_mut(table) else {
            return Ok(false);
        };
        match items.iter().position(|item| matches_filter(item, &filter)) {
            Some(index) => {
                items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
