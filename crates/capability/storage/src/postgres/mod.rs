//! PostgreSQL 存储实现模块
//!
//! 所有集合共享一张 `records` 表，文档存放于 jsonb 列。
//!
//! 包含以下实现：
//! - RecordStore: PgRecordStore

pub mod record;

pub use record::*;
