//! 内存存储实现模块
//!
//! 用于本地演示和测试，进程退出即丢失。
//!
//! 包含以下实现：
//! - RecordStore: InMemoryRecordStore

pub mod record;

pub use record::*;
