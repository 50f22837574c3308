//! # LPWAN Storage 模块
//!
//! 文档记录存储适配层与各实体 DAO。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：RecordStore，按逻辑表名寻址的通用 CRUD
//! 2. **适配辅助** (`adapter.rs`)：ID 键翻译、取值清洗、搜索与成员匹配
//! 3. **实现层**：
//!    - `in_memory/`：内存实现（测试与演示）
//!    - `postgres/`：PostgreSQL 实现（单张 jsonb 文档表）
//! 4. **数据模型层** (`models.rs`)：实体记录与创建/更新输入
//! 5. **DAO 层** (`dao/`)：每个实体一个 DAO，含跨实体归属校验
//! 6. **错误处理层** (`error.rs`)：NotFound / Unauthorized / Store
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use lpwan_storage::{DataAccess, InMemoryRecordStore};
//! use std::sync::Arc;
//!
//! let data = DataAccess::new(Arc::new(InMemoryRecordStore::new()));
//! let company = data.companies.create("acme", domain::CompanyType::Vendor).await?;
//! ```
//!
//! ## 设计约束
//!
//! - 记录 ID 为 24 位小写十六进制字符串
//! - networkSettings 以 JSON 字符串落库，读出时还原为对象
//! - 不做重试、缓存与事务

pub mod adapter;
pub mod connection;
pub mod dao;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod traits;
pub mod validation;

pub use connection::*;
pub use dao::*;
pub use error::*;
pub use models::*;
pub use traits::*;
pub use validation::*;

pub use in_memory::InMemoryRecordStore;
pub use postgres::PgRecordStore;
