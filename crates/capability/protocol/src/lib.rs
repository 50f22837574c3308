//! # 网络协议处理器能力模块
//!
//! 模型层与远端网络服务器之间的插件边界：
//! - **NetworkProtocolHandler**：处理器接口（元数据、连接测试、拉取组织/应用/档案/设备）
//! - **ProtocolRegistry**：按 protocolHandler 名称寻址的处理器注册表
//! - **LoraServerV2Handler**：LoRa App Server v2 REST 实现
//! - **ReportingHandler**：上报处理器接口，内置 PostReporter 把上行数据 POST 到应用 baseUrl
//!
//! ## 架构设计
//!
//! ```text
//! NetworkProtocol 记录 (protocolHandler)
//!       │
//!       ▼
//! ProtocolRegistry
//!       │
//!       ├── LoraServerV2Handler ──HTTP──▶ LoRa App Server
//!       └── PostReporter ──HTTP POST──▶ 应用 baseUrl
//! ```
//!
//! 处理器不访问本地存储；拉取结果由模型层对账写入。

mod error;
mod handler;
mod lora_v2;
mod reporting;
mod types;

pub use error::ProtocolError;
pub use handler::{NetworkProtocolHandler, ProtocolRegistry};
pub use lora_v2::{LORA_SERVER_V2, LoraServerV2Handler};
pub use reporting::{POST_REPORTER, PostReporter, ReportTarget, ReportingHandler};
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

/// 构建包含全部内置处理器的注册表
pub fn default_registry(timeout: Duration) -> Result<ProtocolRegistry, ProtocolError> {
    let lora = LoraServerV2Handler::new(timeout)?;
    let post = PostReporter::new(timeout)?;
    Ok(ProtocolRegistry::new()
        .with(Arc::new(lora))
        .with_reporter(Arc::new(post)))
}
