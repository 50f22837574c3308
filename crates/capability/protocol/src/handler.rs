//! 协议处理器接口与注册表
//!
//! 网络协议记录的 `protocolHandler` 字段按 handler_id 在注册表中寻址；
//! 上报协议处理器另存一张表，同样按 handler_id 寻址。

use crate::error::ProtocolError;
use crate::reporting::ReportingHandler;
use crate::types::{
    ProtocolMetadata, RemoteApplication, RemoteCompany, RemoteDevice, RemoteDeviceProfile,
    RemoteNetwork,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 远端网络服务器处理器
///
/// 每次调用独立完成登录与请求，不缓存会话。
#[async_trait]
pub trait NetworkProtocolHandler: Send + Sync {
    /// 注册键（网络协议记录的 protocolHandler）
    fn handler_id(&self) -> &str;

    fn metadata(&self) -> ProtocolMetadata;

    /// 用网络凭据登录一次，验证地址与凭据可用
    async fn test_connection(&self, network: &RemoteNetwork) -> Result<(), ProtocolError>;

    async fn pull_companies(
        &self,
        network: &RemoteNetwork,
    ) -> Result<Vec<RemoteCompany>, ProtocolError>;

    async fn pull_applications(
        &self,
        network: &RemoteNetwork,
    ) -> Result<Vec<RemoteApplication>, ProtocolError>;

    async fn pull_device_profiles(
        &self,
        network: &RemoteNetwork,
    ) -> Result<Vec<RemoteDeviceProfile>, ProtocolError>;

    /// 拉取某个远端应用下的设备
    async fn pull_devices(
        &self,
        network: &RemoteNetwork,
        remote_application_id: &str,
    ) -> Result<Vec<RemoteDevice>, ProtocolError>;
}

/// 处理器注册表（启动时构建，之后只读）
#[derive(Clone, Default)]
pub struct ProtocolRegistry {
    handlers: BTreeMap<String, Arc<dyn NetworkProtocolHandler>>,
    reporters: BTreeMap<String, Arc<dyn ReportingHandler>>,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册处理器，同名覆盖
    pub fn register(&mut self, handler: Arc<dyn NetworkProtocolHandler>) {
        let id = handler.handler_id().to_string();
        tracing::info!(target: "lpwan.protocol", handler = %id, "protocol handler registered");
        self.handlers.insert(id, handler);
    }

    pub fn with(mut self, handler: Arc<dyn NetworkProtocolHandler>) -> Self {
        self.register(handler);
        self
    }

    pub fn get(&self, handler_id: &str) -> Option<Arc<dyn NetworkProtocolHandler>> {
        self.handlers.get(handler_id).cloned()
    }

    /// 查找处理器，未注册时返回 UnknownHandler
    pub fn require(
        &self,
        handler_id: &str,
    ) -> Result<Arc<dyn NetworkProtocolHandler>, ProtocolError> {
        self.get(handler_id)
            .ok_or_else(|| ProtocolError::UnknownHandler(handler_id.to_string()))
    }

    pub fn handlers(&self) -> impl Iterator<Item = &Arc<dyn NetworkProtocolHandler>> {
        self.handlers.values()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ReportingHandler>) -> Self {
        let id = reporter.handler_id().to_string();
        tracing::info!(target: "lpwan.protocol", handler = %id, "reporting handler registered");
        self.reporters.insert(id, reporter);
        self
    }

    /// 查找上报处理器，未注册时返回 UnknownHandler
    pub fn reporter(&self, handler_id: &str) -> Result<Arc<dyn ReportingHandler>, ProtocolError> {
        self.reporters
            .get(handler_id)
            .cloned()
            .ok_or_else(|| ProtocolError::UnknownHandler(handler_id.to_string()))
    }
}
