//! 上报协议处理器
//!
//! 应用记录的 reportingProtocolId 指向上报协议记录，记录的 `protocolHandler`
//! 按 handler_id 在注册表中寻址。处理器负责把网络上行数据投递到应用的 baseUrl。

use crate::error::ProtocolError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// 内置 HTTP POST 上报处理器的注册键
pub const POST_REPORTER: &str = "postHandler";

/// 投递目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTarget {
    pub application_id: String,
    pub application_name: String,
    pub base_url: String,
}

#[async_trait]
pub trait ReportingHandler: Send + Sync {
    fn handler_id(&self) -> &str;

    /// 投递一条数据；`network_id` 为空表示应用自测
    async fn report(
        &self,
        target: &ReportTarget,
        network_id: Option<&str>,
        data: &Value,
    ) -> Result<(), ProtocolError>;
}

/// 把数据原样以 JSON POST 到 baseUrl
pub struct PostReporter {
    http: reqwest::Client,
}

impl PostReporter {
    pub fn new(timeout: Duration) -> Result<Self, ProtocolError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ReportingHandler for PostReporter {
    fn handler_id(&self) -> &str {
        POST_REPORTER
    }

    async fn report(
        &self,
        target: &ReportTarget,
        network_id: Option<&str>,
        data: &Value,
    ) -> Result<(), ProtocolError> {
        if target.base_url.trim().is_empty() {
            return Err(ProtocolError::Config(format!(
                "application {} has no baseUrl",
                target.application_id
            )));
        }
        let response = self.http.post(&target.base_url).json(data).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProtocolError::Remote {
                status: status.as_u16(),
                message,
            });
        }
        debug!(
            target: "lpwan.protocol",
            application_id = %target.application_id,
            network_id = network_id.unwrap_or("-"),
            "data reported to application"
        );
        Ok(())
    }
}
