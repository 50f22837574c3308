//! 应用数据转发：启停、自测与网络上行数据投递
//!
//! 应用的 running 标记持久化在应用记录上。投递时按应用的 reportingProtocolId
//! 解析上报协议记录，再按其 protocolHandler 在注册表中找到处理器。

use crate::{ApplicationModel, ModelError, NetworkModel, ReportingProtocolModel};
use lpwan_protocol::{ProtocolRegistry, ReportTarget, ReportingHandler};
use lpwan_storage::{ApplicationRecord, ApplicationUpdate, ListOptions};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// 一次上行投递的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IngestOutcome {
    Delivered,
    /// 网络 securityData.enabled 不为 true，数据丢弃
    NetworkDisabled,
    /// 应用未启动，数据丢弃
    ApplicationStopped,
}

#[derive(Clone)]
pub struct ApplicationRelay {
    applications: ApplicationModel,
    networks: NetworkModel,
    reporting: ReportingProtocolModel,
    registry: ProtocolRegistry,
}

impl ApplicationRelay {
    pub fn new(
        applications: ApplicationModel,
        networks: NetworkModel,
        reporting: ReportingProtocolModel,
        registry: ProtocolRegistry,
    ) -> Self {
        Self {
            applications,
            networks,
            reporting,
            registry,
        }
    }

    /// 校验投递目标后置 running。
    pub async fn start_application(&self, id: &str) -> Result<ApplicationRecord, ModelError> {
        let application = self.applications.retrieve_application(id).await?;
        self.resolve(&application).await?;
        let record = self.set_running(id, true).await?;
        tracing::info!(target: "lpwan.model", application_id = id, "application started");
        Ok(record)
    }

    pub async fn stop_application(&self, id: &str) -> Result<ApplicationRecord, ModelError> {
        self.applications.retrieve_application(id).await?;
        let record = self.set_running(id, false).await?;
        tracing::info!(target: "lpwan.model", application_id = id, "application stopped");
        Ok(record)
    }

    /// 不经网络直接投递一条数据，不要求应用已启动。
    pub async fn test_application(&self, id: &str, data: &Value) -> Result<(), ModelError> {
        let application = self.applications.retrieve_application(id).await?;
        let (target, reporter) = self.resolve(&application).await?;
        self.deliver(&target, &reporter, None, data).await
    }

    /// 网络上行数据转发给应用。
    ///
    /// 网络或应用不存在返回 NotFound；网络未启用或应用未启动时不投递。
    pub async fn ingest(
        &self,
        application_id: &str,
        network_id: &str,
        data: &Value,
    ) -> Result<IngestOutcome, ModelError> {
        let network = self.networks.retrieve_network(network_id).await?;
        let enabled = network
            .security_data
            .as_ref()
            .and_then(|data| data.get("enabled"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !enabled {
            tracing::debug!(target: "lpwan.model", network_id, application_id, "network disabled, data dropped");
            return Ok(IngestOutcome::NetworkDisabled);
        }

        let application = self.applications.retrieve_application(application_id).await?;
        if !application.running {
            tracing::debug!(target: "lpwan.model", network_id, application_id, "application stopped, data dropped");
            return Ok(IngestOutcome::ApplicationStopped);
        }
        let (target, reporter) = self.resolve(&application).await?;
        self.deliver(&target, &reporter, Some(network_id), data)
            .await?;
        Ok(IngestOutcome::Delivered)
    }

    /// 启动时检查标记为 running 的应用，投递目标失效的改为停止。
    ///
    /// 返回仍在运行的应用数。
    pub async fn resume_applications(&self) -> Result<usize, ModelError> {
        let running = self
            .applications
            .retrieve_applications(&ListOptions::new().filter("running", true))
            .await?;
        let mut resumed = 0;
        for application in running.records {
            match self.resolve(&application).await {
                Ok(_) => resumed += 1,
                Err(err) => {
                    tracing::warn!(target: "lpwan.model", application_id = %application.id, error = %err, "application cannot resume, stopping");
                    self.set_running(&application.id, false).await?;
                }
            }
        }
        Ok(resumed)
    }

    async fn set_running(&self, id: &str, running: bool) -> Result<ApplicationRecord, ModelError> {
        let update = ApplicationUpdate {
            running: Some(running),
            ..ApplicationUpdate::default()
        };
        self.applications.update_application(id, &update).await
    }

    /// 应用必须有 baseUrl 和可解析的上报协议。
    async fn resolve(
        &self,
        application: &ApplicationRecord,
    ) -> Result<(ReportTarget, Arc<dyn ReportingHandler>), ModelError> {
        let base_url = application
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                ModelError::Validation(format!("application {} has no baseUrl", application.id))
            })?;
        let reporting_protocol_id = application
            .reporting_protocol_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ModelError::Validation(format!(
                    "application {} has no reportingProtocolId",
                    application.id
                ))
            })?;
        let protocol = match self
            .reporting
            .retrieve_reporting_protocol(reporting_protocol_id)
            .await
        {
            Ok(protocol) => protocol,
            Err(ModelError::NotFound(_)) => {
                return Err(ModelError::Validation(format!(
                    "unknown reporting protocol {reporting_protocol_id}"
                )));
            }
            Err(err) => return Err(err),
        };
        let reporter = self.registry.reporter(&protocol.protocol_handler)?;
        let target = ReportTarget {
            application_id: application.id.clone(),
            application_name: application.name.clone(),
            base_url: base_url.to_string(),
        };
        Ok((target, reporter))
    }

    async fn deliver(
        &self,
        target: &ReportTarget,
        reporter: &Arc<dyn ReportingHandler>,
        network_id: Option<&str>,
        data: &Value,
    ) -> Result<(), ModelError> {
        match reporter.report(target, network_id, data).await {
            Ok(()) => {
                lpwan_telemetry::record_relay(true);
                Ok(())
            }
            Err(err) => {
                lpwan_telemetry::record_relay(false);
                tracing::warn!(
                    target: "lpwan.model",
                    application_id = %target.application_id,
                    network_id = network_id.unwrap_or("-"),
                    error = %err,
                    "relay to application failed"
                );
                Err(err.into())
            }
        }
    }
}
