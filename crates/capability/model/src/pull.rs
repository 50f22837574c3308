//! 远端网络拉取与本地对账
//!
//! 顺序：公司 → 应用 → 设备档案 → 设备。公司按名称判断是否已存在；应用与设备档案
//! 只在所属公司名下按名称查找，设备只在所属应用名下查找，不会匹配到其他租户的同名记录。
//! 已存在的记录不重复创建（设备档案刷新 networkSettings），关联记录仅在缺失时创建。
//! 新记录经由各模型创建，与 REST 创建走同一路径。
//! 远端 ID 到本地 ID 的映射只在单次拉取内有效，远端 ID 另存为协议数据。

use crate::security::ProtocolDataAccess;
use crate::{
    ApplicationModel, CompanyModel, DeviceModel, DeviceProfileModel, ModelError, NetworkModel,
    NetworkProtocolModel,
};
use domain::CompanyType;
use lpwan_protocol::{NetworkProtocolHandler, RemoteNetwork};
use lpwan_storage::{
    DataAccess, DeviceProfileUpdate, NetworkRecord, NewApplication, NewDevice, NewDeviceProfile,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// 单一类别的对账计数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullCount {
    pub created: usize,
    pub existing: usize,
    /// 找不到本地归属（公司或应用）而跳过的条数
    pub skipped: usize,
}

/// 一次拉取的结果汇总。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullReport {
    pub network_id: String,
    pub companies: PullCount,
    pub applications: PullCount,
    pub device_profiles: PullCount,
    pub devices: PullCount,
    pub links_created: usize,
}

impl PullReport {
    fn new(network_id: &str) -> Self {
        Self {
            network_id: network_id.to_string(),
            ..Self::default()
        }
    }

    /// 新建的实体与关联总数。
    pub fn created_total(&self) -> usize {
        self.companies.created
            + self.applications.created
            + self.device_profiles.created
            + self.devices.created
            + self.links_created
    }
}

/// 本次拉取的上下文。
struct PullContext {
    network: NetworkRecord,
    remote: RemoteNetwork,
    handler: Arc<dyn NetworkProtocolHandler>,
}

impl PullContext {
    fn network_type_id(&self) -> &str {
        &self.network.network_type_id
    }
}

/// 远端 ID -> 本地 ID
type IdMap = BTreeMap<String, String>;

/// 拉取时用于创建与查找本地记录的模型。
#[derive(Clone)]
pub struct SyncTargets {
    pub companies: CompanyModel,
    pub applications: ApplicationModel,
    pub device_profiles: DeviceProfileModel,
    pub devices: DeviceModel,
}

#[derive(Clone)]
pub struct NetworkSync {
    data: DataAccess,
    security: ProtocolDataAccess,
    networks: NetworkModel,
    protocols: NetworkProtocolModel,
    targets: SyncTargets,
}

impl NetworkSync {
    pub fn new(
        data: DataAccess,
        security: ProtocolDataAccess,
        networks: NetworkModel,
        protocols: NetworkProtocolModel,
        targets: SyncTargets,
    ) -> Self {
        Self {
            data,
            security,
            networks,
            protocols,
            targets,
        }
    }

    /// 拉取网络的全部远端数据并对账。
    pub async fn pull_network(&self, network_id: &str) -> Result<PullReport, ModelError> {
        self.measured(network_id, async {
            let ctx = self.context(network_id).await?;
            let mut report = PullReport::new(network_id);
            let companies = self.pull_companies_with(&ctx, &mut report).await?;
            let applications = self
                .pull_applications_with(&ctx, &companies, &mut report)
                .await?;
            let profiles = self
                .pull_device_profiles_with(&ctx, &companies, &mut report)
                .await?;
            self.pull_devices_with(&ctx, &applications, &profiles, &mut report)
                .await?;
            Ok(report)
        })
        .await
    }

    /// 只拉取远端组织并对账为本地公司。
    pub async fn pull_companies(&self, network_id: &str) -> Result<PullReport, ModelError> {
        self.measured(network_id, async {
            let ctx = self.context(network_id).await?;
            let mut report = PullReport::new(network_id);
            self.pull_companies_with(&ctx, &mut report).await?;
            Ok(report)
        })
        .await
    }

    async fn measured(
        &self,
        network_id: &str,
        pull: impl std::future::Future<Output = Result<PullReport, ModelError>>,
    ) -> Result<PullReport, ModelError> {
        let started = Instant::now();
        let result = pull.await;
        let latency_ms = started.elapsed().as_millis() as u64;
        lpwan_telemetry::record_pull_run(latency_ms, result.is_ok());
        match &result {
            Ok(report) => {
                lpwan_telemetry::record_pulled_created(report.created_total() as u64);
                tracing::info!(
                    target: "lpwan.model",
                    network_id,
                    latency_ms,
                    created = report.created_total(),
                    "network pull finished"
                );
            }
            Err(err) => {
                tracing::warn!(target: "lpwan.model", network_id, latency_ms, error = %err, "network pull failed");
            }
        }
        result
    }

    async fn context(&self, network_id: &str) -> Result<PullContext, ModelError> {
        let network = self.networks.retrieve_network(network_id).await?;
        let (_, handler) = self
            .protocols
            .handler_for(&network.network_protocol_id)
            .await?;
        let remote = NetworkModel::remote_view(&network);
        Ok(PullContext {
            network,
            remote,
            handler,
        })
    }

    /// 记录远端 ID，供后续推送或排查使用。
    async fn remember(
        &self,
        ctx: &PullContext,
        prefix: &str,
        local_id: &str,
        remote_id: &str,
    ) -> Result<(), ModelError> {
        self.security
            .put_protocol_data_for_key(
                &ctx.network.id,
                &ctx.network.network_protocol_id,
                &format!("{prefix}:{local_id}"),
                remote_id,
            )
            .await?;
        Ok(())
    }

    async fn pull_companies_with(
        &self,
        ctx: &PullContext,
        report: &mut PullReport,
    ) -> Result<IdMap, ModelError> {
        let remote_companies = ctx.handler.pull_companies(&ctx.remote).await?;
        let mut ids = IdMap::new();
        for remote in remote_companies {
            let company = match self
                .targets
                .companies
                .retrieve_company_by_name(&remote.name)
                .await?
            {
                Some(existing) => {
                    report.companies.existing += 1;
                    existing
                }
                None => {
                    let created = self
                        .targets
                        .companies
                        .create_company(&remote.name, CompanyType::Vendor)
                        .await?;
                    report.companies.created += 1;
                    tracing::info!(target: "lpwan.model", company = %created.name, "company pulled");
                    created
                }
            };
            if self
                .data
                .company_links
                .find(&company.id, ctx.network_type_id())
                .await?
                .is_none()
            {
                self.data
                    .company_links
                    .create(&company.id, ctx.network_type_id(), json!({ "region": "" }))
                    .await?;
                report.links_created += 1;
            }
            self.remember(ctx, "co", &company.id, &remote.id).await?;
            ids.insert(remote.id, company.id);
        }
        Ok(ids)
    }

    async fn pull_applications_with(
        &self,
        ctx: &PullContext,
        companies: &IdMap,
        report: &mut PullReport,
    ) -> Result<IdMap, ModelError> {
        let remote_applications = ctx.handler.pull_applications(&ctx.remote).await?;
        let mut ids = IdMap::new();
        for remote in remote_applications {
            let Some(company_id) = companies.get(&remote.company_id) else {
                tracing::warn!(target: "lpwan.model", application = %remote.name, remote_company = %remote.company_id, "no local company for remote application");
                report.applications.skipped += 1;
                continue;
            };
            let application = match self
                .targets
                .applications
                .retrieve_company_application(company_id, &remote.name)
                .await?
            {
                Some(existing) => {
                    report.applications.existing += 1;
                    existing
                }
                None => {
                    let created = self
                        .targets
                        .applications
                        .create_application(&NewApplication {
                            company_id: company_id.clone(),
                            name: remote.name.clone(),
                            description: remote.description.clone(),
                            ..NewApplication::default()
                        })
                        .await?;
                    report.applications.created += 1;
                    created
                }
            };
            if self
                .data
                .application_links
                .find(&application.id, ctx.network_type_id())
                .await?
                .is_none()
            {
                self.data
                    .application_links
                    .create(&application.id, ctx.network_type_id(), json!({}))
                    .await?;
                report.links_created += 1;
            }
            self.remember(ctx, "app", &application.id, &remote.id).await?;
            ids.insert(remote.id, application.id);
        }
        Ok(ids)
    }

    async fn pull_device_profiles_with(
        &self,
        ctx: &PullContext,
        companies: &IdMap,
        report: &mut PullReport,
    ) -> Result<IdMap, ModelError> {
        let remote_profiles = ctx.handler.pull_device_profiles(&ctx.remote).await?;
        let mut ids = IdMap::new();
        for remote in remote_profiles {
            let Some(company_id) = companies.get(&remote.company_id) else {
                tracing::warn!(target: "lpwan.model", device_profile = %remote.name, remote_company = %remote.company_id, "no local company for remote device profile");
                report.device_profiles.skipped += 1;
                continue;
            };
            let profile = match self
                .targets
                .device_profiles
                .retrieve_company_device_profile(company_id, &remote.name)
                .await?
            {
                Some(existing) => {
                    let refresh = DeviceProfileUpdate {
                        network_settings: Some(remote.network_settings.clone()),
                        ..DeviceProfileUpdate::default()
                    };
                    report.device_profiles.existing += 1;
                    self.targets
                        .device_profiles
                        .update_device_profile(&existing.id, &refresh)
                        .await?
                }
                None => {
                    let created = self
                        .targets
                        .device_profiles
                        .create_device_profile(&NewDeviceProfile {
                            network_type_id: ctx.network_type_id().to_string(),
                            company_id: company_id.clone(),
                            name: remote.name.clone(),
                            description: remote.description.clone(),
                            network_settings: remote.network_settings.clone(),
                        })
                        .await?;
                    report.device_profiles.created += 1;
                    created
                }
            };
            self.remember(ctx, "dp", &profile.id, &remote.id).await?;
            ids.insert(remote.id, profile.id);
        }
        Ok(ids)
    }

    async fn pull_devices_with(
        &self,
        ctx: &PullContext,
        applications: &IdMap,
        profiles: &IdMap,
        report: &mut PullReport,
    ) -> Result<(), ModelError> {
        for (remote_application_id, application_id) in applications {
            let remote_devices = ctx
                .handler
                .pull_devices(&ctx.remote, remote_application_id)
                .await?;
            for remote in remote_devices {
                let device = match self
                    .targets
                    .devices
                    .retrieve_application_device(application_id, &remote.name)
                    .await?
                {
                    Some(existing) => {
                        report.devices.existing += 1;
                        existing
                    }
                    None => {
                        let created = self
                            .targets
                            .devices
                            .create_device(&NewDevice {
                                application_id: application_id.clone(),
                                name: remote.name.clone(),
                                description: remote.description.clone(),
                                device_model: None,
                            })
                            .await?;
                        report.devices.created += 1;
                        created
                    }
                };
                let linked = self
                    .data
                    .device_links
                    .find(&device.id, ctx.network_type_id())
                    .await?
                    .is_some();
                if !linked {
                    match profiles.get(&remote.device_profile_id) {
                        Some(profile_id) => {
                            self.data
                                .device_links
                                .create(
                                    &device.id,
                                    ctx.network_type_id(),
                                    profile_id,
                                    remote.network_settings.clone(),
                                )
                                .await?;
                            report.links_created += 1;
                        }
                        None => {
                            tracing::warn!(target: "lpwan.model", device = %remote.name, remote_profile = %remote.device_profile_id, "no local device profile, link skipped");
                        }
                    }
                }
                self.remember(ctx, "dev", &device.id, &remote.id).await?;
            }
        }
        Ok(())
    }
}
