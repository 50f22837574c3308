//! ModelApi：模型层组合根
//!
//! 由注入的存储后端与协议注册表一次性构建全部模型，兄弟模型之间的依赖在此连线。

use crate::security::ProtocolDataAccess;
use crate::{
    ApplicationModel, ApplicationNetworkTypeLinkModel, ApplicationRelay, CompanyModel,
    CompanyNetworkTypeLinkModel, DeviceModel, DeviceNetworkTypeLinkModel, DeviceProfileModel,
    ModelError, NetworkModel, NetworkProtocolModel, NetworkProviderModel,
    NetworkProvisioningFieldModel, NetworkSync, NetworkTypeModel, PasswordPolicyModel,
    ProtocolDataModel, ReportingProtocolModel, SyncTargets, UserInput, UserModel,
};
use domain::{CompanyType, UserRole};
use lpwan_protocol::ProtocolRegistry;
use lpwan_storage::{DataAccess, RecordStore, UserRecord};
use std::sync::Arc;

#[derive(Clone)]
pub struct ModelApi {
    pub companies: CompanyModel,
    pub users: UserModel,
    pub password_policies: PasswordPolicyModel,
    pub applications: ApplicationModel,
    pub devices: DeviceModel,
    pub device_profiles: DeviceProfileModel,
    pub networks: NetworkModel,
    pub network_protocols: NetworkProtocolModel,
    pub network_providers: NetworkProviderModel,
    pub network_types: NetworkTypeModel,
    pub reporting_protocols: ReportingProtocolModel,
    pub provisioning_fields: NetworkProvisioningFieldModel,
    pub application_links: ApplicationNetworkTypeLinkModel,
    pub company_links: CompanyNetworkTypeLinkModel,
    pub device_links: DeviceNetworkTypeLinkModel,
    pub protocol_data: ProtocolDataModel,
    pub sync: NetworkSync,
    pub relay: ApplicationRelay,
    /// 底层 DAO 集合（只读查询与认证使用）
    pub data: DataAccess,
}

impl ModelApi {
    pub fn new(store: Arc<dyn RecordStore>, registry: ProtocolRegistry) -> Self {
        let data = DataAccess::new(store);
        let security = ProtocolDataAccess::new(data.protocol_data.clone());

        let password_policies = PasswordPolicyModel::new(data.password_policies.clone());
        let users = UserModel::new(data.users.clone(), password_policies.clone());
        let devices = DeviceModel::new(data.devices.clone(), data.device_links.clone());
        let applications = ApplicationModel::new(
            data.applications.clone(),
            data.application_links.clone(),
            data.devices.clone(),
            devices.clone(),
        );
        let device_profiles = DeviceProfileModel::new(data.device_profiles.clone());
        let company_links = CompanyNetworkTypeLinkModel::new(data.company_links.clone());
        let companies = CompanyModel::new(
            data.companies.clone(),
            applications.clone(),
            users.clone(),
            device_profiles.clone(),
            password_policies.clone(),
            company_links.clone(),
        );

        let network_types = NetworkTypeModel::new(data.network_types.clone());
        let network_protocols = NetworkProtocolModel::new(
            data.network_protocols.clone(),
            network_types.clone(),
            registry.clone(),
        );
        let networks = NetworkModel::new(
            data.networks.clone(),
            security.clone(),
            network_protocols.clone(),
        );
        let sync = NetworkSync::new(
            data.clone(),
            security,
            networks.clone(),
            network_protocols.clone(),
            SyncTargets {
                companies: companies.clone(),
                applications: applications.clone(),
                device_profiles: device_profiles.clone(),
                devices: devices.clone(),
            },
        );

        let reporting_protocols = ReportingProtocolModel::new(data.reporting_protocols.clone());
        let relay = ApplicationRelay::new(
            applications.clone(),
            networks.clone(),
            reporting_protocols.clone(),
            registry,
        );

        Self {
            companies,
            users,
            password_policies,
            applications,
            devices,
            device_profiles,
            networks,
            network_protocols,
            network_providers: NetworkProviderModel::new(data.network_providers.clone()),
            network_types,
            reporting_protocols,
            provisioning_fields: NetworkProvisioningFieldModel::new(
                data.provisioning_fields.clone(),
            ),
            application_links: ApplicationNetworkTypeLinkModel::new(
                data.application_links.clone(),
            ),
            company_links,
            device_links: DeviceNetworkTypeLinkModel::new(data.device_links.clone()),
            protocol_data: ProtocolDataModel::new(data.protocol_data.clone()),
            sync,
            relay,
            data,
        }
    }

    /// 启动初始化：写入并加载公司类型，登记协议处理器，恢复运行中的应用。
    ///
    /// 任一步失败只记录日志，进程降级继续运行。
    pub async fn initialize(&self) {
        if let Err(err) = self.companies.seed_types().await {
            tracing::error!(target: "lpwan.model", error = %err, "company types not loaded");
        }
        match self.network_protocols.register_handlers().await {
            Ok(registered) => {
                tracing::info!(target: "lpwan.model", count = registered.len(), "protocol handlers registered");
            }
            Err(err) => {
                tracing::error!(target: "lpwan.model", error = %err, "protocol handler registration failed");
            }
        }
        match self.relay.resume_applications().await {
            Ok(running) => {
                tracing::info!(target: "lpwan.model", running, "applications resumed");
            }
            Err(err) => {
                tracing::error!(target: "lpwan.model", error = %err, "applications not resumed");
            }
        }
    }

    /// 确保系统管理公司与管理员账号存在（按名称/用户名判断）。
    pub async fn seed_admin(
        &self,
        company_name: &str,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, ModelError> {
        let company = match self.companies.retrieve_company_by_name(company_name).await? {
            Some(existing) => existing,
            None => {
                self.companies
                    .create_company(company_name, CompanyType::Admin)
                    .await?
            }
        };
        if let Some(existing) = self.users.retrieve_user_by_username(username).await? {
            return Ok(existing);
        }
        let user = self
            .users
            .create_user(&UserInput {
                username: username.to_string(),
                email: None,
                password: password.to_string(),
                company_id: company.id,
                role: UserRole::Admin,
            })
            .await?;
        tracing::info!(target: "lpwan.model", username, "admin user seeded");
        Ok(user)
    }
}
