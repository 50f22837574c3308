//! 公司模型：公司类型缓存与级联删除

use crate::{
    ApplicationModel, CascadeReport, CompanyNetworkTypeLinkModel, DeviceProfileModel, ModelError,
    PasswordPolicyModel, UserModel,
};
use domain::CompanyType;
use lpwan_storage::{CompanyDao, CompanyRecord, CompanyUpdate, ListOptions, RecordList};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub struct CompanyModel {
    dao: CompanyDao,
    /// 公司类型名称 -> 类型编码
    types: Arc<RwLock<BTreeMap<String, u8>>>,
    applications: ApplicationModel,
    users: UserModel,
    device_profiles: DeviceProfileModel,
    password_policies: PasswordPolicyModel,
    company_links: CompanyNetworkTypeLinkModel,
}

impl CompanyModel {
    pub fn new(
        dao: CompanyDao,
        applications: ApplicationModel,
        users: UserModel,
        device_profiles: DeviceProfileModel,
        password_policies: PasswordPolicyModel,
        company_links: CompanyNetworkTypeLinkModel,
    ) -> Self {
        Self {
            dao,
            types: Arc::new(RwLock::new(BTreeMap::new())),
            applications,
            users,
            device_profiles,
            password_policies,
            company_links,
        }
    }

    /// 写入两种公司类型并刷新缓存。
    pub async fn seed_types(&self) -> Result<(), ModelError> {
        for company_type in [CompanyType::Admin, CompanyType::Vendor] {
            self.dao.ensure_type(company_type).await?;
        }
        self.load_types().await
    }

    /// 从 companyTypes 表加载类型缓存。
    pub async fn load_types(&self) -> Result<(), ModelError> {
        let rows = self.dao.get_types().await?;
        let mut types = self
            .types
            .write()
            .map_err(|_| ModelError::Store("lock failed".to_string()))?;
        types.clear();
        for row in rows {
            types.insert(row.name, row.code);
        }
        tracing::info!(target: "lpwan.model", count = types.len(), "company types loaded");
        Ok(())
    }

    pub fn company_types(&self) -> Result<BTreeMap<String, u8>, ModelError> {
        let types = self
            .types
            .read()
            .map_err(|_| ModelError::Store("lock failed".to_string()))?;
        Ok(types.clone())
    }

    pub async fn create_company(
        &self,
        name: &str,
        company_type: CompanyType,
    ) -> Result<CompanyRecord, ModelError> {
        let record = self.dao.create(name, company_type).await?;
        lpwan_telemetry::record_created();
        tracing::info!(target: "lpwan.model", company_id = %record.id, name, "company created");
        Ok(record)
    }

    pub async fn retrieve_company(&self, id: &str) -> Result<CompanyRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    pub async fn retrieve_company_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CompanyRecord>, ModelError> {
        Ok(self.dao.retrieve_by_name(name).await?)
    }

    pub async fn retrieve_companies(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<CompanyRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    pub async fn update_company(
        &self,
        id: &str,
        update: &CompanyUpdate,
    ) -> Result<CompanyRecord, ModelError> {
        Ok(self.dao.update(id, update).await?)
    }

    /// 级联删除公司。
    ///
    /// 依次清理应用、用户、设备档案、公司自有口令策略、公司网络关联，
    /// 各类别失败只记录，最后删除公司本身；公司删除失败才返回错误。
    pub async fn delete_company(&self, id: &str) -> Result<CascadeReport, ModelError> {
        let mut report = CascadeReport::default();

        let applications = self.delete_applications(id, &mut report).await;
        report.record("company", "applications", applications);
        report.record("company", "users", self.delete_users(id).await);
        report.record(
            "company",
            "deviceProfiles",
            self.delete_device_profiles(id).await,
        );
        report.record(
            "company",
            "passwordPolicies",
            self.delete_password_policies(id).await,
        );
        report.record(
            "company",
            "companyNetworkTypeLinks",
            self.company_links.delete_for_company(id).await,
        );

        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        tracing::info!(target: "lpwan.model", company_id = id, "company deleted");
        Ok(report.finish("company", id))
    }

    async fn delete_applications(
        &self,
        company_id: &str,
        report: &mut CascadeReport,
    ) -> Result<(), ModelError> {
        let applications = self
            .applications
            .retrieve_applications(&owned_by(company_id))
            .await?;
        let mut first_error = None;
        for application in applications.records {
            match self.applications.delete_application(&application.id).await {
                Ok(nested) => report.absorb("applications", nested),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn delete_users(&self, company_id: &str) -> Result<(), ModelError> {
        let users = self.users.retrieve_users(&owned_by(company_id)).await?;
        let mut first_error = None;
        for user in users.records {
            if let Err(err) = self.users.delete_user(&user.id).await {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn delete_device_profiles(&self, company_id: &str) -> Result<(), ModelError> {
        let profiles = self
            .device_profiles
            .retrieve_device_profiles(&owned_by(company_id))
            .await?;
        let mut first_error = None;
        for profile in profiles.records {
            if let Err(err) = self.device_profiles.delete_device_profile(&profile.id).await {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// 只删除 companyId 等于该公司的策略，全局策略保留。
    async fn delete_password_policies(&self, company_id: &str) -> Result<(), ModelError> {
        let policies = self
            .password_policies
            .retrieve_password_policies(&owned_by(company_id))
            .await?;
        let mut first_error = None;
        for policy in policies
            .records
            .into_iter()
            .filter(|policy| policy.company_id.as_deref() == Some(company_id))
        {
            if let Err(err) = self.password_policies.delete_password_policy(&policy.id).await {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn owned_by(company_id: &str) -> ListOptions {
    ListOptions::new().filter("companyId", company_id)
}
