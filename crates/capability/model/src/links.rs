//! 网络类型关联模型
//!
//! 同一 (所有者, 网络类型) 只允许一条关联，唯一性在此层检查。

use crate::ModelError;
use lpwan_storage::{
    ApplicationNetworkTypeLinkDao, ApplicationNetworkTypeLinkRecord, CompanyNetworkTypeLinkDao,
    CompanyNetworkTypeLinkRecord, DeviceNetworkTypeLinkDao, DeviceNetworkTypeLinkRecord,
    LinkUpdate, ListOptions, RecordList,
};
use serde_json::Value;

fn duplicate(kind: &str, owner_id: &str, network_type_id: &str) -> ModelError {
    ModelError::Validation(format!(
        "{kind} {owner_id} is already linked to network type {network_type_id}"
    ))
}

#[derive(Clone)]
pub struct ApplicationNetworkTypeLinkModel {
    dao: ApplicationNetworkTypeLinkDao,
}

impl ApplicationNetworkTypeLinkModel {
    pub fn new(dao: ApplicationNetworkTypeLinkDao) -> Self {
        Self { dao }
    }

    pub async fn create_application_network_type_link(
        &self,
        application_id: &str,
        network_type_id: &str,
        network_settings: Value,
    ) -> Result<ApplicationNetworkTypeLinkRecord, ModelError> {
        if self.dao.find(application_id, network_type_id).await?.is_some() {
            return Err(duplicate("application", application_id, network_type_id));
        }
        let record = self
            .dao
            .create(application_id, network_type_id, network_settings)
            .await?;
        lpwan_telemetry::record_created();
        Ok(record)
    }

    pub async fn retrieve_application_network_type_link(
        &self,
        id: &str,
    ) -> Result<ApplicationNetworkTypeLinkRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    pub async fn retrieve_application_network_type_links(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<ApplicationNetworkTypeLinkRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    pub async fn update_application_network_type_link(
        &self,
        id: &str,
        update: &LinkUpdate,
    ) -> Result<ApplicationNetworkTypeLinkRecord, ModelError> {
        Ok(self.dao.update(id, update).await?)
    }

    pub async fn delete_application_network_type_link(&self, id: &str) -> Result<(), ModelError> {
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        Ok(())
    }

    pub async fn validate_company_for_application_link(
        &self,
        company_id: Option<&str>,
        id: &str,
    ) -> Result<(), ModelError> {
        Ok(self
            .dao
            .validate_company_for_application_link(company_id, id)
            .await?)
    }
}

#[derive(Clone)]
pub struct CompanyNetworkTypeLinkModel {
    dao: CompanyNetworkTypeLinkDao,
}

impl CompanyNetworkTypeLinkModel {
    pub fn new(dao: CompanyNetworkTypeLinkDao) -> Self {
        Self { dao }
    }

    pub async fn create_company_network_type_link(
        &self,
        company_id: &str,
        network_type_id: &str,
        network_settings: Value,
    ) -> Result<CompanyNetworkTypeLinkRecord, ModelError> {
        if self.dao.find(company_id, network_type_id).await?.is_some() {
            return Err(duplicate("company", company_id, network_type_id));
        }
        let record = self
            .dao
            .create(company_id, network_type_id, network_settings)
            .await?;
        lpwan_telemetry::record_created();
        Ok(record)
    }

    pub async fn retrieve_company_network_type_link(
        &self,
        id: &str,
    ) -> Result<CompanyNetworkTypeLinkRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    pub async fn retrieve_company_network_type_links(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<CompanyNetworkTypeLinkRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    pub async fn update_company_network_type_link(
        &self,
        id: &str,
        update: &LinkUpdate,
    ) -> Result<CompanyNetworkTypeLinkRecord, ModelError> {
        Ok(self.dao.update(id, update).await?)
    }

    pub async fn delete_company_network_type_link(&self, id: &str) -> Result<(), ModelError> {
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        Ok(())
    }

    /// 删除公司的全部关联（公司级联删除使用）。
    pub async fn delete_for_company(&self, company_id: &str) -> Result<(), ModelError> {
        let links = self
            .dao
            .retrieve_many(&ListOptions::new().filter("companyId", company_id))
            .await?;
        for link in links.records {
            self.dao.delete(&link.id).await?;
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct DeviceNetworkTypeLinkModel {
    dao: DeviceNetworkTypeLinkDao,
}

impl DeviceNetworkTypeLinkModel {
    pub fn new(dao: DeviceNetworkTypeLinkDao) -> Self {
        Self { dao }
    }

    pub async fn create_device_network_type_link(
        &self,
        device_id: &str,
        network_type_id: &str,
        device_profile_id: &str,
        network_settings: Value,
    ) -> Result<DeviceNetworkTypeLinkRecord, ModelError> {
        if self.dao.find(device_id, network_type_id).await?.is_some() {
            return Err(duplicate("device", device_id, network_type_id));
        }
        let record = self
            .dao
            .create(device_id, network_type_id, device_profile_id, network_settings)
            .await?;
        lpwan_telemetry::record_created();
        Ok(record)
    }

    pub async fn retrieve_device_network_type_link(
        &self,
        id: &str,
    ) -> Result<DeviceNetworkTypeLinkRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    pub async fn retrieve_device_network_type_links(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<DeviceNetworkTypeLinkRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    pub async fn update_device_network_type_link(
        &self,
        id: &str,
        update: &LinkUpdate,
    ) -> Result<DeviceNetworkTypeLinkRecord, ModelError> {
        Ok(self.dao.update(id, update).await?)
    }

    pub async fn delete_device_network_type_link(&self, id: &str) -> Result<(), ModelError> {
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        Ok(())
    }

    pub async fn validate_company_for_device_link(
        &self,
        company_id: Option<&str>,
        id: &str,
    ) -> Result<(), ModelError> {
        Ok(self
            .dao
            .validate_company_for_device_link(company_id, id)
            .await?)
    }
}
