//! 网络类型关联 DAO
//!
//! 三种关联结构相同：所有者 ID + networkTypeId + networkSettings，
//! 设备关联额外携带 deviceProfileId。
//! (所有者, 网络类型) 的唯一性由调用方在创建前通过 `find` 保证。

use super::{ListOptions, RecordList, Table, tables};
use crate::error::StorageError;
use crate::models::{
    ApplicationNetworkTypeLinkRecord, ApplicationRecord, CompanyNetworkTypeLinkRecord,
    DeviceNetworkTypeLinkRecord, DeviceRecord, LinkUpdate,
};
use crate::traits::RecordStore;
use crate::validation::ensure_company;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

async fn find_link<R: DeserializeOwned>(
    links: &Table,
    owner_key: &str,
    owner_id: &str,
    network_type_id: &str,
) -> Result<Option<R>, StorageError> {
    let options = ListOptions::new()
        .filter(owner_key, owner_id)
        .filter("networkTypeId", network_type_id)
        .limit(1);
    let list: RecordList<R> = links.retrieve_many(&options).await?;
    Ok(list.records.into_iter().next())
}

#[derive(Clone)]
pub struct ApplicationNetworkTypeLinkDao {
    links: Table,
    applications: Table,
}

impl ApplicationNetworkTypeLinkDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            links: Table::new(store.clone(), tables::APPLICATION_NETWORK_TYPE_LINKS)
                .with_settings(),
            applications: Table::new(store, tables::APPLICATIONS),
        }
    }

    pub async fn create(
        &self,
        application_id: &str,
        network_type_id: &str,
        network_settings: Value,
    ) -> Result<ApplicationNetworkTypeLinkRecord, StorageError> {
        let input = json!({
            "applicationId": application_id,
            "networkTypeId": network_type_id,
            "networkSettings": network_settings,
        });
        self.links.insert(&input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<ApplicationNetworkTypeLinkRecord, StorageError> {
        self.links.retrieve(id).await
    }

    pub async fn find(
        &self,
        application_id: &str,
        network_type_id: &str,
    ) -> Result<Option<ApplicationNetworkTypeLinkRecord>, StorageError> {
        find_link(&self.links, "applicationId", application_id, network_type_id).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &LinkUpdate,
    ) -> Result<ApplicationNetworkTypeLinkRecord, StorageError> {
        self.links.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.links.delete(id).await
    }

    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<ApplicationNetworkTypeLinkRecord>, StorageError> {
        self.links.retrieve_many(options).await
    }

    /// 校验关联的应用归属 `company_id`；None 跳过校验。
    pub async fn validate_company_for_application_link(
        &self,
        company_id: Option<&str>,
        link_id: &str,
    ) -> Result<(), StorageError> {
        let Some(company_id) = company_id else {
            return Ok(());
        };
        let link: ApplicationNetworkTypeLinkRecord = self.links.retrieve(link_id).await?;
        let application: ApplicationRecord =
            self.applications.retrieve(&link.application_id).await?;
        ensure_company(company_id, &application.company_id, "application link")
    }
}

#[derive(Clone)]
pub struct CompanyNetworkTypeLinkDao {
    links: Table,
}

impl CompanyNetworkTypeLinkDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            links: Table::new(store, tables::COMPANY_NETWORK_TYPE_LINKS).with_settings(),
        }
    }

    pub async fn create(
        &self,
        company_id: &str,
        network_type_id: &str,
        network_settings: Value,
    ) -> Result<CompanyNetworkTypeLinkRecord, StorageError> {
        let input = json!({
            "companyId": company_id,
            "networkTypeId": network_type_id,
            "networkSettings": network_settings,
        });
        self.links.insert(&input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<CompanyNetworkTypeLinkRecord, StorageError> {
        self.links.retrieve(id).await
    }

    pub async fn find(
        &self,
        company_id: &str,
        network_type_id: &str,
    ) -> Result<Option<CompanyNetworkTypeLinkRecord>, StorageError> {
        find_link(&self.links, "companyId", company_id, network_type_id).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &LinkUpdate,
    ) -> Result<CompanyNetworkTypeLinkRecord, StorageError> {
        self.links.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.links.delete(id).await
    }

    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<CompanyNetworkTypeLinkRecord>, StorageError> {
        self.links.retrieve_many(options).await
    }
}

#[derive(Clone)]
pub struct DeviceNetworkTypeLinkDao {
    links: Table,
    devices: Table,
    applications: Table,
}

impl DeviceNetworkTypeLinkDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            links: Table::new(store.clone(), tables::DEVICE_NETWORK_TYPE_LINKS).with_settings(),
            devices: Table::new(store.clone(), tables::DEVICES),
            applications: Table::new(store, tables::APPLICATIONS),
        }
    }

    pub async fn create(
        &self,
        device_id: &str,
        network_type_id: &str,
        device_profile_id: &str,
        network_settings: Value,
    ) -> Result<DeviceNetworkTypeLinkRecord, StorageError> {
        let input = json!({
            "deviceId": device_id,
            "networkTypeId": network_type_id,
            "deviceProfileId": device_profile_id,
            "networkSettings": network_settings,
        });
        self.links.insert(&input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<DeviceNetworkTypeLinkRecord, StorageError> {
        self.links.retrieve(id).await
    }

    pub async fn find(
        &self,
        device_id: &str,
        network_type_id: &str,
    ) -> Result<Option<DeviceNetworkTypeLinkRecord>, StorageError> {
        find_link(&self.links, "deviceId", device_id, network_type_id).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &LinkUpdate,
    ) -> Result<DeviceNetworkTypeLinkRecord, StorageError> {
        self.links.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.links.delete(id).await
    }

    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<DeviceNetworkTypeLinkRecord>, StorageError> {
        self.links.retrieve_many(options).await
    }

    /// 校验关联的设备（经由应用）归属 `company_id`；None 跳过校验。
    pub async fn validate_company_for_device_link(
        &self,
        company_id: Option<&str>,
        link_id: &str,
    ) -> Result<(), StorageError> {
        let Some(company_id) = company_id else {
            return Ok(());
        };
        let link: DeviceNetworkTypeLinkRecord = self.links.retrieve(link_id).await?;
        let device: DeviceRecord = self.devices.retrieve(&link.device_id).await?;
        let application: ApplicationRecord =
            self.applications.retrieve(&device.application_id).await?;
        ensure_company(company_id, &application.company_id, "device link")
    }
}
