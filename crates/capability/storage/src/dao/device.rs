//! 设备 DAO
//!
//! 设备的公司归属经由其应用传递：Device → Application → companyId。

use super::{ListOptions, RecordList, Table, tables};
use crate::error::StorageError;
use crate::models::{ApplicationRecord, DeviceRecord, DeviceUpdate, NewDevice};
use crate::traits::RecordStore;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct DeviceDao {
    devices: Table,
    applications: Table,
    links: Table,
}

impl DeviceDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            devices: Table::new(store.clone(), tables::DEVICES),
            applications: Table::new(store.clone(), tables::APPLICATIONS),
            links: Table::new(store, tables::DEVICE_NETWORK_TYPE_LINKS),
        }
    }

    pub async fn create(&self, input: &NewDevice) -> Result<DeviceRecord, StorageError> {
        self.devices.insert(input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<DeviceRecord, StorageError> {
        let mut record: DeviceRecord = self.devices.retrieve(id).await?;
        record.networks = self.links.linked_network_types("deviceId", &record.id).await;
        Ok(record)
    }

    pub async fn retrieve_by_name(&self, name: &str) -> Result<Option<DeviceRecord>, StorageError> {
        self.devices
            .find_by("name", Value::String(name.to_string()))
            .await
    }

    /// 应用下同名的设备。
    pub async fn retrieve_by_application_and_name(
        &self,
        application_id: &str,
        name: &str,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        self.devices
            .find_owned("applicationId", application_id, name)
            .await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &DeviceUpdate,
    ) -> Result<DeviceRecord, StorageError> {
        self.devices.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.devices.delete(id).await
    }

    /// 常用过滤：applicationId（数组表示多个应用）。
    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<DeviceRecord>, StorageError> {
        self.devices.retrieve_many(options).await
    }

    /// 校验设备经由应用归属 `company_id`；None 跳过校验。
    pub async fn validate_company_for_device(
        &self,
        company_id: Option<&str>,
        device_id: &str,
    ) -> Result<(), StorageError> {
        let Some(company_id) = company_id else {
            return Ok(());
        };
        let device: DeviceRecord = self.devices.retrieve(device_id).await?;
        let application: ApplicationRecord =
            self.applications.retrieve(&device.application_id).await?;
        crate::validation::ensure_company(company_id, &application.company_id, "device")
    }
}
