//! 设备档案 DAO
//!
//! networkSettings 在文档边界编解码。

use super::{ListOptions, RecordList, Table, tables};
use crate::error::StorageError;
use crate::models::{DeviceProfileRecord, DeviceProfileUpdate, NewDeviceProfile};
use crate::traits::RecordStore;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct DeviceProfileDao {
    profiles: Table,
}

impl DeviceProfileDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            profiles: Table::new(store, tables::DEVICE_PROFILES).with_settings(),
        }
    }

    pub async fn create(
        &self,
        input: &NewDeviceProfile,
    ) -> Result<DeviceProfileRecord, StorageError> {
        self.profiles.insert(input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<DeviceProfileRecord, StorageError> {
        self.profiles.retrieve(id).await
    }

    pub async fn retrieve_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DeviceProfileRecord>, StorageError> {
        self.profiles
            .find_by("name", Value::String(name.to_string()))
            .await
    }

    /// 公司名下同名的设备档案。
    pub async fn retrieve_by_company_and_name(
        &self,
        company_id: &str,
        name: &str,
    ) -> Result<Option<DeviceProfileRecord>, StorageError> {
        self.profiles.find_owned("companyId", company_id, name).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &DeviceProfileUpdate,
    ) -> Result<DeviceProfileRecord, StorageError> {
        self.profiles.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.profiles.delete(id).await
    }

    /// 常用过滤：companyId、networkTypeId。
    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<DeviceProfileRecord>, StorageError> {
        self.profiles.retrieve_many(options).await
    }

    /// 设备档案所属公司不是 `company_id` 时返回 Unauthorized；None 跳过校验。
    pub async fn validate_company_for_device_profile(
        &self,
        company_id: Option<&str>,
        device_profile_id: &str,
    ) -> Result<(), StorageError> {
        let Some(company_id) = company_id else {
            return Ok(());
        };
        let profile: DeviceProfileRecord = self.profiles.retrieve(device_profile_id).await?;
        crate::validation::ensure_company(company_id, &profile.company_id, "device profile")
    }
}
