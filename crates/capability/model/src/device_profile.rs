//! 设备档案模型

use crate::ModelError;
use lpwan_storage::{
    DeviceProfileDao, DeviceProfileRecord, DeviceProfileUpdate, ListOptions, NewDeviceProfile,
    RecordList,
};

#[derive(Clone)]
pub struct DeviceProfileModel {
    dao: DeviceProfileDao,
}

impl DeviceProfileModel {
    pub fn new(dao: DeviceProfileDao) -> Self {
        Self { dao }
    }

    pub async fn create_device_profile(
        &self,
        input: &NewDeviceProfile,
    ) -> Result<DeviceProfileRecord, ModelError> {
        let record = self.dao.create(input).await?;
        lpwan_telemetry::record_created();
        tracing::info!(target: "lpwan.model", device_profile_id = %record.id, company_id = %record.company_id, "device profile created");
        Ok(record)
    }

    pub async fn retrieve_device_profile(
        &self,
        id: &str,
    ) -> Result<DeviceProfileRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    pub async fn retrieve_device_profile_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DeviceProfileRecord>, ModelError> {
        Ok(self.dao.retrieve_by_name(name).await?)
    }

    pub async fn retrieve_company_device_profile(
        &self,
        company_id: &str,
        name: &str,
    ) -> Result<Option<DeviceProfileRecord>, ModelError> {
        Ok(self.dao.retrieve_by_company_and_name(company_id, name).await?)
    }

    pub async fn retrieve_device_profiles(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<DeviceProfileRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    pub async fn update_device_profile(
        &self,
        id: &str,
        update: &DeviceProfileUpdate,
    ) -> Result<DeviceProfileRecord, ModelError> {
        Ok(self.dao.update(id, update).await?)
    }

    pub async fn delete_device_profile(&self, id: &str) -> Result<(), ModelError> {
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        Ok(())
    }

    pub async fn validate_company_for_device_profile(
        &self,
        company_id: Option<&str>,
        id: &str,
    ) -> Result<(), ModelError> {
        Ok(self
            .dao
            .validate_company_for_device_profile(company_id, id)
            .await?)
    }
}
