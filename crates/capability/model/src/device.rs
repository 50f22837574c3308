//! 设备模型：删除时级联清理设备网络关联

use crate::{CascadeReport, ModelError};
use lpwan_storage::{
    DeviceDao, DeviceNetworkTypeLinkDao, DeviceRecord, DeviceUpdate, ListOptions, NewDevice,
    RecordList,
};

#[derive(Clone)]
pub struct DeviceModel {
    dao: DeviceDao,
    links: DeviceNetworkTypeLinkDao,
}

impl DeviceModel {
    pub fn new(dao: DeviceDao, links: DeviceNetworkTypeLinkDao) -> Self {
        Self { dao, links }
    }

    pub async fn create_device(&self, input: &NewDevice) -> Result<DeviceRecord, ModelError> {
        let record = self.dao.create(input).await?;
        lpwan_telemetry::record_created();
        tracing::info!(target: "lpwan.model", device_id = %record.id, application_id = %record.application_id, "device created");
        Ok(record)
    }

    pub async fn retrieve_device(&self, id: &str) -> Result<DeviceRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    pub async fn retrieve_device_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DeviceRecord>, ModelError> {
        Ok(self.dao.retrieve_by_name(name).await?)
    }

    pub async fn retrieve_application_device(
        &self,
        application_id: &str,
        name: &str,
    ) -> Result<Option<DeviceRecord>, ModelError> {
        Ok(self
            .dao
            .retrieve_by_application_and_name(application_id, name)
            .await?)
    }

    /// 常用过滤：applicationId；公司过滤需先展开为应用 ID 列表。
    pub async fn retrieve_devices(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<DeviceRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    pub async fn update_device(
        &self,
        id: &str,
        update: &DeviceUpdate,
    ) -> Result<DeviceRecord, ModelError> {
        Ok(self.dao.update(id, update).await?)
    }

    /// 先删关联，再删设备；设备本身删除失败时返回错误。
    pub async fn delete_device(&self, id: &str) -> Result<CascadeReport, ModelError> {
        let mut report = CascadeReport::default();
        report.record("device", "deviceNetworkTypeLinks", self.delete_links(id).await);
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        tracing::info!(target: "lpwan.model", device_id = id, "device deleted");
        Ok(report.finish("device", id))
    }

    async fn delete_links(&self, device_id: &str) -> Result<(), ModelError> {
        let links = self
            .links
            .retrieve_many(&ListOptions::new().filter("deviceId", device_id))
            .await?;
        for link in links.records {
            self.links.delete(&link.id).await?;
        }
        Ok(())
    }

    pub async fn validate_company_for_device(
        &self,
        company_id: Option<&str>,
        id: &str,
    ) -> Result<(), ModelError> {
        Ok(self.dao.validate_company_for_device(company_id, id).await?)
    }
}
