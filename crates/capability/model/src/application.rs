//! 应用模型：删除时级联清理设备与应用网络关联

use crate::{CascadeReport, DeviceModel, ModelError};
use lpwan_storage::{
    ApplicationDao, ApplicationNetworkTypeLinkDao, ApplicationRecord, ApplicationUpdate,
    DeviceDao, ListOptions, NewApplication, RecordList,
};

#[derive(Clone)]
pub struct ApplicationModel {
    dao: ApplicationDao,
    links: ApplicationNetworkTypeLinkDao,
    device_records: DeviceDao,
    devices: DeviceModel,
}

impl ApplicationModel {
    pub fn new(
        dao: ApplicationDao,
        links: ApplicationNetworkTypeLinkDao,
        device_records: DeviceDao,
        devices: DeviceModel,
    ) -> Self {
        Self {
            dao,
            links,
            device_records,
            devices,
        }
    }

    pub async fn create_application(
        &self,
        input: &NewApplication,
    ) -> Result<ApplicationRecord, ModelError> {
        let record = self.dao.create(input).await?;
        lpwan_telemetry::record_created();
        tracing::info!(target: "lpwan.model", application_id = %record.id, company_id = %record.company_id, "application created");
        Ok(record)
    }

    pub async fn retrieve_application(&self, id: &str) -> Result<ApplicationRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    pub async fn retrieve_application_by_name(
        &self,
        name: &str,
    ) -> Result<Option<ApplicationRecord>, ModelError> {
        Ok(self.dao.retrieve_by_name(name).await?)
    }

    /// 公司名下按名称精确查找，不跨公司匹配。
    pub async fn retrieve_company_application(
        &self,
        company_id: &str,
        name: &str,
    ) -> Result<Option<ApplicationRecord>, ModelError> {
        Ok(self.dao.retrieve_by_company_and_name(company_id, name).await?)
    }

    pub async fn retrieve_applications(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<ApplicationRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    /// 某公司全部应用的 ID（设备列表按公司过滤时使用）。
    pub async fn application_ids_for_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<String>, ModelError> {
        let list = self
            .dao
            .retrieve_many(&ListOptions::new().filter("companyId", company_id))
            .await?;
        Ok(list.records.into_iter().map(|app| app.id).collect())
    }

    pub async fn update_application(
        &self,
        id: &str,
        update: &ApplicationUpdate,
    ) -> Result<ApplicationRecord, ModelError> {
        Ok(self.dao.update(id, update).await?)
    }

    /// 依次删除设备（含其关联）、应用网络关联，最后删除应用。
    pub async fn delete_application(&self, id: &str) -> Result<CascadeReport, ModelError> {
        let mut report = CascadeReport::default();
        let devices = self.delete_devices(id, &mut report).await;
        report.record("application", "devices", devices);
        report.record(
            "application",
            "applicationNetworkTypeLinks",
            self.delete_links(id).await,
        );
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        tracing::info!(target: "lpwan.model", application_id = id, "application deleted");
        Ok(report.finish("application", id))
    }

    async fn delete_devices(
        &self,
        application_id: &str,
        report: &mut CascadeReport,
    ) -> Result<(), ModelError> {
        let devices = self
            .device_records
            .retrieve_many(&ListOptions::new().filter("applicationId", application_id))
            .await?;
        let mut first_error = None;
        for device in devices.records {
            match self.devices.delete_device(&device.id).await {
                Ok(nested) => report.absorb("devices", nested),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn delete_links(&self, application_id: &str) -> Result<(), ModelError> {
        let links = self
            .links
            .retrieve_many(&ListOptions::new().filter("applicationId", application_id))
            .await?;
        for link in links.records {
            self.links.delete(&link.id).await?;
        }
        Ok(())
    }

    pub async fn validate_company_for_application(
        &self,
        company_id: Option<&str>,
        id: &str,
    ) -> Result<(), ModelError> {
        Ok(self
            .dao
            .validate_company_for_application(company_id, id)
            .await?)
    }
}
