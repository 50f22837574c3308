//! 应用 DAO
//!
//! 读取单条应用时派生 `networks`（应用已关联的网络类型）。

use super::{ListOptions, RecordList, Table, tables};
use crate::error::StorageError;
use crate::models::{ApplicationRecord, ApplicationUpdate, NewApplication};
use crate::traits::RecordStore;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApplicationDao {
    applications: Table,
    links: Table,
}

impl ApplicationDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            applications: Table::new(store.clone(), tables::APPLICATIONS),
            links: Table::new(store, tables::APPLICATION_NETWORK_TYPE_LINKS),
        }
    }

    pub async fn create(&self, input: &NewApplication) -> Result<ApplicationRecord, StorageError> {
        self.applications.insert(input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<ApplicationRecord, StorageError> {
        let mut record: ApplicationRecord = self.applications.retrieve(id).await?;
        record.networks = self
            .links
            .linked_network_types("applicationId", &record.id)
            .await;
        Ok(record)
    }

    pub async fn retrieve_by_name(
        &self,
        name: &str,
    ) -> Result<Option<ApplicationRecord>, StorageError> {
        self.applications
            .find_by("name", Value::String(name.to_string()))
            .await
    }

    /// 公司名下同名的应用。
    pub async fn retrieve_by_company_and_name(
        &self,
        company_id: &str,
        name: &str,
    ) -> Result<Option<ApplicationRecord>, StorageError> {
        self.applications.find_owned("companyId", company_id, name).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &ApplicationUpdate,
    ) -> Result<ApplicationRecord, StorageError> {
        self.applications.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.applications.delete(id).await
    }

    /// 常用过滤：companyId。
    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<ApplicationRecord>, StorageError> {
        self.applications.retrieve_many(options).await
    }

    /// 应用所属公司不是 `company_id` 时返回 Unauthorized；None 跳过校验。
    pub async fn validate_company_for_application(
        &self,
        company_id: Option<&str>,
        application_id: &str,
    ) -> Result<(), StorageError> {
        let Some(company_id) = company_id else {
            return Ok(());
        };
        let application: ApplicationRecord = self.applications.retrieve(application_id).await?;
        crate::validation::ensure_company(company_id, &application.company_id, "application")
    }
}
