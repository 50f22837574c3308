//! 公司 DAO
//!
//! 读取时派生 `networks`（公司已关联的网络类型）。
//! companyTypes 表保存公司类型的名称与编码。

use super::{ListOptions, RecordList, Table, tables};
use crate::error::StorageError;
use crate::models::{CompanyRecord, CompanyTypeRecord, CompanyUpdate, NewCompany};
use crate::traits::RecordStore;
use domain::CompanyType;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Clone)]
pub struct CompanyDao {
    companies: Table,
    types: Table,
    links: Table,
}

impl CompanyDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            companies: Table::new(store.clone(), tables::COMPANIES),
            types: Table::new(store.clone(), tables::COMPANY_TYPES),
            links: Table::new(store, tables::COMPANY_NETWORK_TYPE_LINKS),
        }
    }

    pub async fn create(
        &self,
        name: &str,
        company_type: CompanyType,
    ) -> Result<CompanyRecord, StorageError> {
        let input = NewCompany {
            name: name.to_string(),
            company_type,
        };
        self.companies.insert(&input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<CompanyRecord, StorageError> {
        let mut record: CompanyRecord = self.companies.retrieve(id).await?;
        record.networks = self.links.linked_network_types("companyId", &record.id).await;
        Ok(record)
    }

    /// 按名称精确查找。
    pub async fn retrieve_by_name(&self, name: &str) -> Result<Option<CompanyRecord>, StorageError> {
        self.companies.find_by("name", Value::String(name.to_string())).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &CompanyUpdate,
    ) -> Result<CompanyRecord, StorageError> {
        self.companies.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.companies.delete(id).await
    }

    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<CompanyRecord>, StorageError> {
        self.companies.retrieve_many(options).await
    }

    /// 读取全部公司类型。
    pub async fn get_types(&self) -> Result<Vec<CompanyTypeRecord>, StorageError> {
        let list: RecordList<CompanyTypeRecord> =
            self.types.retrieve_many(&ListOptions::new()).await?;
        Ok(list.records)
    }

    /// 按编码写入公司类型（已存在则刷新名称）。
    pub async fn ensure_type(
        &self,
        company_type: CompanyType,
    ) -> Result<CompanyTypeRecord, StorageError> {
        let record = json!({ "name": company_type.name(), "type": company_type.code() });
        self.types.upsert("type", &record).await
    }
}
