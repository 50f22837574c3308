//! 口令策略 DAO
//!
//! companyId 为空的策略是全局规则，对所有公司生效。

use super::{ListOptions, RecordList, Table, tables};
use crate::error::StorageError;
use crate::models::{NewPasswordPolicy, PasswordPolicyRecord, PasswordPolicyUpdate};
use crate::traits::RecordStore;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct PasswordPolicyDao {
    policies: Table,
}

impl PasswordPolicyDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            policies: Table::new(store, tables::PASSWORD_POLICIES),
        }
    }

    pub async fn create(
        &self,
        input: &NewPasswordPolicy,
    ) -> Result<PasswordPolicyRecord, StorageError> {
        self.policies.insert(input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<PasswordPolicyRecord, StorageError> {
        self.policies.retrieve(id).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &PasswordPolicyUpdate,
    ) -> Result<PasswordPolicyRecord, StorageError> {
        self.policies.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.policies.delete(id).await
    }

    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<PasswordPolicyRecord>, StorageError> {
        self.policies.retrieve_many(options).await
    }

    /// 对某公司生效的全部策略：全局规则 + 公司规则。
    pub async fn retrieve_for_company(
        &self,
        company_id: Option<&str>,
    ) -> Result<Vec<PasswordPolicyRecord>, StorageError> {
        let scope = match company_id {
            Some(company_id) => Value::Array(vec![Value::Null, company_id.into()]),
            None => Value::Null,
        };
        let options = ListOptions::new().filter("companyId", scope);
        let list: RecordList<PasswordPolicyRecord> = self.policies.retrieve_many(&options).await?;
        Ok(list.records)
    }
}
