//! 用户 DAO
//!
//! 用户名全局唯一，登录时按用户名查找。

use super::{ListOptions, RecordList, Table, tables};
use crate::error::StorageError;
use crate::models::{NewUser, UserRecord, UserUpdate};
use crate::traits::RecordStore;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserDao {
    users: Table,
}

impl UserDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            users: Table::new(store, tables::USERS),
        }
    }

    pub async fn create(&self, input: &NewUser) -> Result<UserRecord, StorageError> {
        if self.find_by_username(&input.username).await?.is_some() {
            return Err(StorageError::new(format!(
                "username already exists: {}",
                input.username
            )));
        }
        self.users.insert(input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<UserRecord, StorageError> {
        self.users.retrieve(id).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        self.users
            .find_by("username", Value::String(username.to_string()))
            .await
    }

    pub async fn update(&self, id: &str, update: &UserUpdate) -> Result<UserRecord, StorageError> {
        self.users.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.users.delete(id).await
    }

    /// 常用过滤：companyId。
    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<UserRecord>, StorageError> {
        self.users.retrieve_many(options).await
    }

    /// 用户所属公司不是 `company_id` 时返回 Unauthorized；None 跳过校验。
    pub async fn validate_company_for_user(
        &self,
        company_id: Option<&str>,
        user_id: &str,
    ) -> Result<(), StorageError> {
        let Some(company_id) = company_id else {
            return Ok(());
        };
        let user: UserRecord = self.users.retrieve(user_id).await?;
        crate::validation::ensure_company(company_id, &user.company_id, "user")
    }
}
