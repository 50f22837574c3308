//! 用户模型：口令策略校验 + Argon2 哈希

use crate::security::SecurityError;
use crate::{ModelError, PasswordPolicyModel};
use domain::UserRole;
use lpwan_storage::{ListOptions, NewUser, RecordList, UserDao, UserRecord, UserUpdate};
use serde::Deserialize;

/// 创建用户的输入（明文口令）。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
    pub company_id: String,
    pub role: UserRole,
}

/// 用户的部分更新（明文口令）。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Clone)]
pub struct UserModel {
    dao: UserDao,
    policies: PasswordPolicyModel,
}

impl UserModel {
    pub fn new(dao: UserDao, policies: PasswordPolicyModel) -> Self {
        Self { dao, policies }
    }

    pub async fn create_user(&self, input: &UserInput) -> Result<UserRecord, ModelError> {
        self.policies
            .validate_password(Some(input.company_id.as_str()), &input.password)
            .await?;
        let record = self
            .dao
            .create(&NewUser {
                username: input.username.clone(),
                email: input.email.clone(),
                password_hash: hash(&input.password)?,
                company_id: input.company_id.clone(),
                role: input.role,
            })
            .await?;
        lpwan_telemetry::record_created();
        tracing::info!(target: "lpwan.model", user_id = %record.id, company_id = %record.company_id, "user created");
        Ok(record)
    }

    pub async fn retrieve_user(&self, id: &str) -> Result<UserRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    pub async fn retrieve_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, ModelError> {
        Ok(self.dao.find_by_username(username).await?)
    }

    pub async fn retrieve_users(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<UserRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    /// 修改口令时按用户所属公司重新校验策略。
    pub async fn update_user(
        &self,
        id: &str,
        changes: &UserChanges,
    ) -> Result<UserRecord, ModelError> {
        let password_hash = match changes.password.as_deref() {
            Some(password) => {
                let user = self.dao.retrieve(id).await?;
                self.policies
                    .validate_password(Some(user.company_id.as_str()), password)
                    .await?;
                Some(hash(password)?)
            }
            None => None,
        };
        let update = UserUpdate {
            email: changes.email.clone(),
            password_hash,
            role: changes.role,
        };
        Ok(self.dao.update(id, &update).await?)
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ModelError> {
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        Ok(())
    }

    pub async fn validate_company_for_user(
        &self,
        company_id: Option<&str>,
        id: &str,
    ) -> Result<(), ModelError> {
        Ok(self.dao.validate_company_for_user(company_id, id).await?)
    }
}

fn hash(password: &str) -> Result<String, ModelError> {
    lpwan_auth::hash_password(password)
        .map_err(|err| SecurityError::Password(err.to_string()).into())
}
