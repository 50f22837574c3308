//! 口令策略模型

use crate::ModelError;
use lpwan_storage::{
    ListOptions, NewPasswordPolicy, PasswordPolicyDao, PasswordPolicyRecord, PasswordPolicyUpdate,
    RecordList, StorageError, ensure_company,
};
use regex::Regex;

#[derive(Clone)]
pub struct PasswordPolicyModel {
    dao: PasswordPolicyDao,
}

impl PasswordPolicyModel {
    pub fn new(dao: PasswordPolicyDao) -> Self {
        Self { dao }
    }

    /// company_id 为 None 时创建全局规则。
    pub async fn create_password_policy(
        &self,
        input: &NewPasswordPolicy,
    ) -> Result<PasswordPolicyRecord, ModelError> {
        let record = self.dao.create(input).await?;
        lpwan_telemetry::record_created();
        Ok(record)
    }

    pub async fn retrieve_password_policy(
        &self,
        id: &str,
    ) -> Result<PasswordPolicyRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    pub async fn retrieve_password_policies(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<PasswordPolicyRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    /// 对某公司生效的规则（全局 + 公司）。
    pub async fn retrieve_for_company(
        &self,
        company_id: Option<&str>,
    ) -> Result<Vec<PasswordPolicyRecord>, ModelError> {
        Ok(self.dao.retrieve_for_company(company_id).await?)
    }

    pub async fn update_password_policy(
        &self,
        id: &str,
        update: &PasswordPolicyUpdate,
    ) -> Result<PasswordPolicyRecord, ModelError> {
        Ok(self.dao.update(id, update).await?)
    }

    pub async fn delete_password_policy(&self, id: &str) -> Result<(), ModelError> {
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        Ok(())
    }

    /// 逐条校验口令，首个不满足的规则说明作为 Validation 错误返回。
    ///
    /// 无法编译的正则跳过。
    pub async fn validate_password(
        &self,
        company_id: Option<&str>,
        password: &str,
    ) -> Result<(), ModelError> {
        for policy in self.dao.retrieve_for_company(company_id).await? {
            let regex = match Regex::new(&policy.rule_reg_exp) {
                Ok(regex) => regex,
                Err(err) => {
                    tracing::warn!(
                        target: "lpwan.model",
                        policy_id = %policy.id,
                        error = %err,
                        "password policy regex invalid, skipped"
                    );
                    continue;
                }
            };
            if !regex.is_match(password) {
                return Err(ModelError::Validation(policy.rule_text));
            }
        }
        Ok(())
    }

    /// 公司作用域的调用方只能修改本公司的规则，全局规则仅系统管理员可改。
    pub async fn validate_company_for_password_policy(
        &self,
        company_id: Option<&str>,
        id: &str,
    ) -> Result<(), ModelError> {
        let Some(company_id) = company_id else {
            return Ok(());
        };
        let policy = self.dao.retrieve(id).await?;
        match policy.company_id.as_deref() {
            Some(owner) => Ok(ensure_company(company_id, owner, "password policy")?),
            None => Err(StorageError::unauthorized("global password policy").into()),
        }
    }
}
