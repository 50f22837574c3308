//! 网络模型：securityData 加密存储、连接测试、密钥随协议迁移

use crate::security::{NetworkKey, ProtocolDataAccess, SecurityError, access, hide};
use crate::{ModelError, NetworkProtocolModel};
use lpwan_protocol::RemoteNetwork;
use lpwan_storage::{ListOptions, NetworkDao, NetworkRecord, NetworkUpdate, NewNetwork, RecordList};
use serde_json::Value;

#[derive(Clone)]
pub struct NetworkModel {
    dao: NetworkDao,
    security: ProtocolDataAccess,
    protocols: NetworkProtocolModel,
}

impl NetworkModel {
    pub fn new(
        dao: NetworkDao,
        security: ProtocolDataAccess,
        protocols: NetworkProtocolModel,
    ) -> Self {
        Self {
            dao,
            security,
            protocols,
        }
    }

    /// 生成网络密钥，加密 securityData 后建档，再保存密钥。
    ///
    /// 返回的记录携带明文 securityData。
    pub async fn create_network(&self, input: &NewNetwork) -> Result<NetworkRecord, ModelError> {
        self.ensure_protocol(&input.network_protocol_id).await?;
        let key = NetworkKey::generate();
        let security_data = match input.security_data.clone() {
            Some(data) => Some(
                self.check_connection(
                    &input.network_protocol_id,
                    &input.name,
                    input.base_url.as_deref(),
                    data,
                )
                .await,
            ),
            None => None,
        };
        let sealed = seal(security_data.as_ref(), &key)?;
        let mut record = self
            .dao
            .create(&NewNetwork {
                security_data: sealed,
                ..input.clone()
            })
            .await?;

        if let Err(err) = self
            .security
            .store_network_key(&record.id, &record.network_protocol_id, &key)
            .await
        {
            tracing::error!(target: "lpwan.model", network_id = %record.id, error = %err, "network key not stored, rolling back");
            if let Err(rollback) = self.dao.delete(&record.id).await {
                tracing::error!(target: "lpwan.model", network_id = %record.id, error = %rollback, "network rollback failed");
            }
            return Err(err.into());
        }

        lpwan_telemetry::record_created();
        tracing::info!(target: "lpwan.model", network_id = %record.id, "network created");
        record.security_data = security_data;
        Ok(record)
    }

    pub async fn retrieve_network(&self, id: &str) -> Result<NetworkRecord, ModelError> {
        let record = self.dao.retrieve(id).await?;
        self.reveal(record).await
    }

    pub async fn retrieve_networks(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<NetworkRecord>, ModelError> {
        let list = self.dao.retrieve_many(options).await?;
        let mut records = Vec::with_capacity(list.records.len());
        for record in list.records {
            records.push(self.reveal(record).await?);
        }
        Ok(RecordList {
            total_count: list.total_count,
            records,
        })
    }

    /// 更新网络；securityData 变更时用同一密钥重新加密。
    ///
    /// 换协议时密钥先复制到新协议，记录更新成功后再删旧密钥；
    /// 记录更新失败时撤回新协议下的副本，旧密钥保持可用。
    pub async fn update_network(
        &self,
        id: &str,
        update: &NetworkUpdate,
    ) -> Result<NetworkRecord, ModelError> {
        let old = self.dao.retrieve(id).await?;
        let key = self
            .security
            .network_key(&old.id, &old.network_protocol_id)
            .await?;
        let mut update = update.clone();

        let protocol_id = update
            .network_protocol_id
            .clone()
            .unwrap_or_else(|| old.network_protocol_id.clone());
        let moving = protocol_id != old.network_protocol_id;
        if moving {
            self.ensure_protocol(&protocol_id).await?;
        }

        if let Some(data) = update.security_data.take() {
            let name = update.name.as_deref().unwrap_or(&old.name);
            let base_url = update.base_url.as_deref().or(old.base_url.as_deref());
            let data = self
                .check_connection(&protocol_id, name, base_url, data)
                .await;
            update.security_data = seal(Some(&data), &key)?;
        }

        if moving {
            self.security
                .store_network_key(&old.id, &protocol_id, &key)
                .await?;
        }

        let record = match self.dao.update(id, &update).await {
            Ok(record) => record,
            Err(err) => {
                if moving {
                    if let Err(cleanup) = self.security.delete_network_key(&old.id, &protocol_id).await {
                        tracing::error!(target: "lpwan.model", network_id = %old.id, error = %cleanup, "copied network key not removed");
                    }
                }
                return Err(err.into());
            }
        };

        if moving {
            if let Err(err) = self
                .security
                .delete_network_key(&old.id, &old.network_protocol_id)
                .await
            {
                tracing::warn!(target: "lpwan.model", network_id = %old.id, error = %err, "old network key not removed");
            }
            tracing::info!(
                target: "lpwan.model",
                network_id = %old.id,
                from = %old.network_protocol_id,
                to = %protocol_id,
                "network key moved to new protocol"
            );
        }
        self.reveal(record).await
    }

    /// 先删密钥，再删网络；该网络其余协议数据尽力清理。
    pub async fn delete_network(&self, id: &str) -> Result<(), ModelError> {
        let old = self.dao.retrieve(id).await?;
        self.security
            .delete_network_key(&old.id, &old.network_protocol_id)
            .await?;
        self.dao.delete(id).await?;
        match self.security.delete_network_data(id).await {
            Ok(removed) if removed > 0 => {
                tracing::info!(target: "lpwan.model", network_id = id, removed, "network protocol data removed");
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(target: "lpwan.model", network_id = id, error = %err, "network protocol data cleanup failed");
            }
        }
        lpwan_telemetry::record_deleted();
        tracing::info!(target: "lpwan.model", network_id = id, "network deleted");
        Ok(())
    }

    /// 调用处理器时使用的网络视图（需已解密）。
    pub fn remote_view(network: &NetworkRecord) -> RemoteNetwork {
        RemoteNetwork {
            id: network.id.clone(),
            name: network.name.clone(),
            base_url: network.base_url.clone().unwrap_or_default(),
            security_data: network.security_data.clone().unwrap_or(Value::Null),
        }
    }

    /// 协议必须已存在。
    async fn ensure_protocol(&self, network_protocol_id: &str) -> Result<(), ModelError> {
        match self.protocols.retrieve_network_protocol(network_protocol_id).await {
            Ok(_) => Ok(()),
            Err(ModelError::NotFound(_)) => Err(ModelError::Validation(format!(
                "unknown network protocol {network_protocol_id}"
            ))),
            Err(err) => Err(err),
        }
    }

    /// 用凭据测试远端登录，结果写回 authorized / message / enabled。
    ///
    /// 协议或处理器无法解析时原样返回。
    async fn check_connection(
        &self,
        network_protocol_id: &str,
        name: &str,
        base_url: Option<&str>,
        mut security_data: Value,
    ) -> Value {
        let handler = match self.protocols.handler_for(network_protocol_id).await {
            Ok((_, handler)) => handler,
            Err(err) => {
                tracing::warn!(
                    target: "lpwan.model",
                    network_protocol_id,
                    error = %err,
                    "connection test skipped"
                );
                return security_data;
            }
        };
        let Some(fields) = security_data.as_object_mut() else {
            return security_data;
        };
        let remote = RemoteNetwork {
            id: String::new(),
            name: name.to_string(),
            base_url: base_url.unwrap_or_default().to_string(),
            security_data: Value::Object(fields.clone()),
        };
        let (authorized, message) = match handler.test_connection(&remote).await {
            Ok(()) => (true, "ok".to_string()),
            Err(err) => {
                tracing::warn!(target: "lpwan.model", network = name, error = %err, "network connection test failed");
                (false, err.to_string())
            }
        };
        fields.insert("authorized".to_string(), Value::Bool(authorized));
        fields.insert("message".to_string(), Value::String(message));
        fields.insert("enabled".to_string(), Value::Bool(true));
        security_data
    }

    /// 密文替换为明文；没有 securityData 时不读取密钥。
    async fn reveal(&self, mut record: NetworkRecord) -> Result<NetworkRecord, ModelError> {
        let sealed = match record.security_data.take() {
            None | Some(Value::Null) => return Ok(record),
            Some(Value::String(sealed)) => sealed,
            Some(_) => {
                lpwan_telemetry::record_security_failure();
                return Err(SecurityError::Decryption(format!(
                    "securityData of network {} is not sealed",
                    record.id
                ))
                .into());
            }
        };
        let key = self
            .security
            .network_key(&record.id, &record.network_protocol_id)
            .await?;
        let data = access(&sealed, &key).map_err(|err| {
            lpwan_telemetry::record_security_failure();
            tracing::error!(target: "lpwan.model", network_id = %record.id, error = %err, "securityData decryption failed");
            err
        })?;
        record.security_data = Some(data);
        Ok(record)
    }
}

fn seal(data: Option<&Value>, key: &NetworkKey) -> Result<Option<Value>, ModelError> {
    match data {
        Some(data) => Ok(Some(Value::String(hide(data, key)?))),
        None => Ok(None),
    }
}
