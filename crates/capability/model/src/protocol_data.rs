//! 协议数据模型（按三元组定位的键值）

use crate::ModelError;
use lpwan_storage::{ListOptions, NewProtocolData, ProtocolDataDao, ProtocolDataRecord, RecordList};

#[derive(Clone)]
pub struct ProtocolDataModel {
    dao: ProtocolDataDao,
}

impl ProtocolDataModel {
    pub fn new(dao: ProtocolDataDao) -> Self {
        Self { dao }
    }

    pub async fn create_protocol_data(
        &self,
        input: &NewProtocolData,
    ) -> Result<ProtocolDataRecord, ModelError> {
        let existing = self
            .dao
            .find(&input.network_id, &input.network_protocol_id, &input.data_identifier)
            .await?;
        if existing.is_some() {
            return Err(ModelError::Validation(format!(
                "protocol data {} already exists for network {}",
                input.data_identifier, input.network_id
            )));
        }
        Ok(self.dao.create(input).await?)
    }

    pub async fn retrieve_protocol_data(&self, id: &str) -> Result<ProtocolDataRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    /// 按 (networkId, networkProtocolId, dataIdentifier) 读取，不存在返回 NotFound。
    pub async fn retrieve_protocol_data_for_key(
        &self,
        network_id: &str,
        network_protocol_id: &str,
        data_identifier: &str,
    ) -> Result<ProtocolDataRecord, ModelError> {
        self.dao
            .find(network_id, network_protocol_id, data_identifier)
            .await?
            .ok_or_else(|| {
                ModelError::NotFound(format!(
                    "protocolData/{network_id}/{network_protocol_id}/{data_identifier}"
                ))
            })
    }

    /// 常用过滤：networkId、networkProtocolId、dataIdentifier。
    pub async fn retrieve_protocol_data_list(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<ProtocolDataRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    pub async fn update_protocol_data(
        &self,
        id: &str,
        network_protocol_id: Option<&str>,
        data_value: Option<&str>,
    ) -> Result<ProtocolDataRecord, ModelError> {
        Ok(self.dao.update(id, network_protocol_id, data_value).await?)
    }

    pub async fn delete_protocol_data(&self, id: &str) -> Result<(), ModelError> {
        Ok(self.dao.delete(id).await?)
    }
}
