//! 协议数据 DAO
//!
//! 以 (networkId, networkProtocolId, dataIdentifier) 三元组定位一条数据，
//! 用于保存网络密钥、远端对象 ID 映射等协议相关的键值。

use super::{ListOptions, RecordList, Table, tables};
use crate::error::StorageError;
use crate::models::{NewProtocolData, ProtocolDataRecord};
use crate::traits::RecordStore;
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct ProtocolDataDao {
    data: Table,
}

impl ProtocolDataDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            data: Table::new(store, tables::PROTOCOL_DATA),
        }
    }

    pub async fn create(&self, input: &NewProtocolData) -> Result<ProtocolDataRecord, StorageError> {
        self.data.insert(input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<ProtocolDataRecord, StorageError> {
        self.data.retrieve(id).await
    }

    /// 按三元组查找。
    pub async fn find(
        &self,
        network_id: &str,
        network_protocol_id: &str,
        data_identifier: &str,
    ) -> Result<Option<ProtocolDataRecord>, StorageError> {
        let options = ListOptions::new()
            .filter("networkId", network_id)
            .filter("networkProtocolId", network_protocol_id)
            .filter("dataIdentifier", data_identifier)
            .limit(1);
        let list: RecordList<ProtocolDataRecord> = self.data.retrieve_many(&options).await?;
        Ok(list.records.into_iter().next())
    }

    /// 修改数据值或迁移所属协议。
    pub async fn update(
        &self,
        id: &str,
        network_protocol_id: Option<&str>,
        data_value: Option<&str>,
    ) -> Result<ProtocolDataRecord, StorageError> {
        let mut update = serde_json::Map::new();
        if let Some(network_protocol_id) = network_protocol_id {
            update.insert("networkProtocolId".to_string(), json!(network_protocol_id));
        }
        if let Some(data_value) = data_value {
            update.insert("dataValue".to_string(), json!(data_value));
        }
        self.data.update(id, &update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.data.delete(id).await
    }

    /// 常用过滤：networkId、networkProtocolId。
    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<ProtocolDataRecord>, StorageError> {
        self.data.retrieve_many(options).await
    }
}
