//! 网络协议 DAO
//!
//! 协议记录以 protocolHandler 作为自然键：处理器注册时按它 upsert。

use super::{ListOptions, RecordList, Table, tables};
use crate::error::StorageError;
use crate::models::{NetworkProtocolRecord, NetworkProtocolUpdate, NewNetworkProtocol};
use crate::traits::RecordStore;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct NetworkProtocolDao {
    protocols: Table,
}

impl NetworkProtocolDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            protocols: Table::new(store, tables::NETWORK_PROTOCOLS),
        }
    }

    pub async fn create(
        &self,
        input: &NewNetworkProtocol,
    ) -> Result<NetworkProtocolRecord, StorageError> {
        self.protocols.insert(input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<NetworkProtocolRecord, StorageError> {
        self.protocols.retrieve(id).await
    }

    pub async fn retrieve_by_handler(
        &self,
        protocol_handler: &str,
    ) -> Result<Option<NetworkProtocolRecord>, StorageError> {
        self.protocols
            .find_by("protocolHandler", Value::String(protocol_handler.to_string()))
            .await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &NetworkProtocolUpdate,
    ) -> Result<NetworkProtocolRecord, StorageError> {
        self.protocols.update(id, update).await
    }

    /// 按 protocolHandler 存在则更新、否则创建。
    pub async fn upsert(
        &self,
        input: &NewNetworkProtocol,
    ) -> Result<NetworkProtocolRecord, StorageError> {
        self.protocols.upsert("protocolHandler", input).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.protocols.delete(id).await
    }

    /// 常用过滤：networkTypeId。
    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<NetworkProtocolRecord>, StorageError> {
        self.protocols.retrieve_many(options).await
    }
}
