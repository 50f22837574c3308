//! 网络 DAO
//!
//! 只负责记录读写；securityData 的加解密在模型层完成，这里存取的是密文。

use super::{ListOptions, RecordList, Table, tables};
use crate::error::StorageError;
use crate::models::{NetworkRecord, NetworkUpdate, NewNetwork};
use crate::traits::RecordStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct NetworkDao {
    networks: Table,
}

impl NetworkDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            networks: Table::new(store, tables::NETWORKS),
        }
    }

    pub async fn create(&self, input: &NewNetwork) -> Result<NetworkRecord, StorageError> {
        self.networks.insert(input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<NetworkRecord, StorageError> {
        self.networks.retrieve(id).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &NetworkUpdate,
    ) -> Result<NetworkRecord, StorageError> {
        self.networks.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.networks.delete(id).await
    }

    /// 常用过滤：networkProviderId、networkTypeId、networkProtocolId。
    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<NetworkRecord>, StorageError> {
        self.networks.retrieve_many(options).await
    }
}
