//! 参考实体 DAO：网络提供商、网络类型、上报协议、开通字段。

use super::{ListOptions, RecordList, Table, tables};
use crate::error::StorageError;
use crate::models::{
    NetworkProviderRecord, NetworkProvisioningFieldRecord, NetworkProvisioningFieldUpdate,
    NetworkTypeRecord, NewNetworkProvisioningField, ReportingProtocolRecord,
    ReportingProtocolUpdate,
};
use crate::traits::RecordStore;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Clone)]
pub struct NetworkProviderDao {
    providers: Table,
}

impl NetworkProviderDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            providers: Table::new(store, tables::NETWORK_PROVIDERS),
        }
    }

    pub async fn create(&self, name: &str) -> Result<NetworkProviderRecord, StorageError> {
        self.providers.insert(&json!({ "name": name })).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<NetworkProviderRecord, StorageError> {
        self.providers.retrieve(id).await
    }

    pub async fn update(&self, id: &str, name: &str) -> Result<NetworkProviderRecord, StorageError> {
        self.providers.update(id, &json!({ "name": name })).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.providers.delete(id).await
    }

    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<NetworkProviderRecord>, StorageError> {
        self.providers.retrieve_many(options).await
    }
}

#[derive(Clone)]
pub struct NetworkTypeDao {
    types: Table,
}

impl NetworkTypeDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            types: Table::new(store, tables::NETWORK_TYPES),
        }
    }

    pub async fn create(&self, name: &str) -> Result<NetworkTypeRecord, StorageError> {
        self.types.insert(&json!({ "name": name })).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<NetworkTypeRecord, StorageError> {
        self.types.retrieve(id).await
    }

    pub async fn retrieve_by_name(
        &self,
        name: &str,
    ) -> Result<Option<NetworkTypeRecord>, StorageError> {
        self.types.find_by("name", Value::String(name.to_string())).await
    }

    pub async fn update(&self, id: &str, name: &str) -> Result<NetworkTypeRecord, StorageError> {
        self.types.update(id, &json!({ "name": name })).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.types.delete(id).await
    }

    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<NetworkTypeRecord>, StorageError> {
        self.types.retrieve_many(options).await
    }
}

#[derive(Clone)]
pub struct ReportingProtocolDao {
    protocols: Table,
}

impl ReportingProtocolDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            protocols: Table::new(store, tables::REPORTING_PROTOCOLS),
        }
    }

    pub async fn create(
        &self,
        name: &str,
        protocol_handler: &str,
    ) -> Result<ReportingProtocolRecord, StorageError> {
        let input = json!({ "name": name, "protocolHandler": protocol_handler });
        self.protocols.insert(&input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<ReportingProtocolRecord, StorageError> {
        self.protocols.retrieve(id).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &ReportingProtocolUpdate,
    ) -> Result<ReportingProtocolRecord, StorageError> {
        self.protocols.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.protocols.delete(id).await
    }

    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<ReportingProtocolRecord>, StorageError> {
        self.protocols.retrieve_many(options).await
    }
}

#[derive(Clone)]
pub struct NetworkProvisioningFieldDao {
    fields: Table,
}

impl NetworkProvisioningFieldDao {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            fields: Table::new(store, tables::NETWORK_PROVISIONING_FIELDS),
        }
    }

    pub async fn create(
        &self,
        input: &NewNetworkProvisioningField,
    ) -> Result<NetworkProvisioningFieldRecord, StorageError> {
        self.fields.insert(input).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<NetworkProvisioningFieldRecord, StorageError> {
        self.fields.retrieve(id).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &NetworkProvisioningFieldUpdate,
    ) -> Result<NetworkProvisioningFieldRecord, StorageError> {
        self.fields.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.fields.delete(id).await
    }

    /// 常用过滤：networkProtocolId、provisioningTableId。
    pub async fn retrieve_many(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<NetworkProvisioningFieldRecord>, StorageError> {
        self.fields.retrieve_many(options).await
    }
}
