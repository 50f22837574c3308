//! 参考数据模型：网络提供商、网络类型、上报协议、网络开通字段

use crate::ModelError;
use lpwan_storage::{
    ListOptions, NetworkProviderDao, NetworkProviderRecord, NetworkProvisioningFieldDao,
    NetworkProvisioningFieldRecord, NetworkProvisioningFieldUpdate, NetworkTypeDao,
    NetworkTypeRecord, NewNetworkProvisioningField, RecordList, ReportingProtocolDao,
    ReportingProtocolRecord, ReportingProtocolUpdate,
};

#[derive(Clone)]
pub struct NetworkProviderModel {
    dao: NetworkProviderDao,
}

impl NetworkProviderModel {
    pub fn new(dao: NetworkProviderDao) -> Self {
        Self { dao }
    }

    pub async fn create_network_provider(
        &self,
        name: &str,
    ) -> Result<NetworkProviderRecord, ModelError> {
        let record = self.dao.create(name).await?;
        lpwan_telemetry::record_created();
        Ok(record)
    }

    pub async fn retrieve_network_provider(
        &self,
        id: &str,
    ) -> Result<NetworkProviderRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    pub async fn retrieve_network_providers(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<NetworkProviderRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    pub async fn update_network_provider(
        &self,
        id: &str,
        name: &str,
    ) -> Result<NetworkProviderRecord, ModelError> {
        Ok(self.dao.update(id, name).await?)
    }

    pub async fn delete_network_provider(&self, id: &str) -> Result<(), ModelError> {
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        Ok(())
    }
}

#[derive(Clone)]
pub struct NetworkTypeModel {
    dao: NetworkTypeDao,
}

impl NetworkTypeModel {
    pub fn new(dao: NetworkTypeDao) -> Self {
        Self { dao }
    }

    pub async fn create_network_type(&self, name: &str) -> Result<NetworkTypeRecord, ModelError> {
        let record = self.dao.create(name).await?;
        lpwan_telemetry::record_created();
        Ok(record)
    }

    pub async fn retrieve_network_type(&self, id: &str) -> Result<NetworkTypeRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    pub async fn retrieve_network_type_by_name(
        &self,
        name: &str,
    ) -> Result<Option<NetworkTypeRecord>, ModelError> {
        Ok(self.dao.retrieve_by_name(name).await?)
    }

    /// 按名称查找，不存在则创建。
    pub async fn ensure_network_type(&self, name: &str) -> Result<NetworkTypeRecord, ModelError> {
        match self.dao.retrieve_by_name(name).await? {
            Some(existing) => Ok(existing),
            None => self.create_network_type(name).await,
        }
    }

    pub async fn retrieve_network_types(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<NetworkTypeRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    pub async fn update_network_type(
        &self,
        id: &str,
        name: &str,
    ) -> Result<NetworkTypeRecord, ModelError> {
        Ok(self.dao.update(id, name).await?)
    }

    pub async fn delete_network_type(&self, id: &str) -> Result<(), ModelError> {
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        Ok(())
    }
}

#[derive(Clone)]
pub struct ReportingProtocolModel {
    dao: ReportingProtocolDao,
}

impl ReportingProtocolModel {
    pub fn new(dao: ReportingProtocolDao) -> Self {
        Self { dao }
    }

    pub async fn create_reporting_protocol(
        &self,
        name: &str,
        protocol_handler: &str,
    ) -> Result<ReportingProtocolRecord, ModelError> {
        let record = self.dao.create(name, protocol_handler).await?;
        lpwan_telemetry::record_created();
        Ok(record)
    }

    pub async fn retrieve_reporting_protocol(
        &self,
        id: &str,
    ) -> Result<ReportingProtocolRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    pub async fn retrieve_reporting_protocols(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<ReportingProtocolRecord>, ModelError> {
        Ok(self.dao.retrieve_many(options).await?)
    }

    pub async fn update_reporting_protocol(
        &self,
        id: &str,
        update: &ReportingProtocolUpdate,
    ) -> Result<ReportingProtocolRecord, ModelError> {
        Ok(self.dao.update(id, update).await?)
    }

    pub async fn delete_reporting_protocol(&self, id: &str) -> Result<(), ModelError> {
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        Ok(())
    }
}

/// 网络协议在各表上要求填写的开通字段。
#[derive(Clone)]
pub struct NetworkProvisioningFieldModel {
    dao: NetworkProvisioningFieldDao,
}

impl NetworkProvisioningFieldModel {
    pub fn new(dao: NetworkProvisioningFieldDao) -> Self {
        Self { dao }
    }

    pub async fn create_network_provisioning_field(
        &self,
        input: &NewNetworkProvisioningField,
    ) -> Result<NetworkProvisioningFieldRecord, ModelError> {
        let record = self.dao.create(input).await?;
        lpwan_telemetry::record_created();
        Ok(record)
    }

    pub async fn retrieve_network_provisioning_field(
        &self,
        id: &str,
    ) -> Result<NetworkProvisioningFieldRecord, ModelError> {
        Ok(self.dao.retrieve(id).await?)
    }

    /// 结果按 fieldOrder 升序。
    pub async fn retrieve_network_provisioning_fields(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<NetworkProvisioningFieldRecord>, ModelError> {
        let mut list = self.dao.retrieve_many(options).await?;
        list.records.sort_by_key(|field| field.field_order);
        Ok(list)
    }

    pub async fn update_network_provisioning_field(
        &self,
        id: &str,
        update: &NetworkProvisioningFieldUpdate,
    ) -> Result<NetworkProvisioningFieldRecord, ModelError> {
        Ok(self.dao.update(id, update).await?)
    }

    pub async fn delete_network_provisioning_field(&self, id: &str) -> Result<(), ModelError> {
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        Ok(())
    }
}
