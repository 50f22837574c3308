//! 网络协议模型：读取时合并处理器元数据，启动时登记内置处理器

use crate::{ModelError, NetworkTypeModel};
use lpwan_protocol::{NetworkProtocolHandler, ProtocolRegistry};
use lpwan_storage::{
    ListOptions, NetworkProtocolDao, NetworkProtocolRecord, NetworkProtocolUpdate,
    NewNetworkProtocol, RecordList,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct NetworkProtocolModel {
    dao: NetworkProtocolDao,
    network_types: NetworkTypeModel,
    registry: ProtocolRegistry,
}

impl NetworkProtocolModel {
    pub fn new(
        dao: NetworkProtocolDao,
        network_types: NetworkTypeModel,
        registry: ProtocolRegistry,
    ) -> Self {
        Self {
            dao,
            network_types,
            registry,
        }
    }

    pub async fn create_network_protocol(
        &self,
        input: &NewNetworkProtocol,
    ) -> Result<NetworkProtocolRecord, ModelError> {
        let record = self.dao.create(input).await?;
        lpwan_telemetry::record_created();
        Ok(self.with_meta_data(record))
    }

    pub async fn retrieve_network_protocol(
        &self,
        id: &str,
    ) -> Result<NetworkProtocolRecord, ModelError> {
        let record = self.dao.retrieve(id).await?;
        Ok(self.with_meta_data(record))
    }

    pub async fn retrieve_network_protocols(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<NetworkProtocolRecord>, ModelError> {
        let list = self.dao.retrieve_many(options).await?;
        Ok(list.map(|record| self.with_meta_data(record)))
    }

    pub async fn update_network_protocol(
        &self,
        id: &str,
        update: &NetworkProtocolUpdate,
    ) -> Result<NetworkProtocolRecord, ModelError> {
        let record = self.dao.update(id, update).await?;
        Ok(self.with_meta_data(record))
    }

    /// 按 protocolHandler 存在则更新、否则创建。
    pub async fn upsert_network_protocol(
        &self,
        input: &NewNetworkProtocol,
    ) -> Result<NetworkProtocolRecord, ModelError> {
        let record = self.dao.upsert(input).await?;
        Ok(self.with_meta_data(record))
    }

    pub async fn delete_network_protocol(&self, id: &str) -> Result<(), ModelError> {
        self.dao.delete(id).await?;
        lpwan_telemetry::record_deleted();
        Ok(())
    }

    /// 解析网络协议记录对应的处理器。
    pub async fn handler_for(
        &self,
        network_protocol_id: &str,
    ) -> Result<(NetworkProtocolRecord, Arc<dyn NetworkProtocolHandler>), ModelError> {
        let record = self.dao.retrieve(network_protocol_id).await?;
        let handler = self.registry.require(&record.protocol_handler)?;
        Ok((record, handler))
    }

    /// 注册表中的每个处理器登记为一条网络协议（网络类型按名称补建）。
    pub async fn register_handlers(&self) -> Result<Vec<NetworkProtocolRecord>, ModelError> {
        let mut registered = Vec::new();
        for handler in self.registry.handlers() {
            let meta = handler.metadata();
            let network_type = self
                .network_types
                .ensure_network_type(&meta.network_type)
                .await?;
            let input = NewNetworkProtocol {
                name: meta.protocol_handler_name.clone(),
                network_type_id: network_type.id,
                protocol_handler: handler.handler_id().to_string(),
                network_protocol_version: Some(meta.version.clone()),
                master_protocol: None,
            };
            let record = self.upsert_network_protocol(&input).await?;
            tracing::info!(
                target: "lpwan.model",
                handler = %record.protocol_handler,
                network_protocol_id = %record.id,
                "network protocol registered"
            );
            registered.push(record);
        }
        Ok(registered)
    }

    fn with_meta_data(&self, mut record: NetworkProtocolRecord) -> NetworkProtocolRecord {
        match self.registry.get(&record.protocol_handler) {
            Some(handler) => {
                record.meta_data = serde_json::to_value(handler.metadata()).ok();
            }
            None => {
                tracing::warn!(
                    target: "lpwan.model",
                    handler = %record.protocol_handler,
                    network_protocol_id = %record.id,
                    "no registered handler for network protocol, metaData omitted"
                );
            }
        }
        record
    }
}
