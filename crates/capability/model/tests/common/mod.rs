#![allow(dead_code)]

use async_trait::async_trait;
use lpwan_model::ModelApi;
use lpwan_protocol::{
    NetworkProtocolHandler, ProtocolError, ProtocolMetadata, ProtocolRegistry, RemoteApplication,
    RemoteCompany, RemoteDevice, RemoteDeviceProfile, RemoteNetwork,
};
use lpwan_storage::{
    Document, InMemoryRecordStore, RecordPage, RecordQuery, RecordStore, StorageError,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

pub const FAKE_HANDLER: &str = "FakeServer_1";

/// 固定数据的远端网络服务器。
pub struct FakeHandler;

#[async_trait]
impl NetworkProtocolHandler for FakeHandler {
    fn handler_id(&self) -> &str {
        FAKE_HANDLER
    }

    fn metadata(&self) -> ProtocolMetadata {
        ProtocolMetadata {
            protocol_handler_name: "Fake Server".to_string(),
            network_type: "LoRa".to_string(),
            version: "1.0".to_string(),
        }
    }

    async fn test_connection(&self, network: &RemoteNetwork) -> Result<(), ProtocolError> {
        match network.credential("password") {
            Some("good") => Ok(()),
            Some(_) => Err(ProtocolError::Authentication("bad password".to_string())),
            None => Err(ProtocolError::Config("missing password".to_string())),
        }
    }

    async fn pull_companies(
        &self,
        _network: &RemoteNetwork,
    ) -> Result<Vec<RemoteCompany>, ProtocolError> {
        Ok(vec![RemoteCompany {
            id: "10".to_string(),
            name: "cablelabs".to_string(),
        }])
    }

    async fn pull_applications(
        &self,
        _network: &RemoteNetwork,
    ) -> Result<Vec<RemoteApplication>, ProtocolError> {
        Ok(vec![
            RemoteApplication {
                id: "7".to_string(),
                name: "tracker".to_string(),
                description: Some("pet tracker".to_string()),
                company_id: "10".to_string(),
            },
            RemoteApplication {
                id: "8".to_string(),
                name: "orphan".to_string(),
                description: None,
                company_id: "99".to_string(),
            },
        ])
    }

    async fn pull_device_profiles(
        &self,
        _network: &RemoteNetwork,
    ) -> Result<Vec<RemoteDeviceProfile>, ProtocolError> {
        Ok(vec![RemoteDeviceProfile {
            id: "dp-1".to_string(),
            name: "class-a".to_string(),
            description: None,
            company_id: "10".to_string(),
            network_settings: json!({ "macVersion": "1.0.2" }),
        }])
    }

    async fn pull_devices(
        &self,
        _network: &RemoteNetwork,
        remote_application_id: &str,
    ) -> Result<Vec<RemoteDevice>, ProtocolError> {
        if remote_application_id != "7" {
            return Ok(Vec::new());
        }
        Ok(vec![RemoteDevice {
            id: "0080000000000001".to_string(),
            name: "dog1".to_string(),
            description: None,
            application_id: "7".to_string(),
            device_profile_id: "dp-1".to_string(),
            network_settings: json!({ "devEUI": "0080000000000001" }),
        }])
    }
}

/// 注入失败的存储操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    FetchMany,
    Update,
    Delete,
}

/// 可在指定表上注入失败的存储，默认只让列表查询失败。
pub struct FailingStore {
    inner: InMemoryRecordStore,
    table: &'static str,
    op: FailOn,
    armed: AtomicBool,
    /// 只对该 id 的记录失败；为空时整表失败
    only: Mutex<Option<Value>>,
}

impl FailingStore {
    pub fn new(table: &'static str) -> Self {
        Self::failing(table, FailOn::FetchMany)
    }

    pub fn failing(table: &'static str, op: FailOn) -> Self {
        Self {
            inner: InMemoryRecordStore::new(),
            table,
            op,
            armed: AtomicBool::new(false),
            only: Mutex::new(None),
        }
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub fn arm_for(&self, id: &str) {
        *self.only.lock().expect("lock") = Some(Value::String(id.to_string()));
        self.arm();
    }

    pub fn count(&self, table: &str) -> usize {
        self.inner.count(table)
    }

    fn check(&self, table: &str, op: FailOn, id: Option<&Value>) -> Result<(), StorageError> {
        if table != self.table || op != self.op || !self.armed.load(Ordering::SeqCst) {
            return Ok(());
        }
        let only = self.only.lock().expect("lock");
        match (only.as_ref(), id) {
            (Some(target), Some(id)) if target != id => Ok(()),
            _ => Err(StorageError::new(format!("{table} unavailable"))),
        }
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn insert(&self, table: &str, record: Document) -> Result<Document, StorageError> {
        self.inner.insert(table, record).await
    }

    async fn fetch_one(
        &self,
        table: &str,
        key: &str,
        value: &Value,
    ) -> Result<Option<Document>, StorageError> {
        self.inner.fetch_one(table, key, value).await
    }

    async fn fetch_many(
        &self,
        table: &str,
        query: &RecordQuery,
    ) -> Result<RecordPage, StorageError> {
        self.check(table, FailOn::FetchMany, None)?;
        self.inner.fetch_many(table, query).await
    }

    async fn update(
        &self,
        table: &str,
        key: &str,
        record: Document,
    ) -> Result<Option<Document>, StorageError> {
        self.check(table, FailOn::Update, record.get(key))?;
        self.inner.update(table, key, record).await
    }

    async fn upsert(
        &self,
        table: &str,
        key: &str,
        record: Document,
    ) -> Result<Document, StorageError> {
        self.inner.upsert(table, key, record).await
    }

    async fn delete(&self, table: &str, key: &str, value: &Value) -> Result<bool, StorageError> {
        self.check(table, FailOn::Delete, Some(value))?;
        self.inner.delete(table, key, value).await
    }
}

pub fn registry() -> ProtocolRegistry {
    ProtocolRegistry::new().with(Arc::new(FakeHandler))
}

/// 内存存储 + FakeHandler，已完成初始化。
pub async fn model_api() -> (Arc<InMemoryRecordStore>, ModelApi) {
    let store = Arc::new(InMemoryRecordStore::new());
    let api = ModelApi::new(store.clone(), registry());
    api.initialize().await;
    (store, api)
}
