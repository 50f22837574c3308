//! 实体 DAO 模块
//!
//! 每个实体一个 DAO，统一形态：
//! - create：插入并返回记录
//! - retrieve：按 ID 读取，不存在返回 NotFound
//! - update：按 ID 部分更新，不存在返回 NotFound
//! - delete：按 ID 删除，不存在返回 NotFound
//! - retrieve_many：按 ListOptions 分页查询，返回 {totalCount, records}
//!
//! DAO 之间不互相持有，跨实体编排由模型层完成。
//! 携带 networkSettings 的表在文档边界统一做 JSON 字符串编解码。

pub mod application;
pub mod company;
pub mod device;
pub mod device_profile;
pub mod links;
pub mod network;
pub mod network_protocol;
pub mod password_policy;
pub mod protocol_data;
pub mod reference;
pub mod user;

pub use application::ApplicationDao;
pub use company::CompanyDao;
pub use device::DeviceDao;
pub use device_profile::DeviceProfileDao;
pub use links::{ApplicationNetworkTypeLinkDao, CompanyNetworkTypeLinkDao, DeviceNetworkTypeLinkDao};
pub use network::NetworkDao;
pub use network_protocol::NetworkProtocolDao;
pub use password_policy::PasswordPolicyDao;
pub use protocol_data::ProtocolDataDao;
pub use reference::{
    NetworkProviderDao, NetworkProvisioningFieldDao, NetworkTypeDao, ReportingProtocolDao,
};
pub use user::UserDao;

use crate::adapter::{LOGICAL_ID, SEARCH_KEY};
use crate::error::StorageError;
use crate::traits::{Document, RecordQuery, RecordStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// 逻辑表名。
pub mod tables {
    pub const COMPANIES: &str = "companies";
    pub const COMPANY_TYPES: &str = "companyTypes";
    pub const APPLICATIONS: &str = "applications";
    pub const DEVICES: &str = "devices";
    pub const DEVICE_PROFILES: &str = "deviceProfiles";
    pub const NETWORKS: &str = "networks";
    pub const NETWORK_PROTOCOLS: &str = "networkProtocols";
    pub const NETWORK_PROVIDERS: &str = "networkProviders";
    pub const NETWORK_TYPES: &str = "networkTypes";
    pub const NETWORK_PROVISIONING_FIELDS: &str = "networkProvisioningFields";
    pub const APPLICATION_NETWORK_TYPE_LINKS: &str = "applicationNetworkTypeLinks";
    pub const COMPANY_NETWORK_TYPE_LINKS: &str = "companyNetworkTypeLinks";
    pub const DEVICE_NETWORK_TYPE_LINKS: &str = "deviceNetworkTypeLinks";
    pub const PASSWORD_POLICIES: &str = "passwordPolicies";
    pub const REPORTING_PROTOCOLS: &str = "reportingProtocols";
    pub const USERS: &str = "users";
    pub const PROTOCOL_DATA: &str = "protocolData";
}

const NETWORK_SETTINGS: &str = "networkSettings";

/// 批量查询选项。
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub search: Option<String>,
    pub filters: Document,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// 追加实体特定过滤条件，数组值表示成员匹配。
    pub fn filter(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.filters.insert(key.to_string(), value.into());
        self
    }

    fn to_query(&self) -> RecordQuery {
        let mut filter = self.filters.clone();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            filter.insert(SEARCH_KEY.to_string(), Value::String(search.to_string()));
        }
        RecordQuery {
            filter,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// 批量查询结果。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordList<T> {
    pub total_count: usize,
    pub records: Vec<T>,
}

impl<T> RecordList<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> RecordList<U> {
        RecordList {
            total_count: self.total_count,
            records: self.records.into_iter().map(f).collect(),
        }
    }
}

/// 单张逻辑表的类型化访问入口。
#[derive(Clone)]
pub(crate) struct Table {
    store: Arc<dyn RecordStore>,
    name: &'static str,
    settings: bool,
}

impl Table {
    pub(crate) fn new(store: Arc<dyn RecordStore>, name: &'static str) -> Self {
        Self {
            store,
            name,
            settings: false,
        }
    }

    /// 该表的 networkSettings 以 JSON 字符串落库。
    pub(crate) fn with_settings(mut self) -> Self {
        self.settings = true;
        self
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Document, StorageError> {
        let mut document = match serde_json::to_value(value)? {
            Value::Object(map) => map,
            _ => return Err(StorageError::new(format!("{}: record is not an object", self.name))),
        };
        if self.settings {
            encode_settings(&mut document)?;
        }
        Ok(document)
    }

    fn decode<R: DeserializeOwned>(&self, mut document: Document) -> Result<R, StorageError> {
        if self.settings {
            decode_settings(self.name, &mut document);
        }
        Ok(serde_json::from_value(Value::Object(document))?)
    }

    pub(crate) async fn insert<T: Serialize, R: DeserializeOwned>(
        &self,
        input: &T,
    ) -> Result<R, StorageError> {
        let document = self.encode(input)?;
        let stored = self.store.insert(self.name, document).await?;
        tracing::debug!(target: "lpwan.storage", table = self.name, "record created");
        self.decode(stored)
    }

    pub(crate) async fn find_by<R: DeserializeOwned>(
        &self,
        key: &str,
        value: Value,
    ) -> Result<Option<R>, StorageError> {
        match self.store.fetch_one(self.name, key, &value).await? {
            Some(document) => Ok(Some(self.decode(document)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn retrieve<R: DeserializeOwned>(&self, id: &str) -> Result<R, StorageError> {
        self.find_by(LOGICAL_ID, Value::String(id.to_string()))
            .await?
            .ok_or_else(|| StorageError::not_found(self.name, id))
    }

    pub(crate) async fn update<T: Serialize, R: DeserializeOwned>(
        &self,
        id: &str,
        update: &T,
    ) -> Result<R, StorageError> {
        let mut document = self.encode(update)?;
        document.insert(LOGICAL_ID.to_string(), Value::String(id.to_string()));
        match self.store.update(self.name, LOGICAL_ID, document).await? {
            Some(updated) => self.decode(updated),
            None => Err(StorageError::not_found(self.name, id)),
        }
    }

    /// 按任意键存在则更新、否则插入。
    pub(crate) async fn upsert<T: Serialize, R: DeserializeOwned>(
        &self,
        key: &str,
        record: &T,
    ) -> Result<R, StorageError> {
        let document = self.encode(record)?;
        let stored = self.store.upsert(self.name, key, document).await?;
        self.decode(stored)
    }

    pub(crate) async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let value = Value::String(id.to_string());
        if self.store.delete(self.name, LOGICAL_ID, &value).await? {
            tracing::debug!(target: "lpwan.storage", table = self.name, id, "record deleted");
            Ok(())
        } else {
            Err(StorageError::not_found(self.name, id))
        }
    }

    pub(crate) async fn retrieve_many<R: DeserializeOwned>(
        &self,
        options: &ListOptions,
    ) -> Result<RecordList<R>, StorageError> {
        let page = self.store.fetch_many(self.name, &options.to_query()).await?;
        let mut records = Vec::with_capacity(page.records.len());
        for document in page.records {
            records.push(self.decode(document)?);
        }
        Ok(RecordList {
            total_count: page.total_count,
            records,
        })
    }

    /// 在某个所有者名下按名称精确查找。
    pub(crate) async fn find_owned<R: DeserializeOwned>(
        &self,
        owner_key: &str,
        owner_id: &str,
        name: &str,
    ) -> Result<Option<R>, StorageError> {
        let options = ListOptions::new()
            .filter(owner_key, owner_id)
            .filter("name", name)
            .limit(1);
        let list = self.retrieve_many(&options).await?;
        Ok(list.records.into_iter().next())
    }

    /// 某个所有者关联的网络类型 ID 列表。
    ///
    /// 查询失败时记录告警并返回 None，不影响主记录读取。
    pub(crate) async fn linked_network_types(
        &self,
        owner_key: &str,
        owner_id: &str,
    ) -> Option<Vec<String>> {
        let options = ListOptions::new().filter(owner_key, owner_id);
        match self.store.fetch_many(self.name, &options.to_query()).await {
            Ok(page) => Some(
                page.records
                    .iter()
                    .filter_map(|doc| doc.get("networkTypeId").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect(),
            ),
            Err(err) => {
                tracing::warn!(
                    target: "lpwan.storage",
                    table = self.name,
                    owner_id,
                    error = %err,
                    "network lookup failed"
                );
                None
            }
        }
    }
}

fn encode_settings(document: &mut Document) -> Result<(), StorageError> {
    let encoded = match document.get(NETWORK_SETTINGS) {
        Some(settings) if !settings.is_null() => serde_json::to_string(settings)?,
        _ => return Ok(()),
    };
    document.insert(NETWORK_SETTINGS.to_string(), Value::String(encoded));
    Ok(())
}

fn decode_settings(table: &str, document: &mut Document) {
    let decoded = match document.get(NETWORK_SETTINGS) {
        Some(Value::String(encoded)) => serde_json::from_str::<Value>(encoded),
        _ => return,
    };
    match decoded {
        Ok(settings) => {
            document.insert(NETWORK_SETTINGS.to_string(), settings);
        }
        Err(err) => {
            tracing::warn!(
                target: "lpwan.storage",
                table,
                error = %err,
                "networkSettings is not valid JSON, kept as text"
            );
        }
    }
}

/// 所有实体 DAO 的集合，共享同一存储后端。
#[derive(Clone)]
pub struct DataAccess {
    pub companies: CompanyDao,
    pub applications: ApplicationDao,
    pub devices: DeviceDao,
    pub device_profiles: DeviceProfileDao,
    pub networks: NetworkDao,
    pub network_protocols: NetworkProtocolDao,
    pub network_providers: NetworkProviderDao,
    pub network_types: NetworkTypeDao,
    pub reporting_protocols: ReportingProtocolDao,
    pub provisioning_fields: NetworkProvisioningFieldDao,
    pub application_links: ApplicationNetworkTypeLinkDao,
    pub company_links: CompanyNetworkTypeLinkDao,
    pub device_links: DeviceNetworkTypeLinkDao,
    pub password_policies: PasswordPolicyDao,
    pub users: UserDao,
    pub protocol_data: ProtocolDataDao,
}

impl DataAccess {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            companies: CompanyDao::new(store.clone()),
            applications: ApplicationDao::new(store.clone()),
            devices: DeviceDao::new(store.clone()),
            device_profiles: DeviceProfileDao::new(store.clone()),
            networks: NetworkDao::new(store.clone()),
            network_protocols: NetworkProtocolDao::new(store.clone()),
            network_providers: NetworkProviderDao::new(store.clone()),
            network_types: NetworkTypeDao::new(store.clone()),
            reporting_protocols: ReportingProtocolDao::new(store.clone()),
            provisioning_fields: NetworkProvisioningFieldDao::new(store.clone()),
            application_links: ApplicationNetworkTypeLinkDao::new(store.clone()),
            company_links: CompanyNetworkTypeLinkDao::new(store.clone()),
            device_links: DeviceNetworkTypeLinkDao::new(store.clone()),
            password_policies: PasswordPolicyDao::new(store.clone()),
            users: UserDao::new(store.clone()),
            protocol_data: ProtocolDataDao::new(store),
        }
    }
}
