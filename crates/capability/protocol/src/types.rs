//! 协议相关类型定义

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 处理器元数据
///
/// 合并进网络协议记录的 `metaData` 字段返回给调用方。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolMetadata {
    /// 展示名称（同时作为网络协议记录名称）
    pub protocol_handler_name: String,
    /// 所属网络类型名称
    pub network_type: String,
    /// 协议版本
    pub version: String,
}

/// 调用远端时使用的网络视图
///
/// `security_data` 为解密后的明文凭据。
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteNetwork {
    pub id: String,
    pub name: String,
    pub base_url: String,
    pub security_data: Value,
}

impl RemoteNetwork {
    /// 读取凭据中的字符串字段
    pub fn credential(&self, key: &str) -> Option<&str> {
        self.security_data.get(key).and_then(Value::as_str)
    }
}

/// 远端组织（映射为本地公司）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCompany {
    pub id: String,
    pub name: String,
}

/// 远端应用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteApplication {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// 所属远端组织 ID
    pub company_id: String,
}

/// 远端设备档案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDeviceProfile {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub company_id: String,
    /// 协议相关的档案参数
    pub network_settings: Value,
}

/// 远端设备
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDevice {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub application_id: String,
    pub device_profile_id: String,
    pub network_settings: Value,
}
