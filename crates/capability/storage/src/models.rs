//! 数据模型
//!
//! 定义所有实体记录及其创建/更新输入：
//! - 组织：CompanyRecord, UserRecord, PasswordPolicyRecord, CompanyTypeRecord
//! - 应用与设备：ApplicationRecord, DeviceRecord, DeviceProfileRecord
//! - 网络：NetworkRecord, NetworkProtocolRecord, NetworkProviderRecord, NetworkTypeRecord
//! - 关联：Application/Company/DeviceNetworkTypeLinkRecord
//! - 其它：ReportingProtocolRecord, NetworkProvisioningFieldRecord, ProtocolDataRecord
//!
//! 所有记录以 camelCase 序列化；`*Update` 中为 None 的字段不会写入存储。

use domain::{CompanyType, UserRole};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 公司记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
    /// 已关联的网络类型 ID（读取时派生）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub name: String,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub company_type: Option<CompanyType>,
}

/// companyTypes 表记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyTypeRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub code: u8,
}

/// 应用记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: String,
    pub company_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reporting_protocol_id: Option<String>,
    /// 设备数据投递地址。
    #[serde(default)]
    pub base_url: Option<String>,
    /// 是否正在向 baseUrl 转发上行数据。
    #[serde(default)]
    pub running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub company_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reporting_protocol_id: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_protocol_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// 只由启停操作写入，请求体中的同名字段被忽略。
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
}

/// 设备记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub id: String,
    pub application_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub device_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    pub application_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub device_model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,
}

/// 设备档案记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfileRecord {
    pub id: String,
    pub network_type_id: String,
    pub company_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub network_settings: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeviceProfile {
    pub network_type_id: String,
    pub company_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub network_settings: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_settings: Option<Value>,
}

/// 网络记录。
///
/// 存储层的 `security_data` 为密文字符串，模型层读出后替换为明文。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
    pub id: String,
    pub name: String,
    pub network_provider_id: String,
    pub network_type_id: String,
    pub network_protocol_id: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub security_data: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNetwork {
    pub name: String,
    pub network_provider_id: String,
    pub network_type_id: String,
    pub network_protocol_id: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub security_data: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_provider_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_protocol_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_data: Option<Value>,
}

/// 网络协议记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProtocolRecord {
    pub id: String,
    pub name: String,
    pub network_type_id: String,
    pub protocol_handler: String,
    #[serde(default)]
    pub network_protocol_version: Option<String>,
    #[serde(default)]
    pub master_protocol: Option<String>,
    /// 处理器元数据（读取时合并，不落库）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNetworkProtocol {
    pub name: String,
    pub network_type_id: String,
    pub protocol_handler: String,
    #[serde(default)]
    pub network_protocol_version: Option<String>,
    #[serde(default)]
    pub master_protocol: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProtocolUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_handler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_protocol_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_protocol: Option<String>,
}

/// 具名参考实体（网络提供商、网络类型）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRecord {
    pub id: String,
    pub name: String,
}

pub type NetworkProviderRecord = NamedRecord;
pub type NetworkTypeRecord = NamedRecord;

/// 上报协议记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingProtocolRecord {
    pub id: String,
    pub name: String,
    pub protocol_handler: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingProtocolUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_handler: Option<String>,
}

/// 网络协议要求的开通字段（按 provisioningTableId 区分公司、应用、设备等表）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProvisioningFieldRecord {
    pub id: String,
    pub network_protocol_id: String,
    #[serde(default)]
    pub field_order: i64,
    pub field_name: String,
    #[serde(default)]
    pub field_label: Option<String>,
    #[serde(default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub field_size: Option<i64>,
    #[serde(default)]
    pub required_field: bool,
    pub provisioning_table_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNetworkProvisioningField {
    pub network_protocol_id: String,
    #[serde(default)]
    pub field_order: i64,
    pub field_name: String,
    #[serde(default)]
    pub field_label: Option<String>,
    #[serde(default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub field_size: Option<i64>,
    #[serde(default)]
    pub required_field: bool,
    pub provisioning_table_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProvisioningFieldUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_protocol_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_field: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_table_id: Option<String>,
}

/// 应用与网络类型的关联。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationNetworkTypeLinkRecord {
    pub id: String,
    pub application_id: String,
    pub network_type_id: String,
    #[serde(default)]
    pub network_settings: Value,
}

/// 公司与网络类型的关联。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyNetworkTypeLinkRecord {
    pub id: String,
    pub company_id: String,
    pub network_type_id: String,
    #[serde(default)]
    pub network_settings: Value,
}

/// 设备与网络类型的关联（携带设备档案）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceNetworkTypeLinkRecord {
    pub id: String,
    pub device_id: String,
    pub network_type_id: String,
    pub device_profile_id: String,
    #[serde(default)]
    pub network_settings: Value,
}

/// 关联记录的部分更新（三种关联共用）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_settings: Option<Value>,
}

/// 口令策略记录，company_id 为 None 表示全局规则。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPolicyRecord {
    pub id: String,
    pub rule_text: String,
    pub rule_reg_exp: String,
    #[serde(default)]
    pub company_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordPolicy {
    pub rule_text: String,
    pub rule_reg_exp: String,
    #[serde(default)]
    pub company_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPolicyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_reg_exp: Option<String>,
}

/// 用户记录。口令哈希只在存储层可见，不随响应输出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    pub company_id: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub company_id: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// 协议数据：按 (networkId, networkProtocolId, dataIdentifier) 定位的键值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolDataRecord {
    pub id: String,
    pub network_id: String,
    pub network_protocol_id: String,
    pub data_identifier: String,
    pub data_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProtocolData {
    pub network_id: String,
    pub network_protocol_id: String,
    pub data_identifier: String,
    pub data_value: String,
}
