//! 稳定的 DTO 与 API 响应契约。
//!
//! 实体的创建/更新体直接复用存储层输入类型，这里只定义形态不同的请求与响应。

use domain::CompanyType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 登录请求体（兼容 `login_username` / `login_password`）。
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "login_username")]
    pub username: String,
    #[serde(alias = "login_password")]
    pub password: String,
}

/// 登录响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub jwt: String,
    pub expires_at: u64,
    pub user_id: String,
    pub company_id: String,
}

/// 批量查询参数。
///
/// 实体过滤字段只在对应资源上生效，其余忽略。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub search: Option<String>,
    pub company_id: Option<String>,
    pub application_id: Option<String>,
    pub device_id: Option<String>,
    pub device_profile_id: Option<String>,
    pub network_id: Option<String>,
    pub network_type_id: Option<String>,
    pub network_protocol_id: Option<String>,
    pub network_provider_id: Option<String>,
    pub network_protocol_version: Option<String>,
    pub reporting_protocol_id: Option<String>,
    pub provisioning_table_id: Option<String>,
}

/// 批量查询结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub total_count: usize,
    pub records: Vec<T>,
}

/// 创建公司。
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

/// 只有名称的参考实体（网络提供商、网络类型）。
#[derive(Debug, Deserialize)]
pub struct NamedRequest {
    pub name: String,
}

/// 创建上报协议。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportingProtocolRequest {
    pub name: String,
    pub protocol_handler: String,
}

/// 创建应用网络关联。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationLinkRequest {
    pub application_id: String,
    pub network_type_id: String,
    #[serde(default)]
    pub network_settings: Value,
}

/// 创建公司网络关联。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyLinkRequest {
    pub company_id: String,
    pub network_type_id: String,
    #[serde(default)]
    pub network_settings: Value,
}

/// 创建设备网络关联。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceLinkRequest {
    pub device_id: String,
    pub network_type_id: String,
    pub device_profile_id: String,
    #[serde(default)]
    pub network_settings: Value,
}

/// 修改协议数据。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProtocolDataRequest {
    pub network_protocol_id: Option<String>,
    pub data_value: Option<String>,
}
