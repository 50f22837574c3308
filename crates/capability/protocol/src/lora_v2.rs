//! LoRa Server v2 处理器
//!
//! 通过 LoRa App Server v2 的 REST 网关访问远端：
//! - 登录：`POST {baseUrl}/internal/login`，凭据取自网络 securityData 的 username/password
//! - 认证头：`Grpc-Metadata-Authorization: Bearer <jwt>`
//! - 列表响应：`{ "totalCount": "N", "result": [...] }`（totalCount 可能是字符串）
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let handler = LoraServerV2Handler::new(Duration::from_secs(30))?;
//! let companies = handler.pull_companies(&network).await?;
//! ```

use crate::error::ProtocolError;
use crate::handler::NetworkProtocolHandler;
use crate::types::{
    ProtocolMetadata, RemoteApplication, RemoteCompany, RemoteDevice, RemoteDeviceProfile,
    RemoteNetwork,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

pub const LORA_SERVER_V2: &str = "LoRaOpenSource_2";

const AUTH_HEADER: &str = "Grpc-Metadata-Authorization";
/// 列表接口单页上限（远端要求显式 limit）
const PAGE_LIMIT: &str = "9999";

#[derive(Deserialize)]
struct LoginResponse {
    jwt: String,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    result: Vec<Value>,
}

pub struct LoraServerV2Handler {
    http: reqwest::Client,
}

impl LoraServerV2Handler {
    /// 创建处理器，`timeout` 为单次 HTTP 请求超时
    pub fn new(timeout: Duration) -> Result<Self, ProtocolError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// 使用已构建的 HTTP 客户端
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn url(network: &RemoteNetwork, path: &str) -> Result<String, ProtocolError> {
        let base = network.base_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(ProtocolError::Config(format!(
                "network {} has no baseUrl",
                network.id
            )));
        }
        Ok(format!("{base}{path}"))
    }

    async fn login(&self, network: &RemoteNetwork) -> Result<String, ProtocolError> {
        let (Some(username), Some(password)) =
            (network.credential("username"), network.credential("password"))
        else {
            return Err(ProtocolError::Config(format!(
                "network {} securityData lacks username/password",
                network.id
            )));
        };
        let url = Self::url(network, "/internal/login")?;
        debug!(target: "lpwan.protocol", network_id = %network.id, "POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(target: "lpwan.protocol", network_id = %network.id, status = status.as_u16(), "login rejected");
            return Err(ProtocolError::Authentication(format!("{status}: {message}")));
        }
        let body: LoginResponse = resp.json().await?;
        Ok(body.jwt)
    }

    async fn get(
        &self,
        network: &RemoteNetwork,
        jwt: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, ProtocolError> {
        let url = Self::url(network, path)?;
        debug!(target: "lpwan.protocol", network_id = %network.id, "GET {}", url);
        let resp = self
            .http
            .get(url)
            .header(AUTH_HEADER, format!("Bearer {jwt}"))
            .query(query)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ProtocolError::Remote {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json().await?)
    }

    async fn list(
        &self,
        network: &RemoteNetwork,
        jwt: &str,
        path: &str,
    ) -> Result<Vec<Value>, ProtocolError> {
        let body = self
            .get(network, jwt, path, &[("limit", PAGE_LIMIT)])
            .await?;
        let list: ListResponse = serde_json::from_value(body)?;
        Ok(list.result)
    }
}

/// 读取字符串字段（远端 ID 可能是数字）
fn text(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn required(item: &Value, key: &str) -> Result<String, ProtocolError> {
    text(item, key).ok_or_else(|| ProtocolError::Decode(format!("missing field {key}")))
}

fn description(item: &Value) -> Option<String> {
    text(item, "description").filter(|value| !value.is_empty())
}

#[async_trait]
impl NetworkProtocolHandler for LoraServerV2Handler {
    fn handler_id(&self) -> &str {
        LORA_SERVER_V2
    }

    fn metadata(&self) -> ProtocolMetadata {
        ProtocolMetadata {
            protocol_handler_name: "LoRa Server".to_string(),
            network_type: "LoRa".to_string(),
            version: "2.0".to_string(),
        }
    }

    async fn test_connection(&self, network: &RemoteNetwork) -> Result<(), ProtocolError> {
        self.login(network).await.map(|_| ())
    }

    async fn pull_companies(
        &self,
        network: &RemoteNetwork,
    ) -> Result<Vec<RemoteCompany>, ProtocolError> {
        let jwt = self.login(network).await?;
        let items = self.list(network, &jwt, "/organizations").await?;
        items
            .iter()
            .map(|item| {
                Ok(RemoteCompany {
                    id: required(item, "id")?,
                    name: required(item, "name")?,
                })
            })
            .collect()
    }

    async fn pull_applications(
        &self,
        network: &RemoteNetwork,
    ) -> Result<Vec<RemoteApplication>, ProtocolError> {
        let jwt = self.login(network).await?;
        let items = self.list(network, &jwt, "/applications").await?;
        items
            .iter()
            .map(|item| {
                Ok(RemoteApplication {
                    id: required(item, "id")?,
                    name: required(item, "name")?,
                    description: description(item),
                    company_id: required(item, "organizationID")?,
                })
            })
            .collect()
    }

    async fn pull_device_profiles(
        &self,
        network: &RemoteNetwork,
    ) -> Result<Vec<RemoteDeviceProfile>, ProtocolError> {
        let jwt = self.login(network).await?;
        let items = self.list(network, &jwt, "/device-profiles").await?;
        let mut profiles = Vec::with_capacity(items.len());
        for item in &items {
            let id = required(item, "deviceProfileID")?;
            let detail = self
                .get(network, &jwt, &format!("/device-profiles/{id}"), &[])
                .await?;
            let network_settings = detail.get("deviceProfile").cloned().unwrap_or(Value::Null);
            profiles.push(RemoteDeviceProfile {
                name: required(item, "name")?,
                description: description(item),
                company_id: required(item, "organizationID")?,
                network_settings,
                id,
            });
        }
        Ok(profiles)
    }

    async fn pull_devices(
        &self,
        network: &RemoteNetwork,
        remote_application_id: &str,
    ) -> Result<Vec<RemoteDevice>, ProtocolError> {
        let jwt = self.login(network).await?;
        let path = format!("/applications/{remote_application_id}/devices");
        let items = self.list(network, &jwt, &path).await?;
        items
            .iter()
            .map(|item| {
                Ok(RemoteDevice {
                    id: required(item, "devEUI")?,
                    name: required(item, "name")?,
                    description: description(item),
                    application_id: text(item, "applicationID")
                        .unwrap_or_else(|| remote_application_id.to_string()),
                    device_profile_id: required(item, "deviceProfileID")?,
                    network_settings: item.clone(),
                })
            })
            .collect()
    }
}
