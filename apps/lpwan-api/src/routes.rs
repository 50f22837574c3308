//! 路由定义
//!
//! 探针：/health, /readyz
//! 业务接口（/api 前缀）：会话、公司、用户、口令策略、应用、设备、设备档案、
//! 网络及拉取、网络协议、网络提供商、网络类型、上报协议、开通字段、三类网络关联、协议数据、计数器。
//! 应用启停与自测、网络上行数据入口（入口不要求登录）。

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 存活与就绪探针
pub fn create_health_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/readyz", get(readyz))
}

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(login).get(current_session))
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/:id",
            get(get_company).put(update_company).delete(delete_company),
        )
        .route("/company-types", get(list_company_types))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route(
            "/password-policies",
            get(list_password_policies).post(create_password_policy),
        )
        .route(
            "/password-policies/:id",
            get(get_password_policy)
                .put(update_password_policy)
                .delete(delete_password_policy),
        )
        .route(
            "/applications",
            get(list_applications).post(create_application),
        )
        .route(
            "/applications/:id",
            get(get_application)
                .put(update_application)
                .delete(delete_application),
        )
        .route("/applications/:id/start", post(start_application))
        .route("/applications/:id/stop", post(stop_application))
        .route("/applications/:id/test", post(test_application))
        .route("/ingest/:applicationId/:networkId", post(ingest_data))
        .route("/devices", get(list_devices).post(create_device))
        .route(
            "/devices/:id",
            get(get_device).put(update_device).delete(delete_device),
        )
        .route(
            "/device-profiles",
            get(list_device_profiles).post(create_device_profile),
        )
        .route(
            "/device-profiles/:id",
            get(get_device_profile)
                .put(update_device_profile)
                .delete(delete_device_profile),
        )
        .route("/networks", get(list_networks).post(create_network))
        .route(
            "/networks/:id",
            get(get_network).put(update_network).delete(delete_network),
        )
        .route("/networks/:id/pull", post(pull_network))
        .route("/networks/:id/pull-companies", post(pull_network_companies))
        .route(
            "/network-protocols",
            get(list_network_protocols).post(create_network_protocol),
        )
        .route(
            "/network-protocols/:id",
            get(get_network_protocol)
                .put(update_network_protocol)
                .delete(delete_network_protocol),
        )
        .route(
            "/network-providers",
            get(list_network_providers).post(create_network_provider),
        )
        .route(
            "/network-providers/:id",
            get(get_network_provider)
                .put(update_network_provider)
                .delete(delete_network_provider),
        )
        .route(
            "/network-types",
            get(list_network_types).post(create_network_type),
        )
        .route(
            "/network-types/:id",
            get(get_network_type)
                .put(update_network_type)
                .delete(delete_network_type),
        )
        .route(
            "/reporting-protocols",
            get(list_reporting_protocols).post(create_reporting_protocol),
        )
        .route(
            "/reporting-protocols/:id",
            get(get_reporting_protocol)
                .put(update_reporting_protocol)
                .delete(delete_reporting_protocol),
        )
        .route(
            "/network-provisioning-fields",
            get(list_provisioning_fields).post(create_provisioning_field),
        )
        .route(
            "/network-provisioning-fields/:id",
            get(get_provisioning_field)
                .put(update_provisioning_field)
                .delete(delete_provisioning_field),
        )
        .route(
            "/application-network-type-links",
            get(list_application_links).post(create_application_link),
        )
        .route(
            "/application-network-type-links/:id",
            get(get_application_link)
                .put(update_application_link)
                .delete(delete_application_link),
        )
        .route(
            "/company-network-type-links",
            get(list_company_links).post(create_company_link),
        )
        .route(
            "/company-network-type-links/:id",
            get(get_company_link)
                .put(update_company_link)
                .delete(delete_company_link),
        )
        .route(
            "/device-network-type-links",
            get(list_device_links).post(create_device_link),
        )
        .route(
            "/device-network-type-links/:id",
            get(get_device_link)
                .put(update_device_link)
                .delete(delete_device_link),
        )
        .route(
            "/protocol-data",
            get(list_protocol_data).post(create_protocol_data),
        )
        .route(
            "/protocol-data/:id",
            get(get_protocol_data)
                .put(update_protocol_data)
                .delete(delete_protocol_data),
        )
        .route("/metrics", get(get_metrics))
}
