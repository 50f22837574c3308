//! 参考数据 handlers：网络提供商、网络类型、上报协议
//!
//! 已登录即可读取，写操作仅系统管理员。

use crate::AppState;
use crate::middleware::{require_caller, require_system_admin};
use crate::utils::{
    ApiResult, list_options, list_response, model_error, normalize_optional, normalize_required,
    ok,
};
use api_contract::{CreateReportingProtocolRequest, ListQuery, NamedRequest};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use lpwan_storage::ReportingProtocolUpdate;

// ---- 网络提供商 ----

pub async fn list_network_providers(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    require_caller(&state, &headers)?;
    let list = state
        .models
        .network_providers
        .retrieve_network_providers(&list_options(&query))
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

pub async fn create_network_provider(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NamedRequest>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let name = normalize_required(&req.name, "name")?;
    let provider = state
        .models
        .network_providers
        .create_network_provider(&name)
        .await
        .map_err(model_error)?;
    Ok(ok(provider))
}

pub async fn get_network_provider(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    require_caller(&state, &headers)?;
    let provider = state
        .models
        .network_providers
        .retrieve_network_provider(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(provider))
}

pub async fn update_network_provider(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<NamedRequest>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let name = normalize_required(&req.name, "name")?;
    let provider = state
        .models
        .network_providers
        .update_network_provider(&id, &name)
        .await
        .map_err(model_error)?;
    Ok(ok(provider))
}

pub async fn delete_network_provider(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    state
        .models
        .network_providers
        .delete_network_provider(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(()))
}

// ---- 网络类型 ----

pub async fn list_network_types(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    require_caller(&state, &headers)?;
    let list = state
        .models
        .network_types
        .retrieve_network_types(&list_options(&query))
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

pub async fn create_network_type(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NamedRequest>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let name = normalize_required(&req.name, "name")?;
    let network_type = state
        .models
        .network_types
        .create_network_type(&name)
        .await
        .map_err(model_error)?;
    Ok(ok(network_type))
}

pub async fn get_network_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    require_caller(&state, &headers)?;
    let network_type = state
        .models
        .network_types
        .retrieve_network_type(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(network_type))
}

pub async fn update_network_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<NamedRequest>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let name = normalize_required(&req.name, "name")?;
    let network_type = state
        .models
        .network_types
        .update_network_type(&id, &name)
        .await
        .map_err(model_error)?;
    Ok(ok(network_type))
}

pub async fn delete_network_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    state
        .models
        .network_types
        .delete_network_type(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(()))
}

// ---- 上报协议 ----

pub async fn list_reporting_protocols(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    require_caller(&state, &headers)?;
    let list = state
        .models
        .reporting_protocols
        .retrieve_reporting_protocols(&list_options(&query))
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

pub async fn create_reporting_protocol(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateReportingProtocolRequest>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let name = normalize_required(&req.name, "name")?;
    let handler = normalize_required(&req.protocol_handler, "protocolHandler")?;
    let protocol = state
        .models
        .reporting_protocols
        .create_reporting_protocol(&name, &handler)
        .await
        .map_err(model_error)?;
    Ok(ok(protocol))
}

pub async fn get_reporting_protocol(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    require_caller(&state, &headers)?;
    let protocol = state
        .models
        .reporting_protocols
        .retrieve_reporting_protocol(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(protocol))
}

pub async fn update_reporting_protocol(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut req): Json<ReportingProtocolUpdate>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    req.name = normalize_optional(req.name.as_deref(), "name")?;
    req.protocol_handler = normalize_optional(req.protocol_handler.as_deref(), "protocolHandler")?;
    let protocol = state
        .models
        .reporting_protocols
        .update_reporting_protocol(&id, &req)
        .await
        .map_err(model_error)?;
    Ok(ok(protocol))
}

pub async fn delete_reporting_protocol(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    state
        .models
        .reporting_protocols
        .delete_reporting_protocol(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{body_json, build_state, system_admin};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let state = build_state().await;
        let response = create_network_provider(
            State(state.clone()),
            system_admin(),
            Json(NamedRequest {
                name: "   ".to_string(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_matches_names_case_insensitively() {
        let state = build_state().await;
        for name in ["Kyrio", "Senet", "Kerlink"] {
            create_network_provider(
                State(state.clone()),
                system_admin(),
                Json(NamedRequest {
                    name: name.to_string(),
                }),
            )
            .await
            .into_response();
        }
        let query = ListQuery {
            search: Some("k%".to_string()),
            ..ListQuery::default()
        };
        let response = list_network_providers(State(state), system_admin(), Query(query))
            .await
            .into_response();
        let body = body_json(response).await;
        assert_eq!(body["data"]["totalCount"], 2);
    }
}
