//! 网络协议 handlers
//!
//! 响应中的 metaData 由模型层按 protocolHandler 从注册表合并；写操作仅系统管理员。

use crate::AppState;
use crate::middleware::{require_caller, require_system_admin};
use crate::utils::{
    ApiResult, list_options, list_response, model_error, normalize_optional, normalize_required,
    ok, with_filter,
};
use api_contract::ListQuery;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use lpwan_storage::{NetworkProtocolUpdate, NewNetworkProtocol};

pub async fn list_network_protocols(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    require_caller(&state, &headers)?;
    let options = with_filter(
        list_options(&query),
        "networkTypeId",
        query.network_type_id.as_deref(),
    );
    let options = with_filter(
        options,
        "networkProtocolVersion",
        query.network_protocol_version.as_deref(),
    );
    let list = state
        .models
        .network_protocols
        .retrieve_network_protocols(&options)
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

pub async fn create_network_protocol(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut req): Json<NewNetworkProtocol>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    req.name = normalize_required(&req.name, "name")?;
    req.protocol_handler = normalize_required(&req.protocol_handler, "protocolHandler")?;
    let protocol = state
        .models
        .network_protocols
        .create_network_protocol(&req)
        .await
        .map_err(model_error)?;
    Ok(ok(protocol))
}

pub async fn get_network_protocol(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    require_caller(&state, &headers)?;
    let protocol = state
        .models
        .network_protocols
        .retrieve_network_protocol(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(protocol))
}

pub async fn update_network_protocol(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut req): Json<NetworkProtocolUpdate>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    req.name = normalize_optional(req.name.as_deref(), "name")?;
    req.protocol_handler = normalize_optional(req.protocol_handler.as_deref(), "protocolHandler")?;
    let protocol = state
        .models
        .network_protocols
        .update_network_protocol(&id, &req)
        .await
        .map_err(model_error)?;
    Ok(ok(protocol))
}

pub async fn delete_network_protocol(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    state
        .models
        .network_protocols
        .delete_network_protocol(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{body_json, build_state, system_admin, vendor};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn unknown_handler_has_no_meta_data() {
        let state = build_state().await;
        let (_, vendor_headers) = vendor(&state, "acme").await;
        let lora = state
            .models
            .network_types
            .ensure_network_type("LoRa")
            .await
            .expect("lora");
        let request = NewNetworkProtocol {
            name: "Manual".to_string(),
            network_type_id: lora.id,
            protocol_handler: "Manual_1".to_string(),
            network_protocol_version: Some("1.0".to_string()),
            master_protocol: None,
        };

        let response = create_network_protocol(
            State(state.clone()),
            vendor_headers.clone(),
            Json(request.clone()),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = create_network_protocol(State(state.clone()), system_admin(), Json(request))
            .await
            .into_response();
        let body = body_json(response).await;
        let id = body["data"]["id"].as_str().expect("id").to_string();

        let response = get_network_protocol(State(state), Path(id), vendor_headers)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["protocolHandler"], "Manual_1");
        assert!(body["data"].get("metaData").is_none());
    }
}
