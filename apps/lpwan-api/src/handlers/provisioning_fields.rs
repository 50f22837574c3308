//! 网络开通字段 handlers
//!
//! 已登录即可读取，写操作仅系统管理员。列表可按 networkProtocolId、provisioningTableId 过滤。

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
use lpwan_storage::{NetworkProvisioningFieldUpdate, NewNetworkProvisioningField};

pub async fn list_provisioning_fields(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    require_caller(&state, &headers)?;
    let options = with_filter(
        list_options(&query),
        "networkProtocolId",
        query.network_protocol_id.as_deref(),
    );
    let options = with_filter(
        options,
        "provisioningTableId",
        query.provisioning_table_id.as_deref(),
    );
    let list = state
        .models
        .provisioning_fields
        .retrieve_network_provisioning_fields(&options)
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

pub async fn create_provisioning_field(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut req): Json<NewNetworkProvisioningField>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    req.network_protocol_id = normalize_required(&req.network_protocol_id, "networkProtocolId")?;
    req.field_name = normalize_required(&req.field_name, "fieldName")?;
    req.provisioning_table_id =
        normalize_required(&req.provisioning_table_id, "provisioningTableId")?;
    let field = state
        .models
        .provisioning_fields
        .create_network_provisioning_field(&req)
        .await
        .map_err(model_error)?;
    Ok(ok(field))
}

pub async fn get_provisioning_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    require_caller(&state, &headers)?;
    let field = state
        .models
        .provisioning_fields
        .retrieve_network_provisioning_field(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(field))
}

pub async fn update_provisioning_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut req): Json<NetworkProvisioningFieldUpdate>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    req.field_name = normalize_optional(req.field_name.as_deref(), "fieldName")?;
    let field = state
        .models
        .provisioning_fields
        .update_network_provisioning_field(&id, &req)
        .await
        .map_err(model_error)?;
    Ok(ok(field))
}

pub async fn delete_provisioning_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    state
        .models
        .provisioning_fields
        .delete_network_provisioning_field(&id)
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

    fn field(order: i64, name: &str, table: &str) -> NewNetworkProvisioningField {
        NewNetworkProvisioningField {
            network_protocol_id: "dddddddddddddddddddddddd".to_string(),
            field_order: order,
            field_name: name.to_string(),
            field_label: Some(name.to_uppercase()),
            field_type: Some("string".to_string()),
            field_size: Some(32),
            required_field: true,
            provisioning_table_id: table.to_string(),
        }
    }

    #[tokio::test]
    async fn vendors_read_but_cannot_write() {
        let state = build_state().await;
        let (_, vendor_headers) = vendor(&state, "acme").await;

        let response = create_provisioning_field(
            State(state.clone()),
            vendor_headers.clone(),
            Json(field(1, "appEUI", "applications")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = create_provisioning_field(
            State(state.clone()),
            system_admin(),
            Json(field(1, "appEUI", "applications")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let id = body["data"]["id"].as_str().expect("id").to_string();

        let response = get_provisioning_field(State(state), Path(id), vendor_headers)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["fieldName"], "appEUI");
        assert_eq!(body["data"]["requiredField"], true);
    }

    #[tokio::test]
    async fn list_filters_by_table_in_field_order() {
        let state = build_state().await;
        for (order, name, table) in [
            (2, "appKey", "devices"),
            (1, "devEUI", "devices"),
            (1, "appEUI", "applications"),
        ] {
            create_provisioning_field(State(state.clone()), system_admin(), Json(field(order, name, table)))
                .await
                .into_response();
        }

        let query = ListQuery {
            network_protocol_id: Some("dddddddddddddddddddddddd".to_string()),
            provisioning_table_id: Some("devices".to_string()),
            ..ListQuery::default()
        };
        let response = list_provisioning_fields(State(state), system_admin(), Query(query))
            .await
            .into_response();
        let body = body_json(response).await;
        assert_eq!(body["data"]["totalCount"], 2);
        assert_eq!(body["data"]["records"][0]["fieldName"], "devEUI");
        assert_eq!(body["data"]["records"][1]["fieldName"], "appKey");
    }

    #[tokio::test]
    async fn blank_field_name_is_rejected() {
        let state = build_state().await;
        let response = create_provisioning_field(
            State(state),
            system_admin(),
            Json(field(1, "  ", "devices")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
