//! 协议数据 handlers（仅系统管理员）

use crate::AppState;
use crate::middleware::{require_caller, require_system_admin};
use crate::utils::{
    ApiResult, list_options, list_response, model_error, normalize_required, ok, with_filter,
};
use api_contract::{ListQuery, UpdateProtocolDataRequest};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use lpwan_storage::NewProtocolData;

pub async fn list_protocol_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let options = with_filter(list_options(&query), "networkId", query.network_id.as_deref());
    let options = with_filter(
        options,
        "networkProtocolId",
        query.network_protocol_id.as_deref(),
    );
    let list = state
        .models
        .protocol_data
        .retrieve_protocol_data_list(&options)
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

pub async fn create_protocol_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut req): Json<NewProtocolData>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    req.network_id = normalize_required(&req.network_id, "networkId")?;
    req.network_protocol_id = normalize_required(&req.network_protocol_id, "networkProtocolId")?;
    req.data_identifier = normalize_required(&req.data_identifier, "dataIdentifier")?;
    let record = state
        .models
        .protocol_data
        .create_protocol_data(&req)
        .await
        .map_err(model_error)?;
    Ok(ok(record))
}

pub async fn get_protocol_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let record = state
        .models
        .protocol_data
        .retrieve_protocol_data(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(record))
}

pub async fn update_protocol_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateProtocolDataRequest>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let record = state
        .models
        .protocol_data
        .update_protocol_data(
            &id,
            req.network_protocol_id.as_deref(),
            req.data_value.as_deref(),
        )
        .await
        .map_err(model_error)?;
    Ok(ok(record))
}

pub async fn delete_protocol_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    state
        .models
        .protocol_data
        .delete_protocol_data(&id)
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

    fn entry(identifier: &str) -> NewProtocolData {
        NewProtocolData {
            network_id: "net-1".to_string(),
            network_protocol_id: "proto-1".to_string(),
            data_identifier: identifier.to_string(),
            data_value: "remote-7".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_key_is_rejected() {
        let state = build_state().await;
        let response = create_protocol_data(State(state.clone()), system_admin(), Json(entry("co:acme")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = create_protocol_data(State(state.clone()), system_admin(), Json(entry("co:acme")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let query = ListQuery {
            network_id: Some("net-1".to_string()),
            ..ListQuery::default()
        };
        let response = list_protocol_data(State(state), system_admin(), Query(query))
            .await
            .into_response();
        let body = body_json(response).await;
        assert_eq!(body["data"]["totalCount"], 1);
    }

    #[tokio::test]
    async fn company_admins_cannot_read_protocol_data() {
        let state = build_state().await;
        let (_, vendor_headers) = vendor(&state, "acme").await;
        let response = list_protocol_data(State(state), vendor_headers, Query(ListQuery::default()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
