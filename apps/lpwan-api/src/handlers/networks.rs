//! 网络 handlers
//!
//! - 读取对所有已登录调用方开放；securityData 明文只返回给系统管理员
//! - 创建/更新/删除与远端拉取仅系统管理员
//! - `POST /api/networks/{id}/pull`：拉取组织、应用、设备档案、设备并对账
//! - `POST /api/networks/{id}/pull-companies`：只拉取组织

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
use domain::CallerContext;
use lpwan_storage::{NetworkRecord, NetworkUpdate, NewNetwork};

pub async fn list_networks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let options = with_filter(
        list_options(&query),
        "networkProviderId",
        query.network_provider_id.as_deref(),
    );
    let options = with_filter(options, "networkTypeId", query.network_type_id.as_deref());
    let options = with_filter(
        options,
        "networkProtocolId",
        query.network_protocol_id.as_deref(),
    );
    let list = state
        .models
        .networks
        .retrieve_networks(&options)
        .await
        .map_err(model_error)?;
    Ok(list_response(list.map(|network| redact(&ctx, network))))
}

pub async fn create_network(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut req): Json<NewNetwork>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    req.name = normalize_required(&req.name, "name")?;
    let network = state
        .models
        .networks
        .create_network(&req)
        .await
        .map_err(model_error)?;
    Ok(ok(network))
}

pub async fn get_network(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let network = state
        .models
        .networks
        .retrieve_network(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(redact(&ctx, network)))
}

pub async fn update_network(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut req): Json<NetworkUpdate>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    req.name = normalize_optional(req.name.as_deref(), "name")?;
    let network = state
        .models
        .networks
        .update_network(&id, &req)
        .await
        .map_err(model_error)?;
    Ok(ok(network))
}

pub async fn delete_network(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    state
        .models
        .networks
        .delete_network(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(()))
}

/// 全量拉取
pub async fn pull_network(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let report = state
        .models
        .sync
        .pull_network(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(report))
}

/// 只拉取组织
pub async fn pull_network_companies(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let report = state
        .models
        .sync
        .pull_companies(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(report))
}

fn redact(ctx: &CallerContext, mut network: NetworkRecord) -> NetworkRecord {
    if !ctx.is_system_admin() {
        network.security_data = None;
    }
    network
}
