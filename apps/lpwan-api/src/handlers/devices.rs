//! 设备 handlers
//!
//! 设备的公司归属经由应用传递：非系统管理员的每次读写都校验 设备 → 应用 → 公司。
//! 删除会级联清理设备网络关联。

use crate::AppState;
use crate::middleware::{require_caller, require_company_admin};
use crate::utils::{
    ApiResult, list_options, list_response, model_error, normalize_optional, normalize_required,
    ok, with_filter, with_members,
};
use api_contract::ListQuery;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use domain::CallerContext;
use lpwan_storage::{DeviceUpdate, ListOptions, NewDevice};

/// 列出设备
pub async fn list_devices(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let options = scoped_device_options(&state, &ctx, &query).await?;
    let list = state
        .models
        .devices
        .retrieve_devices(&options)
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

/// 创建设备
pub async fn create_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut req): Json<NewDevice>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    state
        .models
        .applications
        .validate_company_for_application(ctx.scoped_company(), &req.application_id)
        .await
        .map_err(model_error)?;
    req.name = normalize_required(&req.name, "name")?;
    let device = state
        .models
        .devices
        .create_device(&req)
        .await
        .map_err(model_error)?;
    Ok(ok(device))
}

/// 获取设备详情（含已关联的网络类型）
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let devices = &state.models.devices;
    devices
        .validate_company_for_device(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let device = devices.retrieve_device(&id).await.map_err(model_error)?;
    Ok(ok(device))
}

/// 更新设备
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut req): Json<DeviceUpdate>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let devices = &state.models.devices;
    devices
        .validate_company_for_device(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    if let Some(application_id) = req.application_id.as_deref() {
        state
            .models
            .applications
            .validate_company_for_application(ctx.scoped_company(), application_id)
            .await
            .map_err(model_error)?;
    }
    req.name = normalize_optional(req.name.as_deref(), "name")?;
    let device = devices.update_device(&id, &req).await.map_err(model_error)?;
    Ok(ok(device))
}

/// 删除设备
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let devices = &state.models.devices;
    devices
        .validate_company_for_device(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let report = devices.delete_device(&id).await.map_err(model_error)?;
    Ok(ok(report))
}

/// 设备查询条件：指定 applicationId 时先校验归属，否则限定在本公司全部应用内
pub(crate) async fn scoped_device_options(
    state: &AppState,
    ctx: &CallerContext,
    query: &ListQuery,
) -> Result<ListOptions, axum::response::Response> {
    let options = list_options(query);
    let applications = &state.models.applications;
    match (query.application_id.as_deref(), ctx.scoped_company()) {
        (Some(application_id), scope) => {
            applications
                .validate_company_for_application(scope, application_id)
                .await
                .map_err(model_error)?;
            Ok(with_filter(options, "applicationId", Some(application_id)))
        }
        (None, Some(own)) => {
            let ids = applications
                .application_ids_for_company(own)
                .await
                .map_err(model_error)?;
            Ok(with_members(options, "applicationId", ids))
        }
        (None, None) => Ok(options),
    }
}
