//! 应用 handlers
//!
//! 读取对本公司所有成员开放，写操作需公司管理员；
//! 非系统管理员只能在本公司下创建应用，也不能把应用移到其他公司。
//! 删除会级联清理设备与应用网络关联，响应体为级联结果。
//! 启停与自测同样需要公司管理员，且应用须属于调用方公司（系统管理员不受限）。

use crate::AppState;
use crate::middleware::{require_caller, require_company_access, require_company_admin};
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
use lpwan_storage::{ApplicationUpdate, NewApplication};
use serde_json::Value;

/// 列出应用
pub async fn list_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let company = ctx.scoped_company().or(query.company_id.as_deref());
    let mut options = with_filter(list_options(&query), "companyId", company);
    options = with_filter(
        options,
        "reportingProtocolId",
        query.reporting_protocol_id.as_deref(),
    );
    let list = state
        .models
        .applications
        .retrieve_applications(&options)
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

/// 创建应用
pub async fn create_application(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut req): Json<NewApplication>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    require_company_access(&ctx, &req.company_id)?;
    req.name = normalize_required(&req.name, "name")?;
    let application = state
        .models
        .applications
        .create_application(&req)
        .await
        .map_err(model_error)?;
    Ok(ok(application))
}

/// 获取应用详情（含已关联的网络类型）
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let applications = &state.models.applications;
    applications
        .validate_company_for_application(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let application = applications
        .retrieve_application(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(application))
}

/// 更新应用
pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut req): Json<ApplicationUpdate>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    if let Some(company_id) = req.company_id.as_deref() {
        require_company_access(&ctx, company_id)?;
    }
    req.name = normalize_optional(req.name.as_deref(), "name")?;
    let applications = &state.models.applications;
    applications
        .validate_company_for_application(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let application = applications
        .update_application(&id, &req)
        .await
        .map_err(model_error)?;
    Ok(ok(application))
}

/// 删除应用及其设备
pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let applications = &state.models.applications;
    applications
        .validate_company_for_application(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let report = applications
        .delete_application(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(report))
}

/// 启动向 baseUrl 转发数据
pub async fn start_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    state
        .models
        .applications
        .validate_company_for_application(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let application = state
        .models
        .relay
        .start_application(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(application))
}

/// 停止转发
pub async fn stop_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    state
        .models
        .applications
        .validate_company_for_application(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let application = state
        .models
        .relay
        .stop_application(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(application))
}

/// 把请求体当作一条上行数据投递给应用
pub async fn test_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(data): Json<Value>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    state
        .models
        .applications
        .validate_company_for_application(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    state
        .models
        .relay
        .test_application(&id, &data)
        .await
        .map_err(model_error)?;
    Ok(ok(()))
}
