//! 设备档案 handlers
//!
//! 档案归属公司，networkSettings 为不透明 JSON。

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
use lpwan_storage::{DeviceProfileUpdate, NewDeviceProfile};

pub async fn list_device_profiles(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let company = ctx.scoped_company().or(query.company_id.as_deref());
    let options = with_filter(list_options(&query), "companyId", company);
    let options = with_filter(options, "networkTypeId", query.network_type_id.as_deref());
    let list = state
        .models
        .device_profiles
        .retrieve_device_profiles(&options)
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

pub async fn create_device_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut req): Json<NewDeviceProfile>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    require_company_access(&ctx, &req.company_id)?;
    req.name = normalize_required(&req.name, "name")?;
    let profile = state
        .models
        .device_profiles
        .create_device_profile(&req)
        .await
        .map_err(model_error)?;
    Ok(ok(profile))
}

pub async fn get_device_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let profiles = &state.models.device_profiles;
    profiles
        .validate_company_for_device_profile(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let profile = profiles
        .retrieve_device_profile(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(profile))
}

pub async fn update_device_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut req): Json<DeviceProfileUpdate>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    if let Some(company_id) = req.company_id.as_deref() {
        require_company_access(&ctx, company_id)?;
    }
    req.name = normalize_optional(req.name.as_deref(), "name")?;
    let profiles = &state.models.device_profiles;
    profiles
        .validate_company_for_device_profile(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let profile = profiles
        .update_device_profile(&id, &req)
        .await
        .map_err(model_error)?;
    Ok(ok(profile))
}

pub async fn delete_device_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let profiles = &state.models.device_profiles;
    profiles
        .validate_company_for_device_profile(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    profiles
        .delete_device_profile(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(()))
}
