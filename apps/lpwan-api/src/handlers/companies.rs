//! 公司 handlers
//!
//! - GET /api/companies：系统管理员看全部，其他调用方只看到本公司
//! - POST /api/companies：系统管理员
//! - GET/PUT /api/companies/{id}：本公司或系统管理员；修改需公司管理员，改类型需系统管理员
//! - DELETE /api/companies/{id}：系统管理员，返回级联结果
//! - GET /api/company-types：公司类型名称到编码的映射

use crate::AppState;
use crate::middleware::{
    require_caller, require_company_access, require_company_admin, require_system_admin,
};
use crate::utils::{
    ApiResult, forbidden_error, list_options, list_response, model_error, normalize_optional,
    normalize_required, ok,
};
use api_contract::{CreateCompanyRequest, ListQuery, ListResponse};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use lpwan_storage::CompanyUpdate;

/// 列出公司
pub async fn list_companies(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    if let Some(own) = ctx.scoped_company() {
        let company = state
            .models
            .companies
            .retrieve_company(own)
            .await
            .map_err(model_error)?;
        return Ok(ok(ListResponse {
            total_count: 1,
            records: vec![company],
        }));
    }
    let list = state
        .models
        .companies
        .retrieve_companies(&list_options(&query))
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

/// 创建公司
pub async fn create_company(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateCompanyRequest>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let name = normalize_required(&req.name, "name")?;
    let company = state
        .models
        .companies
        .create_company(&name, req.company_type)
        .await
        .map_err(model_error)?;
    Ok(ok(company))
}

/// 获取公司详情（含已关联的网络类型）
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_access(&ctx, &id)?;
    let company = state
        .models
        .companies
        .retrieve_company(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(company))
}

/// 更新公司
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<CompanyUpdate>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    require_company_access(&ctx, &id)?;
    if req.company_type.is_some() && !ctx.is_system_admin() {
        return Err(forbidden_error());
    }
    let update = CompanyUpdate {
        name: normalize_optional(req.name.as_deref(), "name")?,
        company_type: req.company_type,
    };
    let company = state
        .models
        .companies
        .update_company(&id, &update)
        .await
        .map_err(model_error)?;
    Ok(ok(company))
}

/// 删除公司及其下属数据
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let report = state
        .models
        .companies
        .delete_company(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(report))
}

/// 公司类型
pub async fn list_company_types(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    require_caller(&state, &headers)?;
    let types = state
        .models
        .companies
        .company_types()
        .map_err(model_error)?;
    Ok(ok(types))
}
