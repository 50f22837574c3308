//! 口令策略 handlers
//!
//! 公司管理员维护本公司规则；全局规则（无 companyId）只允许系统管理员增改删。
//! 非系统管理员列表返回全局规则 + 本公司规则。

use crate::AppState;
use crate::middleware::{require_caller, require_company_admin};
use crate::utils::{
    ApiResult, forbidden_error, list_options, list_response, model_error, ok, with_filter,
};
use api_contract::{ListQuery, ListResponse};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use lpwan_storage::{NewPasswordPolicy, PasswordPolicyUpdate};

/// 列出口令策略
pub async fn list_password_policies(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let policies = &state.models.password_policies;
    match ctx.scoped_company() {
        Some(own) => {
            let records = policies
                .retrieve_for_company(Some(own))
                .await
                .map_err(model_error)?;
            Ok(ok(ListResponse {
                total_count: records.len(),
                records,
            }))
        }
        None => {
            let options =
                with_filter(list_options(&query), "companyId", query.company_id.as_deref());
            let list = policies
                .retrieve_password_policies(&options)
                .await
                .map_err(model_error)?;
            Ok(list_response(list))
        }
    }
}

/// 创建口令策略
pub async fn create_password_policy(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewPasswordPolicy>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    if let Some(own) = ctx.scoped_company()
        && req.company_id.as_deref() != Some(own)
    {
        return Err(forbidden_error());
    }
    let policy = state
        .models
        .password_policies
        .create_password_policy(&req)
        .await
        .map_err(model_error)?;
    Ok(ok(policy))
}

/// 获取口令策略详情
pub async fn get_password_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let policy = state
        .models
        .password_policies
        .retrieve_password_policy(&id)
        .await
        .map_err(model_error)?;
    let visible = policy
        .company_id
        .as_deref()
        .is_none_or(|owner| ctx.can_access_company(owner));
    if !visible {
        return Err(forbidden_error());
    }
    Ok(ok(policy))
}

/// 更新口令策略
pub async fn update_password_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<PasswordPolicyUpdate>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let policies = &state.models.password_policies;
    policies
        .validate_company_for_password_policy(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let policy = policies
        .update_password_policy(&id, &req)
        .await
        .map_err(model_error)?;
    Ok(ok(policy))
}

/// 删除口令策略
pub async fn delete_password_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let policies = &state.models.password_policies;
    policies
        .validate_company_for_password_policy(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    policies
        .delete_password_policy(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(()))
}
