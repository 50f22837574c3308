//! 用户 handlers
//!
//! 公司管理员管理本公司用户；普通用户只能读取和修改自己（不能改角色）。
//! 创建与改口令时由模型层执行口令策略校验。

use crate::AppState;
use crate::middleware::{require_caller, require_company_access, require_company_admin};
use crate::utils::{
    ApiResult, forbidden_error, list_options, list_response, model_error, normalize_required, ok,
    with_filter,
};
use api_contract::ListQuery;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
};
use domain::CallerContext;
use lpwan_model::{UserChanges, UserInput};

/// 列出用户
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let company = ctx.scoped_company().or(query.company_id.as_deref());
    let options = with_filter(list_options(&query), "companyId", company);
    let list = state
        .models
        .users
        .retrieve_users(&options)
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

/// 创建用户
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut req): Json<UserInput>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    require_company_access(&ctx, &req.company_id)?;
    req.username = normalize_required(&req.username, "username")?;
    let user = state
        .models
        .users
        .create_user(&req)
        .await
        .map_err(model_error)?;
    Ok(ok(user))
}

/// 获取用户详情
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    ensure_user_access(&state, &ctx, &id).await?;
    let user = state
        .models
        .users
        .retrieve_user(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(user))
}

/// 更新用户
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UserChanges>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    ensure_user_access(&state, &ctx, &id).await?;
    if req.role.is_some() && !ctx.is_company_admin() {
        return Err(forbidden_error());
    }
    let user = state
        .models
        .users
        .update_user(&id, &req)
        .await
        .map_err(model_error)?;
    Ok(ok(user))
}

/// 删除用户
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    state
        .models
        .users
        .validate_company_for_user(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    state
        .models
        .users
        .delete_user(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(()))
}

/// 本人，或同公司的管理员
async fn ensure_user_access(
    state: &AppState,
    ctx: &CallerContext,
    id: &str,
) -> Result<(), Response> {
    if ctx.user_id == id {
        return Ok(());
    }
    require_company_admin(ctx)?;
    state
        .models
        .users
        .validate_company_for_user(ctx.scoped_company(), id)
        .await
        .map_err(model_error)
}
