//! 认证和授权辅助
//!
//! - request_context：请求上下文中间件，注入 request_id/trace_id
//! - bearer_token：从 Authorization 头提取 Bearer token
//! - require_caller：校验 JWT，得到调用方上下文（CallerContext）
//! - require_system_admin / require_company_admin / require_company_access：角色与公司归属检查
//!
//! 归属链校验（设备 → 应用 → 公司）由模型层的 validate_company_for_* 完成，
//! 这里只处理不依赖存储的判断。

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::Response,
};
use domain::CallerContext;
use lpwan_auth::AuthError;
use lpwan_telemetry::new_request_ids;
use tracing::{Instrument, info_span};

use crate::AppState;
use crate::utils::response::{auth_error, forbidden_error, internal_auth_error};

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 从请求头中提取 Bearer token
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header_value = headers.get(header::AUTHORIZATION)?;
    let auth_str = header_value.to_str().ok()?;
    auth_str.strip_prefix("Bearer ")
}

/// 校验 token 并提取调用方上下文
pub fn require_caller(state: &AppState, headers: &HeaderMap) -> Result<CallerContext, Response> {
    let Some(token) = bearer_token(headers) else {
        return Err(auth_error(StatusCode::UNAUTHORIZED));
    };
    match state.auth.verify_token(token) {
        Ok(ctx) => Ok(ctx),
        Err(AuthError::TokenInvalid | AuthError::TokenExpired) => {
            Err(auth_error(StatusCode::UNAUTHORIZED))
        }
        Err(err) => Err(internal_auth_error(err)),
    }
}

/// 仅系统管理公司的成员可通过
pub fn require_system_admin(ctx: &CallerContext) -> Result<(), Response> {
    if ctx.is_system_admin() {
        Ok(())
    } else {
        tracing::warn!(target: "lpwan.api", user_id = %ctx.user_id, "system admin required");
        Err(forbidden_error())
    }
}

/// 公司管理员（含系统管理员）可通过
pub fn require_company_admin(ctx: &CallerContext) -> Result<(), Response> {
    if ctx.is_company_admin() {
        Ok(())
    } else {
        tracing::warn!(target: "lpwan.api", user_id = %ctx.user_id, "company admin required");
        Err(forbidden_error())
    }
}

/// 目标公司须为调用方所属公司（系统管理员不受限）
pub fn require_company_access(ctx: &CallerContext, company_id: &str) -> Result<(), Response> {
    if ctx.can_access_company(company_id) {
        Ok(())
    } else {
        tracing::warn!(
            target: "lpwan.api",
            user_id = %ctx.user_id,
            company_id,
            "company access denied"
        );
        Err(forbidden_error())
    }
}
