//! 探针与会话 handlers
//!
//! - `GET /health`：存活探针
//! - `GET /readyz`：就绪探针（Postgres 后端时检查连接）
//! - `POST /api/sessions`：用户名口令登录，返回 JWT
//! - `GET /api/sessions`：当前 token 对应的调用方上下文

use crate::AppState;
use crate::middleware::require_caller;
use crate::utils::response::{ApiResult, auth_error, internal_auth_error, ok};
use api_contract::{LoginRequest, SessionResponse};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use lpwan_auth::AuthError;

/// Liveness 探针：只反映进程存活
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// Readiness 探针
pub async fn readyz(State(state): State<AppState>) -> Response {
    let Some(pool) = state.db_pool.as_ref() else {
        return (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response();
    };

    match sqlx::query_scalar::<_, i32>("select 1").fetch_one(pool).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Err(err) => {
            tracing::warn!(target: "lpwan.api", error = %err, "readyz check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "ok": false })),
            )
                .into_response()
        }
    }
}

/// 登录
///
/// 用户名不存在与口令错误同样返回 401。
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> ApiResult {
    match state.auth.login(&req.username, &req.password).await {
        Ok((user, token)) => Ok(ok(SessionResponse {
            jwt: token.token,
            expires_at: token.expires_at,
            user_id: user.id,
            company_id: user.company_id,
        })),
        Err(AuthError::InvalidCredentials) => Err(auth_error(StatusCode::UNAUTHORIZED)),
        Err(err) => Err(internal_auth_error(err)),
    }
}

/// 当前会话
pub async fn current_session(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    Ok(ok(serde_json::json!({
        "userId": ctx.user_id,
        "companyId": ctx.company_id,
        "companyType": ctx.company_type,
        "role": ctx.role,
    })))
}
