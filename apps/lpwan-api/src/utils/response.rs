//! HTTP 响应辅助函数
//!
//! 所有响应使用 ApiResponse 封装；模型层错误统一在 model_error 映射为状态码：
//! NotFound→404，Unauthorized→403，Validation→400，Store/Security→500，Protocol→502。

use api_contract::{ApiResponse, ListResponse};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lpwan_auth::AuthError;
use lpwan_model::ModelError;
use lpwan_storage::RecordList;
use serde::Serialize;

/// 处理器返回类型，错误分支已是完整响应
pub type ApiResult = Result<Response, Response>;

/// 200 + 数据
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 200 + {totalCount, records}
pub fn list_response<T: Serialize>(list: RecordList<T>) -> Response {
    ok(ListResponse {
        total_count: list.total_count,
        records: list.records,
    })
}

/// 认证错误响应
pub fn auth_error(status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "unauthorized",
        )),
    )
        .into_response()
}

/// 禁止访问错误响应
pub fn forbidden_error() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::error("AUTH.FORBIDDEN", "forbidden")),
    )
        .into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 认证内部错误响应
pub fn internal_auth_error(err: AuthError) -> Response {
    tracing::error!(target: "lpwan.api", error = %err, "auth failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", err.to_string())),
    )
        .into_response()
}

/// 模型层错误响应
pub fn model_error(err: ModelError) -> Response {
    let (status, code) = match &err {
        ModelError::NotFound(_) => (StatusCode::NOT_FOUND, "RESOURCE.NOT_FOUND"),
        ModelError::Unauthorized(_) => (StatusCode::FORBIDDEN, "AUTH.FORBIDDEN"),
        ModelError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID.REQUEST"),
        ModelError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL.ERROR"),
        ModelError::Security(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SECURITY.ERROR"),
        ModelError::Protocol(_) => (StatusCode::BAD_GATEWAY, "REMOTE.ERROR"),
    };
    if status.is_server_error() {
        tracing::error!(target: "lpwan.api", error = %err, "request failed");
    } else {
        tracing::info!(target: "lpwan.api", error = %err, status = status.as_u16(), "request rejected");
    }
    (status, Json(ApiResponse::<()>::error(code, err.to_string()))).into_response()
}
