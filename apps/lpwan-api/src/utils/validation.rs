//! 输入校验辅助函数
//!
//! 名称类字段去除首尾空格后必须非空，失败返回 400。

use crate::utils::response::bad_request_error;
use axum::response::Response;

/// 验证必填字段，去除空格并检查非空
pub fn normalize_required(value: &str, field: &str) -> Result<String, Response> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(bad_request_error(format!("{field} required")));
    }
    Ok(trimmed.to_string())
}

/// 验证可选字段，如果提供则去除空格并检查非空
pub fn normalize_optional(value: Option<&str>, field: &str) -> Result<Option<String>, Response> {
    value.map(|value| normalize_required(value, field)).transpose()
}
