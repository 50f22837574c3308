//! 验证辅助函数
//!
//! - ensure_company：记录所属公司与调用方公司一致
//!
//! 各 DAO 的 validate_company_for_* 先沿归属链读出所属公司，再调用这里比对。

use crate::error::StorageError;

/// 验证公司归属
///
/// `kind` 仅用于错误信息。
pub fn ensure_company(
    expected_company_id: &str,
    owner_company_id: &str,
    kind: &str,
) -> Result<(), StorageError> {
    if expected_company_id.eq_ignore_ascii_case(owner_company_id) {
        return Ok(());
    }
    tracing::warn!(
        target: "lpwan.storage",
        kind,
        expected_company_id,
        owner_company_id,
        "company ownership mismatch"
    );
    Err(StorageError::unauthorized(format!(
        "{kind} does not belong to company {expected_company_id}"
    )))
}
