//! 公司类型与用户角色。
//!
//! 两者都以整数落库（与历史数据保持一致）：
//! - CompanyType：1 = admin，2 = vendor
//! - UserRole：1 = user，2 = admin

use serde::{Deserialize, Serialize};

/// 公司类型。
///
/// Admin 公司的成员可以管理所有公司；Vendor 只能管理自己的应用与设备。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CompanyType {
    Admin,
    Vendor,
}

impl CompanyType {
    /// 落库使用的数值。
    pub fn code(self) -> u8 {
        match self {
            CompanyType::Admin => 1,
            CompanyType::Vendor => 2,
        }
    }

    /// companyTypes 表中的名称。
    pub fn name(self) -> &'static str {
        match self {
            CompanyType::Admin => "admin",
            CompanyType::Vendor => "vendor",
        }
    }
}

impl From<CompanyType> for u8 {
    fn from(value: CompanyType) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for CompanyType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CompanyType::Admin),
            2 => Ok(CompanyType::Vendor),
            other => Err(format!("unknown company type: {other}")),
        }
    }
}

/// 用户在所属公司内的角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum UserRole {
    User,
    Admin,
}

impl From<UserRole> for u8 {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::User => 1,
            UserRole::Admin => 2,
        }
    }
}

impl TryFrom<u8> for UserRole {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(UserRole::User),
            2 => Ok(UserRole::Admin),
            other => Err(format!("unknown user role: {other}")),
        }
    }
}
