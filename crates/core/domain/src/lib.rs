pub mod roles;

pub use roles::{CompanyType, UserRole};

/// 调用方上下文：由认证中间件构造，传入模型层做归属校验。
#[derive(Debug, Clone)]
pub struct CallerContext {
    pub user_id: String,
    pub company_id: String,
    pub company_type: CompanyType,
    pub role: UserRole,
}

impl CallerContext {
    /// 构造显式身份的调用方上下文。
    pub fn new(
        user_id: impl Into<String>,
        company_id: impl Into<String>,
        company_type: CompanyType,
        role: UserRole,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            company_id: company_id.into(),
            company_type,
            role,
        }
    }

    /// 是否属于系统管理公司。
    pub fn is_system_admin(&self) -> bool {
        self.company_type == CompanyType::Admin
    }

    /// 是否为公司管理员（系统管理公司的成员也视为管理员）。
    pub fn is_company_admin(&self) -> bool {
        self.role == UserRole::Admin || self.is_system_admin()
    }

    /// 归属校验使用的公司 ID。
    ///
    /// 系统管理公司返回 None，表示跳过归属校验。
    pub fn scoped_company(&self) -> Option<&str> {
        if self.is_system_admin() {
            None
        } else {
            Some(self.company_id.as_str())
        }
    }

    /// 判断调用方能否访问指定公司的数据。
    pub fn can_access_company(&self, company_id: &str) -> bool {
        self.is_system_admin() || self.company_id == company_id
    }
}
