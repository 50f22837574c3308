//! 认证能力：口令哈希、会话 JWT 签发与校验、登录。

mod jwt;
mod password;

use async_trait::async_trait;
use domain::CallerContext;
use lpwan_storage::{CompanyDao, UserDao, UserRecord};

pub use jwt::JwtManager;
pub use password::{hash_password, verify_password};

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("internal error: {0}")]
    Internal(String),
}

/// 登录返回的会话 token。
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
    /// 过期时间（Unix 秒）
    pub expires_at: u64,
}

/// 认证服务（用户 DAO + 公司 DAO + JWT）。
pub struct AuthService {
    users: UserDao,
    companies: CompanyDao,
    jwt: JwtManager,
}

impl AuthService {
    pub fn new(users: UserDao, companies: CompanyDao, jwt: JwtManager) -> Self {
        Self {
            users,
            companies,
            jwt,
        }
    }

    /// 校验用户名口令并签发会话 token。
    ///
    /// token 中的公司类型取自用户所属公司的当前记录。
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthToken), AuthError> {
        let result = self.login_inner(username, password).await;
        lpwan_telemetry::record_login(result.is_ok());
        if let Err(err) = &result {
            tracing::warn!(target: "lpwan.api", username, error = %err, "login rejected");
        }
        result
    }

    async fn login_inner(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthToken), AuthError> {
        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(|err| AuthError::Internal(err.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(&user.password_hash, password)? {
            return Err(AuthError::InvalidCredentials);
        }
        let company = self
            .companies
            .retrieve(&user.company_id)
            .await
            .map_err(|err| AuthError::Internal(err.to_string()))?;
        let ctx = CallerContext::new(&user.id, &user.company_id, company.company_type, user.role);
        let token = self.jwt.issue_token(&ctx)?;
        Ok((user, token))
    }

    /// 校验会话 token 并提取调用方上下文。
    pub fn verify_token(&self, token: &str) -> Result<CallerContext, AuthError> {
        self.jwt.decode(token)
    }
}

/// 认证能力 trait，便于替换实现与测试。
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthToken), AuthError>;
    fn verify_token(&self, token: &str) -> Result<CallerContext, AuthError>;
}

#[async_trait]
impl Authenticator for AuthService {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthToken), AuthError> {
        self.login(username, password).await
    }

    fn verify_token(&self, token: &str) -> Result<CallerContext, AuthError> {
        self.verify_token(token)
    }
}
