use crate::{AuthError, AuthToken};
use domain::{CallerContext, CompanyType, UserRole};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const ACCESS_TOKEN_TYPE: &str = "access";

#[derive(Debug, Serialize, Deserialize)]
/// JWT 内部 claims。
struct Claims {
    sub: String,
    company_id: String,
    company_type: CompanyType,
    role: UserRole,
    exp: usize,
    token_type: String,
    jti: String,
}

/// 会话 token 的签发与校验。
pub struct JwtManager {
    secret: Vec<u8>,
    ttl_seconds: u64,
}

impl JwtManager {
    pub fn new(secret: String, ttl_seconds: u64) -> Self {
        Self {
            secret: secret.into_bytes(),
            ttl_seconds,
        }
    }

    /// 基于 CallerContext 签发会话 token。
    pub fn issue_token(&self, ctx: &CallerContext) -> Result<AuthToken, AuthError> {
        let expires_at = now_epoch_seconds() + self.ttl_seconds;
        let claims = Claims {
            sub: ctx.user_id.clone(),
            company_id: ctx.company_id.clone(),
            company_type: ctx.company_type,
            role: ctx.role,
            exp: expires_at as usize,
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|err| AuthError::Internal(err.to_string()))?;
        Ok(AuthToken { token, expires_at })
    }

    /// 解析 token 并还原调用方上下文。
    pub fn decode(&self, token: &str) -> Result<CallerContext, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let claims = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(map_jwt_error)?
        .claims;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(AuthError::TokenInvalid);
        }
        Ok(CallerContext::new(
            claims.sub,
            claims.company_id,
            claims.company_type,
            claims.role,
        ))
    }
}

fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    }
}
