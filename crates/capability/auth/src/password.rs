use crate::AuthError;
use argon2::{
    Argon2,
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
    password_hash::SaltString,
};
use rand_core::OsRng;

/// 生成 Argon2id 口令哈希（PHC 字符串）。
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AuthError::Internal(err.to_string()))?;
    Ok(hash.to_string())
}

/// 校验口令。存储值不是合法的 PHC 哈希时返回 Internal。
pub fn verify_password(stored_password_hash: &str, password: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_password_hash)
        .map_err(|err| AuthError::Internal(err.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
