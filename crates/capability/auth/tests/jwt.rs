use domain::{CallerContext, CompanyType, UserRole};
use lpwan_auth::{AuthError, JwtManager};

#[test]
fn token_carries_company_and_role() {
    let jwt = JwtManager::new("secret".to_string(), 3600);
    let ctx = CallerContext::new("user-1", "company-1", CompanyType::Vendor, UserRole::Admin);

    let token = jwt.issue_token(&ctx).expect("token");
    let decoded = jwt.decode(&token.token).expect("decode");

    assert_eq!(decoded.user_id, "user-1");
    assert_eq!(decoded.company_id, "company-1");
    assert_eq!(decoded.company_type, CompanyType::Vendor);
    assert_eq!(decoded.role, UserRole::Admin);
    assert!(!decoded.is_system_admin());
}

#[test]
fn token_signed_with_other_secret_is_invalid() {
    let issuer = JwtManager::new("secret-a".to_string(), 3600);
    let verifier = JwtManager::new("secret-b".to_string(), 3600);
    let ctx = CallerContext::new("user-1", "company-1", CompanyType::Admin, UserRole::User);

    let token = issuer.issue_token(&ctx).expect("token");
    let result = verifier.decode(&token.token);
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
}

#[test]
fn garbage_token_is_invalid() {
    let jwt = JwtManager::new("secret".to_string(), 3600);
    assert!(matches!(jwt.decode("not-a-jwt"), Err(AuthError::TokenInvalid)));
}
