use domain::{CallerContext, CompanyType, UserRole};

#[test]
fn vendor_context_is_scoped() {
    let ctx = CallerContext::new("user-1", "company-1", CompanyType::Vendor, UserRole::Admin);

    assert_eq!(ctx.user_id, "user-1");
    assert!(!ctx.is_system_admin());
    assert!(ctx.is_company_admin());
    assert_eq!(ctx.scoped_company(), Some("company-1"));
    assert!(ctx.can_access_company("company-1"));
    assert!(!ctx.can_access_company("company-2"));
}

#[test]
fn admin_context_bypasses_scope() {
    let ctx = CallerContext::new("user-1", "company-1", CompanyType::Admin, UserRole::User);

    assert!(ctx.is_system_admin());
    assert!(ctx.is_company_admin());
    assert!(ctx.scoped_company().is_none());
    assert!(ctx.can_access_company("company-2"));
}

#[test]
fn company_type_uses_numeric_codes() {
    let value = serde_json::to_value(CompanyType::Vendor).expect("serialize");
    assert_eq!(value, serde_json::json!(2));
    let parsed: CompanyType = serde_json::from_value(serde_json::json!(1)).expect("parse");
    assert_eq!(parsed, CompanyType::Admin);
    assert!(serde_json::from_value::<CompanyType>(serde_json::json!(7)).is_err());
}
