mod common;

use common::{FAKE_HANDLER, model_api};
use domain::{CompanyType, UserRole};
use lpwan_model::{ModelError, UserChanges, UserInput};
use lpwan_storage::{ListOptions, NewNetworkProtocol, NewPasswordPolicy};
use serde_json::json;

#[tokio::test]
async fn initialize_seeds_types_and_protocols() {
    let (_store, api) = model_api().await;
    let types = api.companies.company_types().expect("types");
    assert_eq!(types.get("admin"), Some(&1));
    assert_eq!(types.get("vendor"), Some(&2));

    let protocols = api
        .network_protocols
        .retrieve_network_protocols(&ListOptions::new())
        .await
        .expect("protocols");
    assert_eq!(protocols.total_count, 1);
    let protocol = &protocols.records[0];
    assert_eq!(protocol.protocol_handler, FAKE_HANDLER);
    assert_eq!(protocol.name, "Fake Server");
    assert_eq!(
        protocol.meta_data,
        Some(json!({
            "protocolHandlerName": "Fake Server",
            "networkType": "LoRa",
            "version": "1.0"
        }))
    );

    // 再次初始化不产生重复记录
    api.initialize().await;
    let again = api
        .network_protocols
        .retrieve_network_protocols(&ListOptions::new())
        .await
        .expect("protocols");
    assert_eq!(again.total_count, 1);
    let lora_types = api
        .network_types
        .retrieve_network_types(&ListOptions::new().search("LoRa"))
        .await
        .expect("types");
    assert_eq!(lora_types.total_count, 1);
}

#[tokio::test]
async fn unknown_handler_has_no_meta_data() {
    let (_store, api) = model_api().await;
    let network_type = api
        .network_types
        .ensure_network_type("LoRa")
        .await
        .expect("type");
    let protocol = api
        .network_protocols
        .create_network_protocol(&NewNetworkProtocol {
            name: "Legacy".to_string(),
            network_type_id: network_type.id,
            protocol_handler: "Legacy_0".to_string(),
            ..NewNetworkProtocol::default()
        })
        .await
        .expect("protocol");
    assert_eq!(protocol.meta_data, None);
    let fetched = api
        .network_protocols
        .retrieve_network_protocol(&protocol.id)
        .await
        .expect("retrieve");
    assert_eq!(fetched.meta_data, None);
}

#[tokio::test]
async fn password_policies_apply_global_and_company_rules() {
    let (_store, api) = model_api().await;
    let acme = api
        .companies
        .create_company("acme", CompanyType::Vendor)
        .await
        .expect("acme");
    let other = api
        .companies
        .create_company("other", CompanyType::Vendor)
        .await
        .expect("other");
    for (text, regex, company_id) in [
        ("at least 8 characters", ".{8,}", None),
        ("at least one digit", "[0-9]", Some(acme.id.clone())),
        ("broken rule", "([", Some(acme.id.clone())),
    ] {
        api.password_policies
            .create_password_policy(&NewPasswordPolicy {
                rule_text: text.to_string(),
                rule_reg_exp: regex.to_string(),
                company_id,
            })
            .await
            .expect("policy");
    }

    let short = api
        .password_policies
        .validate_password(Some(acme.id.as_str()), "abc1")
        .await;
    assert!(matches!(short, Err(ModelError::Validation(ref text)) if text == "at least 8 characters"));

    let no_digit = api
        .password_policies
        .validate_password(Some(acme.id.as_str()), "abcdefgh")
        .await;
    assert!(matches!(no_digit, Err(ModelError::Validation(ref text)) if text == "at least one digit"));

    api.password_policies
        .validate_password(Some(acme.id.as_str()), "abcdefg1")
        .await
        .expect("valid for acme");
    api.password_policies
        .validate_password(Some(other.id.as_str()), "abcdefgh")
        .await
        .expect("company rule does not leak");
}

#[tokio::test]
async fn user_creation_enforces_policy_and_hides_hash() {
    let (_store, api) = model_api().await;
    let acme = api
        .companies
        .create_company("acme", CompanyType::Vendor)
        .await
        .expect("acme");
    api.password_policies
        .create_password_policy(&NewPasswordPolicy {
            rule_text: "at least 8 characters".to_string(),
            rule_reg_exp: ".{8,}".to_string(),
            company_id: None,
        })
        .await
        .expect("policy");

    let rejected = api
        .users
        .create_user(&UserInput {
            username: "bob".to_string(),
            email: None,
            password: "short".to_string(),
            company_id: acme.id.clone(),
            role: UserRole::User,
        })
        .await;
    assert!(matches!(rejected, Err(ModelError::Validation(_))));

    let user = api
        .users
        .create_user(&UserInput {
            username: "bob".to_string(),
            email: Some("bob@acme.test".to_string()),
            password: "longenough".to_string(),
            company_id: acme.id.clone(),
            role: UserRole::User,
        })
        .await
        .expect("user");
    assert!(user.password_hash.starts_with("$argon2"));
    let rendered = serde_json::to_value(&user).expect("json");
    assert!(rendered.get("passwordHash").is_none());

    let changed = api
        .users
        .update_user(
            &user.id,
            &UserChanges {
                password: Some("another-long-one".to_string()),
                role: Some(UserRole::Admin),
                ..UserChanges::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(changed.role, UserRole::Admin);
    assert_ne!(changed.password_hash, user.password_hash);
}

#[tokio::test]
async fn seed_admin_is_idempotent() {
    let (_store, api) = model_api().await;
    let first = api
        .seed_admin("SysAdmins", "admin", "password1")
        .await
        .expect("seed");
    let second = api
        .seed_admin("SysAdmins", "admin", "password1")
        .await
        .expect("seed again");
    assert_eq!(first.id, second.id);
    let company = api
        .companies
        .retrieve_company(&first.company_id)
        .await
        .expect("company");
    assert_eq!(company.company_type, CompanyType::Admin);
}

#[tokio::test]
async fn duplicate_links_are_rejected() {
    let (_store, api) = model_api().await;
    let company = api
        .companies
        .create_company("acme", CompanyType::Vendor)
        .await
        .expect("company");
    let network_type = api
        .network_types
        .ensure_network_type("LoRa")
        .await
        .expect("type");
    api.company_links
        .create_company_network_type_link(&company.id, &network_type.id, json!({}))
        .await
        .expect("first link");
    let duplicate = api
        .company_links
        .create_company_network_type_link(&company.id, &network_type.id, json!({}))
        .await;
    assert!(matches!(duplicate, Err(ModelError::Validation(_))));
}
