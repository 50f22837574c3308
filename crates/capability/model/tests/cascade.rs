mod common;

use common::{FailOn, FailingStore};
use domain::{CompanyType, UserRole};
use lpwan_model::{ModelApi, ModelError, UserInput};
use lpwan_protocol::ProtocolRegistry;
use lpwan_storage::{
    ListOptions, NewApplication, NewDevice, NewDeviceProfile, NewPasswordPolicy, tables,
};
use serde_json::json;
use std::sync::Arc;

struct Fixture {
    company_id: String,
    application_id: String,
    device_id: String,
    global_policy_id: String,
}

async fn populate(api: &ModelApi) -> Fixture {
    let company = api
        .companies
        .create_company("acme", CompanyType::Vendor)
        .await
        .expect("company");
    let network_type = api
        .network_types
        .create_network_type("LoRa")
        .await
        .expect("network type");
    let application = api
        .applications
        .create_application(&NewApplication {
            company_id: company.id.clone(),
            name: "tracker".to_string(),
            ..NewApplication::default()
        })
        .await
        .expect("application");
    let device = api
        .devices
        .create_device(&NewDevice {
            application_id: application.id.clone(),
            name: "dog1".to_string(),
            ..NewDevice::default()
        })
        .await
        .expect("device");
    let profile = api
        .device_profiles
        .create_device_profile(&NewDeviceProfile {
            network_type_id: network_type.id.clone(),
            company_id: company.id.clone(),
            name: "class-a".to_string(),
            description: None,
            network_settings: json!({ "class": "A" }),
        })
        .await
        .expect("profile");
    api.device_links
        .create_device_network_type_link(&device.id, &network_type.id, &profile.id, json!({}))
        .await
        .expect("device link");
    api.application_links
        .create_application_network_type_link(&application.id, &network_type.id, json!({}))
        .await
        .expect("application link");
    api.company_links
        .create_company_network_type_link(&company.id, &network_type.id, json!({ "region": "" }))
        .await
        .expect("company link");
    api.users
        .create_user(&UserInput {
            username: "alice".to_string(),
            email: None,
            password: "longenough".to_string(),
            company_id: company.id.clone(),
            role: UserRole::User,
        })
        .await
        .expect("user");
    api.password_policies
        .create_password_policy(&NewPasswordPolicy {
            rule_text: "company rule".to_string(),
            rule_reg_exp: ".{4,}".to_string(),
            company_id: Some(company.id.clone()),
        })
        .await
        .expect("company policy");
    let global = api
        .password_policies
        .create_password_policy(&NewPasswordPolicy {
            rule_text: "global rule".to_string(),
            rule_reg_exp: ".{2,}".to_string(),
            company_id: None,
        })
        .await
        .expect("global policy");
    Fixture {
        company_id: company.id,
        application_id: application.id,
        device_id: device.id,
        global_policy_id: global.id,
    }
}

#[tokio::test]
async fn company_delete_removes_dependents() {
    let store = Arc::new(FailingStore::new(tables::USERS));
    let api = ModelApi::new(store.clone(), ProtocolRegistry::new());
    let fixture = populate(&api).await;

    let report = api
        .companies
        .delete_company(&fixture.company_id)
        .await
        .expect("delete");
    assert!(report.is_clean(), "unexpected failures: {:?}", report.failed);

    for table in [
        tables::COMPANIES,
        tables::APPLICATIONS,
        tables::DEVICES,
        tables::DEVICE_PROFILES,
        tables::USERS,
        tables::APPLICATION_NETWORK_TYPE_LINKS,
        tables::COMPANY_NETWORK_TYPE_LINKS,
        tables::DEVICE_NETWORK_TYPE_LINKS,
    ] {
        assert_eq!(store.count(table), 0, "{table} not emptied");
    }
    let remaining = api
        .password_policies
        .retrieve_password_policies(&ListOptions::new())
        .await
        .expect("policies");
    assert_eq!(remaining.total_count, 1);
    assert_eq!(remaining.records[0].id, fixture.global_policy_id);
}

#[tokio::test]
async fn company_delete_continues_past_failing_category() {
    let store = Arc::new(FailingStore::new(tables::USERS));
    let api = ModelApi::new(store.clone(), ProtocolRegistry::new());
    let fixture = populate(&api).await;
    store.arm();

    let report = api
        .companies
        .delete_company(&fixture.company_id)
        .await
        .expect("delete");

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].category, "users");
    assert_eq!(store.count(tables::USERS), 1);
    assert_eq!(store.count(tables::COMPANIES), 0);
    assert_eq!(store.count(tables::APPLICATIONS), 0);
    assert_eq!(store.count(tables::DEVICES), 0);
    assert_eq!(store.count(tables::DEVICE_PROFILES), 0);
    assert_eq!(store.count(tables::COMPANY_NETWORK_TYPE_LINKS), 0);
    assert_eq!(store.count(tables::PASSWORD_POLICIES), 1);
}

#[tokio::test]
async fn nested_failures_carry_category_path() {
    let store = Arc::new(FailingStore::new(tables::DEVICE_NETWORK_TYPE_LINKS));
    let api = ModelApi::new(store.clone(), ProtocolRegistry::new());
    let fixture = populate(&api).await;
    store.arm();

    let report = api
        .companies
        .delete_company(&fixture.company_id)
        .await
        .expect("delete");

    assert_eq!(report.failed.len(), 1);
    assert_eq!(
        report.failed[0].category,
        "applications.devices.deviceNetworkTypeLinks"
    );
    assert_eq!(store.count(tables::DEVICES), 0);
    assert_eq!(store.count(tables::DEVICE_NETWORK_TYPE_LINKS), 1);
}

#[tokio::test]
async fn missing_company_delete_is_not_found() {
    let store = Arc::new(FailingStore::new(tables::USERS));
    let api = ModelApi::new(store, ProtocolRegistry::new());
    let result = api
        .companies
        .delete_company("aaaaaaaaaaaaaaaaaaaaaaaa")
        .await;
    assert!(matches!(result, Err(ModelError::NotFound(_))));
}

#[tokio::test]
async fn application_delete_cascades_to_devices() {
    let store = Arc::new(FailingStore::new(tables::USERS));
    let api = ModelApi::new(store.clone(), ProtocolRegistry::new());
    let fixture = populate(&api).await;

    let report = api
        .applications
        .delete_application(&fixture.application_id)
        .await
        .expect("delete");
    assert!(report.is_clean());
    assert!(matches!(
        api.devices.retrieve_device(&fixture.device_id).await,
        Err(ModelError::NotFound(_))
    ));
    assert_eq!(store.count(tables::APPLICATION_NETWORK_TYPE_LINKS), 0);
    assert_eq!(store.count(tables::DEVICE_NETWORK_TYPE_LINKS), 0);
}

#[tokio::test]
async fn application_delete_continues_past_failing_device() {
    let store = Arc::new(FailingStore::failing(tables::DEVICES, FailOn::Delete));
    let api = ModelApi::new(store.clone(), ProtocolRegistry::new());
    let fixture = populate(&api).await;
    let second = api
        .devices
        .create_device(&NewDevice {
            application_id: fixture.application_id.clone(),
            name: "dog2".to_string(),
            ..NewDevice::default()
        })
        .await
        .expect("second device");
    store.arm_for(&fixture.device_id);

    let report = api
        .applications
        .delete_application(&fixture.application_id)
        .await
        .expect("delete");

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].category, "devices");
    assert!(matches!(
        api.devices.retrieve_device(&second.id).await,
        Err(ModelError::NotFound(_))
    ));
    assert!(api.devices.retrieve_device(&fixture.device_id).await.is_ok());
    assert_eq!(store.count(tables::DEVICES), 1);
    assert_eq!(store.count(tables::APPLICATIONS), 0);
}
