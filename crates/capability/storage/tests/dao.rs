use domain::CompanyType;
use lpwan_storage::{
    DataAccess, InMemoryRecordStore, ListOptions, NewApplication, NewDevice, NewDeviceProfile,
    NewNetworkProvisioningField, NewPasswordPolicy, RecordStore, StorageError,
};
use serde_json::json;
use std::sync::Arc;

fn data_access() -> (Arc<InMemoryRecordStore>, DataAccess) {
    let store = Arc::new(InMemoryRecordStore::new());
    let data = DataAccess::new(store.clone());
    (store, data)
}

#[tokio::test]
async fn network_settings_round_trip() {
    let (store, data) = data_access();
    let company = data
        .companies
        .create("acme", CompanyType::Vendor)
        .await
        .expect("company");
    let settings = json!({
        "region": "US902",
        "classB": false,
        "rx": [1, 2, { "delay": 1.5 }],
        "extra": null,
    });
    let profile = data
        .device_profiles
        .create(&NewDeviceProfile {
            network_type_id: "bbbbbbbbbbbbbbbbbbbbbbbb".to_string(),
            company_id: company.id.clone(),
            name: "class-a".to_string(),
            description: None,
            network_settings: settings.clone(),
        })
        .await
        .expect("profile");
    assert_eq!(profile.network_settings, settings);

    let raw = store
        .fetch_one("deviceProfiles", "id", &json!(profile.id))
        .await
        .expect("fetch")
        .expect("raw");
    assert!(raw["networkSettings"].is_string());

    let link = data
        .company_links
        .create(&company.id, "bbbbbbbbbbbbbbbbbbbbbbbb", json!({ "region": "" }))
        .await
        .expect("link");
    let reread = data.company_links.retrieve(&link.id).await.expect("link");
    assert_eq!(reread.network_settings, json!({ "region": "" }));
}

#[tokio::test]
async fn device_networks_follow_links() {
    let (_, data) = data_access();
    let acme = data
        .companies
        .create("acme", CompanyType::Vendor)
        .await
        .expect("company");
    let tracker = data
        .applications
        .create(&NewApplication {
            company_id: acme.id.clone(),
            name: "tracker".to_string(),
            ..NewApplication::default()
        })
        .await
        .expect("application");
    let dog1 = data
        .devices
        .create(&NewDevice {
            application_id: tracker.id.clone(),
            name: "dog1".to_string(),
            ..NewDevice::default()
        })
        .await
        .expect("device");

    let before = data.devices.retrieve(&dog1.id).await.expect("device");
    assert_eq!(before.networks, Some(vec![]));

    let lora = data.network_types.create("LoRa").await.expect("type");
    let profile = data
        .device_profiles
        .create(&NewDeviceProfile {
            network_type_id: lora.id.clone(),
            company_id: acme.id.clone(),
            name: "default".to_string(),
            ..NewDeviceProfile::default()
        })
        .await
        .expect("profile");
    data.device_links
        .create(&dog1.id, &lora.id, &profile.id, json!({ "devEUI": "0011" }))
        .await
        .expect("link");

    let after = data.devices.retrieve(&dog1.id).await.expect("device");
    assert_eq!(after.networks, Some(vec![lora.id.clone()]));
}

#[tokio::test]
async fn application_ownership_validation() {
    let (_, data) = data_access();
    let acme = data
        .companies
        .create("acme", CompanyType::Vendor)
        .await
        .expect("company");
    let other = data
        .companies
        .create("other", CompanyType::Vendor)
        .await
        .expect("company");
    let app = data
        .applications
        .create(&NewApplication {
            company_id: acme.id.clone(),
            name: "tracker".to_string(),
            ..NewApplication::default()
        })
        .await
        .expect("application");

    data.applications
        .validate_company_for_application(None, &app.id)
        .await
        .expect("admin bypass");
    data.applications
        .validate_company_for_application(None, "cccccccccccccccccccccccc")
        .await
        .expect("admin bypass without lookup");
    data.applications
        .validate_company_for_application(Some(&acme.id), &app.id)
        .await
        .expect("owner");
    let err = data
        .applications
        .validate_company_for_application(Some(&other.id), &app.id)
        .await
        .expect_err("mismatch");
    assert!(matches!(err, StorageError::Unauthorized(_)));
}

#[tokio::test]
async fn device_validation_walks_application_chain() {
    let (_, data) = data_access();
    let acme = data
        .companies
        .create("acme", CompanyType::Vendor)
        .await
        .expect("company");
    let app = data
        .applications
        .create(&NewApplication {
            company_id: acme.id.clone(),
            name: "tracker".to_string(),
            ..NewApplication::default()
        })
        .await
        .expect("application");
    let device = data
        .devices
        .create(&NewDevice {
            application_id: app.id.clone(),
            name: "dog1".to_string(),
            ..NewDevice::default()
        })
        .await
        .expect("device");

    data.devices
        .validate_company_for_device(Some(&acme.id), &device.id)
        .await
        .expect("owner");
    let err = data
        .devices
        .validate_company_for_device(Some("dddddddddddddddddddddddd"), &device.id)
        .await
        .expect_err("mismatch");
    assert!(matches!(err, StorageError::Unauthorized(_)));
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let (_, data) = data_access();
    let err = data
        .companies
        .retrieve("eeeeeeeeeeeeeeeeeeeeeeee")
        .await
        .expect_err("missing");
    assert!(err.is_not_found());
    let err = data
        .networks
        .delete("eeeeeeeeeeeeeeeeeeeeeeee")
        .await
        .expect_err("missing");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn password_policies_scope_global_and_company() {
    let (_, data) = data_access();
    for company_id in [None, Some("aaaaaaaaaaaaaaaaaaaaaaaa"), Some("bbbbbbbbbbbbbbbbbbbbbbbb")] {
        data.password_policies
            .create(&NewPasswordPolicy {
                rule_text: "at least 8 characters".to_string(),
                rule_reg_exp: ".{8,}".to_string(),
                company_id: company_id.map(str::to_string),
            })
            .await
            .expect("policy");
    }
    let scoped = data
        .password_policies
        .retrieve_for_company(Some("aaaaaaaaaaaaaaaaaaaaaaaa"))
        .await
        .expect("policies");
    assert_eq!(scoped.len(), 2);
    let global = data
        .password_policies
        .retrieve_for_company(None)
        .await
        .expect("policies");
    assert_eq!(global.len(), 1);

    let all = data
        .password_policies
        .retrieve_many(&ListOptions::new())
        .await
        .expect("list");
    assert_eq!(all.total_count, 3);
}

#[tokio::test]
async fn company_types_upsert_by_code() {
    let (_, data) = data_access();
    data.companies
        .ensure_type(CompanyType::Admin)
        .await
        .expect("admin");
    data.companies
        .ensure_type(CompanyType::Vendor)
        .await
        .expect("vendor");
    data.companies
        .ensure_type(CompanyType::Vendor)
        .await
        .expect("vendor again");
    let types = data.companies.get_types().await.expect("types");
    assert_eq!(types.len(), 2);
    assert!(types.iter().any(|t| t.name == "vendor" && t.code == 2));
}

#[tokio::test]
async fn owned_lookups_stay_inside_owner() {
    let (_, data) = data_access();
    let acme = data
        .companies
        .create("acme", CompanyType::Vendor)
        .await
        .expect("acme");
    let globex = data
        .companies
        .create("globex", CompanyType::Vendor)
        .await
        .expect("globex");
    let acme_app = data
        .applications
        .create(&NewApplication {
            company_id: acme.id.clone(),
            name: "tracker".to_string(),
            ..NewApplication::default()
        })
        .await
        .expect("application");
    data.devices
        .create(&NewDevice {
            application_id: acme_app.id.clone(),
            name: "dog1".to_string(),
            ..NewDevice::default()
        })
        .await
        .expect("device");

    let found = data
        .applications
        .retrieve_by_company_and_name(&acme.id, "tracker")
        .await
        .expect("lookup");
    assert_eq!(found.map(|app| app.id), Some(acme_app.id.clone()));
    let foreign = data
        .applications
        .retrieve_by_company_and_name(&globex.id, "tracker")
        .await
        .expect("lookup");
    assert!(foreign.is_none());
    let missing = data
        .devices
        .retrieve_by_application_and_name("cccccccccccccccccccccccc", "dog1")
        .await
        .expect("lookup");
    assert!(missing.is_none());
    assert!(
        data.devices
            .retrieve_by_application_and_name(&acme_app.id, "dog1")
            .await
            .expect("lookup")
            .is_some()
    );
}

#[tokio::test]
async fn provisioning_fields_filter_by_protocol_and_table() {
    let (_, data) = data_access();
    let protocol_id = "dddddddddddddddddddddddd";
    for (order, table) in [(2, "devices"), (1, "devices"), (1, "applications")] {
        data.provisioning_fields
            .create(&NewNetworkProvisioningField {
                network_protocol_id: protocol_id.to_string(),
                field_order: order,
                field_name: format!("{table}-{order}"),
                field_label: Some("Label".to_string()),
                field_type: Some("string".to_string()),
                field_size: Some(16),
                required_field: order == 1,
                provisioning_table_id: table.to_string(),
            })
            .await
            .expect("field");
    }

    let devices = data
        .provisioning_fields
        .retrieve_many(
            &ListOptions::new()
                .filter("networkProtocolId", protocol_id)
                .filter("provisioningTableId", "devices"),
        )
        .await
        .expect("list");
    assert_eq!(devices.total_count, 2);
    assert!(devices.records.iter().all(|f| f.provisioning_table_id == "devices"));

    let other = data
        .provisioning_fields
        .retrieve_many(&ListOptions::new().filter("networkProtocolId", "eeeeeeeeeeeeeeeeeeeeeeee"))
        .await
        .expect("list");
    assert_eq!(other.total_count, 0);
}
