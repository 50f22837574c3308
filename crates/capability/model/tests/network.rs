mod common;

use common::{FAKE_HANDLER, FailOn, FailingStore, model_api, registry};
use lpwan_model::security::network_key_id;
use lpwan_model::{ModelApi, ModelError, SecurityError};
use lpwan_storage::{
    InMemoryRecordStore, ListOptions, NetworkUpdate, NewNetwork, NewNetworkProtocol, RecordStore,
    tables,
};
use serde_json::{Value, json};
use std::sync::Arc;

async fn lora_protocol(api: &ModelApi) -> (String, String) {
    let protocol = api
        .data
        .network_protocols
        .retrieve_by_handler(FAKE_HANDLER)
        .await
        .expect("lookup")
        .expect("registered protocol");
    (protocol.id, protocol.network_type_id)
}

async fn provider(api: &ModelApi) -> String {
    api.network_providers
        .create_network_provider("Kyrio")
        .await
        .expect("provider")
        .id
}

async fn raw_security_data(store: &InMemoryRecordStore, network_id: &str) -> Value {
    let document = store
        .fetch_one(tables::NETWORKS, "id", &json!(network_id))
        .await
        .expect("fetch")
        .expect("network document");
    document.get("securityData").cloned().unwrap_or(Value::Null)
}

#[tokio::test]
async fn security_data_is_encrypted_at_rest() {
    let (store, api) = model_api().await;
    let type_id = api
        .network_types
        .ensure_network_type("LoRa")
        .await
        .expect("type")
        .id;
    // 未注册处理器的协议不做连接测试，securityData 原样往返
    let protocol = api
        .network_protocols
        .create_network_protocol(&NewNetworkProtocol {
            name: "Manual".to_string(),
            network_type_id: type_id.clone(),
            protocol_handler: "Manual_1".to_string(),
            ..NewNetworkProtocol::default()
        })
        .await
        .expect("protocol");
    let secret = json!({ "username": "admin", "password": "hunter2", "nested": { "n": 1 } });

    let created = api
        .networks
        .create_network(&NewNetwork {
            name: "manual".to_string(),
            network_provider_id: provider(&api).await,
            network_type_id: type_id,
            network_protocol_id: protocol.id.clone(),
            base_url: Some("https://manual.example/api".to_string()),
            security_data: Some(secret.clone()),
        })
        .await
        .expect("create");
    assert_eq!(created.security_data, Some(secret.clone()));

    let raw = raw_security_data(&store, &created.id).await;
    let sealed = raw.as_str().expect("sealed string");
    assert!(!sealed.contains("hunter2"));

    let key = api
        .data
        .protocol_data
        .find(&created.id, &protocol.id, &network_key_id(&created.id))
        .await
        .expect("find")
        .expect("key stored");
    assert_eq!(key.data_value.len(), 64);

    let fetched = api.networks.retrieve_network(&created.id).await.expect("retrieve");
    assert_eq!(fetched.security_data, Some(secret.clone()));

    let listed = api
        .networks
        .retrieve_networks(&ListOptions::new())
        .await
        .expect("list");
    assert_eq!(listed.total_count, 1);
    assert_eq!(listed.records[0].security_data, Some(secret));
}

#[tokio::test]
async fn network_without_security_data_still_gets_a_key() {
    let (store, api) = model_api().await;
    let (protocol_id, type_id) = lora_protocol(&api).await;
    let created = api
        .networks
        .create_network(&NewNetwork {
            name: "bare".to_string(),
            network_provider_id: provider(&api).await,
            network_type_id: type_id,
            network_protocol_id: protocol_id.clone(),
            base_url: None,
            security_data: None,
        })
        .await
        .expect("create");
    assert_eq!(created.security_data, None);
    assert_eq!(raw_security_data(&store, &created.id).await, Value::Null);
    assert!(
        api.data
            .protocol_data
            .find(&created.id, &protocol_id, &network_key_id(&created.id))
            .await
            .expect("find")
            .is_some()
    );
}

#[tokio::test]
async fn connection_test_marks_security_data() {
    let (_store, api) = model_api().await;
    let (protocol_id, type_id) = lora_protocol(&api).await;
    let provider_id = provider(&api).await;

    let good = api
        .networks
        .create_network(&NewNetwork {
            name: "good".to_string(),
            network_provider_id: provider_id.clone(),
            network_type_id: type_id.clone(),
            network_protocol_id: protocol_id.clone(),
            base_url: Some("https://lora_appserver:8080/api".to_string()),
            security_data: Some(json!({ "authorized": false, "username": "admin", "password": "good" })),
        })
        .await
        .expect("create");
    let data = good.security_data.expect("security data");
    assert_eq!(data["authorized"], json!(true));
    assert_eq!(data["message"], json!("ok"));
    assert_eq!(data["enabled"], json!(true));

    let bad = api
        .networks
        .create_network(&NewNetwork {
            name: "bad".to_string(),
            network_provider_id: provider_id,
            network_type_id: type_id,
            network_protocol_id: protocol_id,
            base_url: Some("https://lora_appserver:8080/api".to_string()),
            security_data: Some(json!({ "username": "admin", "password": "wrong" })),
        })
        .await
        .expect("create");
    let data = bad.security_data.expect("security data");
    assert_eq!(data["authorized"], json!(false));
    assert!(data["message"].as_str().unwrap_or_default().contains("bad password"));
}

#[tokio::test]
async fn update_moves_key_and_reencrypts() {
    let (store, api) = model_api().await;
    let (protocol_id, type_id) = lora_protocol(&api).await;
    let created = api
        .networks
        .create_network(&NewNetwork {
            name: "lora".to_string(),
            network_provider_id: provider(&api).await,
            network_type_id: type_id.clone(),
            network_protocol_id: protocol_id.clone(),
            base_url: Some("https://lora.example/api".to_string()),
            security_data: Some(json!({ "username": "admin", "password": "good" })),
        })
        .await
        .expect("create");
    let before = raw_security_data(&store, &created.id).await;

    let other = api
        .network_protocols
        .create_network_protocol(&NewNetworkProtocol {
            name: "Other".to_string(),
            network_type_id: type_id,
            protocol_handler: "Other_1".to_string(),
            ..NewNetworkProtocol::default()
        })
        .await
        .expect("protocol");

    let updated = api
        .networks
        .update_network(
            &created.id,
            &NetworkUpdate {
                network_protocol_id: Some(other.id.clone()),
                security_data: Some(json!({ "username": "root", "password": "changed" })),
                ..NetworkUpdate::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(
        updated.security_data,
        Some(json!({ "username": "root", "password": "changed" }))
    );
    assert_ne!(raw_security_data(&store, &created.id).await, before);

    let key_id = network_key_id(&created.id);
    let old_key = api
        .data
        .protocol_data
        .find(&created.id, &protocol_id, &key_id)
        .await
        .expect("find");
    assert!(old_key.is_none());
    let new_key = api
        .data
        .protocol_data
        .find(&created.id, &other.id, &key_id)
        .await
        .expect("find");
    assert!(new_key.is_some());

    let fetched = api.networks.retrieve_network(&created.id).await.expect("retrieve");
    assert_eq!(fetched.security_data, updated.security_data);
}

#[tokio::test]
async fn delete_removes_key_and_network() {
    let (store, api) = model_api().await;
    let (protocol_id, type_id) = lora_protocol(&api).await;
    let created = api
        .networks
        .create_network(&NewNetwork {
            name: "lora".to_string(),
            network_provider_id: provider(&api).await,
            network_type_id: type_id,
            network_protocol_id: protocol_id,
            base_url: None,
            security_data: Some(json!({ "password": "good" })),
        })
        .await
        .expect("create");

    api.networks.delete_network(&created.id).await.expect("delete");
    assert_eq!(store.count(tables::NETWORKS), 0);
    assert_eq!(store.count(tables::PROTOCOL_DATA), 0);
    assert!(matches!(
        api.networks.delete_network(&created.id).await,
        Err(ModelError::NotFound(_))
    ));
}

#[tokio::test]
async fn missing_key_is_a_security_error() {
    let (_store, api) = model_api().await;
    let (protocol_id, type_id) = lora_protocol(&api).await;
    let created = api
        .networks
        .create_network(&NewNetwork {
            name: "lora".to_string(),
            network_provider_id: provider(&api).await,
            network_type_id: type_id,
            network_protocol_id: protocol_id.clone(),
            base_url: None,
            security_data: Some(json!({ "password": "good" })),
        })
        .await
        .expect("create");
    let key = api
        .data
        .protocol_data
        .find(&created.id, &protocol_id, &network_key_id(&created.id))
        .await
        .expect("find")
        .expect("key");
    api.data.protocol_data.delete(&key.id).await.expect("drop key");

    let result = api.networks.retrieve_network(&created.id).await;
    assert!(matches!(
        result,
        Err(ModelError::Security(SecurityError::MissingKey(_)))
    ));
}

#[tokio::test]
async fn failed_update_keeps_network_readable() {
    let store = Arc::new(FailingStore::failing(tables::NETWORKS, FailOn::Update));
    let api = ModelApi::new(store.clone(), registry());
    api.initialize().await;
    let (protocol_id, type_id) = lora_protocol(&api).await;
    let secret = json!({ "username": "admin", "password": "good" });
    let created = api
        .networks
        .create_network(&NewNetwork {
            name: "lora".to_string(),
            network_provider_id: provider(&api).await,
            network_type_id: type_id.clone(),
            network_protocol_id: protocol_id.clone(),
            base_url: None,
            security_data: Some(secret.clone()),
        })
        .await
        .expect("create");
    let other = api
        .network_protocols
        .create_network_protocol(&NewNetworkProtocol {
            name: "Other".to_string(),
            network_type_id: type_id,
            protocol_handler: "Other_1".to_string(),
            ..NewNetworkProtocol::default()
        })
        .await
        .expect("protocol");
    store.arm();

    let result = api
        .networks
        .update_network(
            &created.id,
            &NetworkUpdate {
                network_protocol_id: Some(other.id.clone()),
                ..NetworkUpdate::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ModelError::Store(_))));

    let fetched = api.networks.retrieve_network(&created.id).await.expect("still readable");
    assert_eq!(fetched.network_protocol_id, protocol_id);
    assert_eq!(fetched.security_data.expect("security data")["password"], json!("good"));
    let key_id = network_key_id(&created.id);
    let copied = api
        .data
        .protocol_data
        .find(&created.id, &other.id, &key_id)
        .await
        .expect("find");
    assert!(copied.is_none());
}

#[tokio::test]
async fn update_to_unknown_protocol_is_rejected() {
    let (_store, api) = model_api().await;
    let (protocol_id, type_id) = lora_protocol(&api).await;
    let created = api
        .networks
        .create_network(&NewNetwork {
            name: "lora".to_string(),
            network_provider_id: provider(&api).await,
            network_type_id: type_id,
            network_protocol_id: protocol_id.clone(),
            base_url: None,
            security_data: Some(json!({ "password": "good" })),
        })
        .await
        .expect("create");

    let result = api
        .networks
        .update_network(
            &created.id,
            &NetworkUpdate {
                network_protocol_id: Some("aaaaaaaaaaaaaaaaaaaaaaaa".to_string()),
                ..NetworkUpdate::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ModelError::Validation(_))));

    let fetched = api.networks.retrieve_network(&created.id).await.expect("retrieve");
    assert_eq!(fetched.network_protocol_id, protocol_id);
    assert!(
        api.data
            .protocol_data
            .find(&created.id, &protocol_id, &network_key_id(&created.id))
            .await
            .expect("find")
            .is_some()
    );
}
