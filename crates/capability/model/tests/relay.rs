mod common;

use common::{FAKE_HANDLER, registry};
use domain::CompanyType;
use lpwan_model::{IngestOutcome, ModelApi, ModelError};
use lpwan_protocol::{POST_REPORTER, PostReporter};
use lpwan_storage::{
    ApplicationRecord, InMemoryRecordStore, NewApplication, NewNetwork, NewNetworkProtocol,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn relay_api() -> ModelApi {
    let reporter = PostReporter::new(Duration::from_secs(5)).expect("reporter");
    let api = ModelApi::new(
        Arc::new(InMemoryRecordStore::new()),
        registry().with_reporter(Arc::new(reporter)),
    );
    api.initialize().await;
    api
}

async fn application(api: &ModelApi, base_url: Option<String>) -> ApplicationRecord {
    let company = api
        .companies
        .create_company("acme", CompanyType::Vendor)
        .await
        .expect("company");
    let reporting = api
        .reporting_protocols
        .create_reporting_protocol("POST", POST_REPORTER)
        .await
        .expect("reporting protocol");
    api.applications
        .create_application(&NewApplication {
            company_id: company.id,
            name: "tracker".to_string(),
            reporting_protocol_id: Some(reporting.id),
            base_url,
            ..NewApplication::default()
        })
        .await
        .expect("application")
}

/// 连接测试通过的网络，securityData.enabled 为 true。
async fn enabled_network(api: &ModelApi) -> String {
    let protocol = api
        .data
        .network_protocols
        .retrieve_by_handler(FAKE_HANDLER)
        .await
        .expect("lookup")
        .expect("registered protocol");
    network(api, protocol.id, protocol.network_type_id, json!({ "password": "good" })).await
}

/// 无处理器的协议不做连接测试，securityData 原样保存。
async fn disabled_network(api: &ModelApi) -> String {
    let network_type = api
        .network_types
        .ensure_network_type("LoRa")
        .await
        .expect("type");
    let protocol = api
        .network_protocols
        .create_network_protocol(&NewNetworkProtocol {
            name: "Manual".to_string(),
            network_type_id: network_type.id.clone(),
            protocol_handler: "Manual_1".to_string(),
            ..NewNetworkProtocol::default()
        })
        .await
        .expect("protocol");
    network(api, protocol.id, network_type.id, json!({ "enabled": false })).await
}

async fn network(api: &ModelApi, protocol_id: String, type_id: String, data: Value) -> String {
    let provider = api
        .network_providers
        .create_network_provider("Kyrio")
        .await
        .expect("provider");
    api.networks
        .create_network(&NewNetwork {
            name: "lora".to_string(),
            network_provider_id: provider.id,
            network_type_id: type_id,
            network_protocol_id: protocol_id,
            base_url: None,
            security_data: Some(data),
        })
        .await
        .expect("network")
        .id
}

#[tokio::test]
async fn ingest_delivers_to_running_application() {
    let server = MockServer::start().await;
    let data = json!({ "devEUI": "0080000000000001", "data": "AQID" });
    Mock::given(method("POST"))
        .and(path("/uplink"))
        .and(body_json(data.clone()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let api = relay_api().await;
    let app = application(&api, Some(format!("{}/uplink", server.uri()))).await;
    let network_id = enabled_network(&api).await;

    let started = api.relay.start_application(&app.id).await.expect("start");
    assert!(started.running);
    let outcome = api
        .relay
        .ingest(&app.id, &network_id, &data)
        .await
        .expect("ingest");
    assert_eq!(outcome, IngestOutcome::Delivered);
}

#[tokio::test]
async fn disabled_network_drops_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let api = relay_api().await;
    let app = application(&api, Some(server.uri())).await;
    api.relay.start_application(&app.id).await.expect("start");
    let network_id = disabled_network(&api).await;

    let outcome = api
        .relay
        .ingest(&app.id, &network_id, &json!({ "n": 1 }))
        .await
        .expect("ingest");
    assert_eq!(outcome, IngestOutcome::NetworkDisabled);
}

#[tokio::test]
async fn stopped_application_drops_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let api = relay_api().await;
    let app = application(&api, Some(server.uri())).await;
    let network_id = enabled_network(&api).await;
    api.relay.start_application(&app.id).await.expect("start");
    let stopped = api.relay.stop_application(&app.id).await.expect("stop");
    assert!(!stopped.running);

    let outcome = api
        .relay
        .ingest(&app.id, &network_id, &json!({ "n": 1 }))
        .await
        .expect("ingest");
    assert_eq!(outcome, IngestOutcome::ApplicationStopped);
}

#[tokio::test]
async fn unknown_network_or_application_is_not_found() {
    let api = relay_api().await;
    let app = application(&api, Some("http://127.0.0.1:9/uplink".to_string())).await;
    let network_id = enabled_network(&api).await;

    let result = api
        .relay
        .ingest(&app.id, "aaaaaaaaaaaaaaaaaaaaaaaa", &json!({}))
        .await;
    assert!(matches!(result, Err(ModelError::NotFound(_))));
    let result = api
        .relay
        .ingest("aaaaaaaaaaaaaaaaaaaaaaaa", &network_id, &json!({}))
        .await;
    assert!(matches!(result, Err(ModelError::NotFound(_))));
}

#[tokio::test]
async fn start_requires_delivery_target() {
    let api = relay_api().await;
    let app = application(&api, None).await;
    let result = api.relay.start_application(&app.id).await;
    assert!(matches!(result, Err(ModelError::Validation(_))));
    let app = api
        .applications
        .retrieve_application(&app.id)
        .await
        .expect("application");
    assert!(!app.running);
}

#[tokio::test]
async fn rejected_delivery_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let api = relay_api().await;
    let app = application(&api, Some(server.uri())).await;
    let network_id = enabled_network(&api).await;
    api.relay.start_application(&app.id).await.expect("start");

    let result = api.relay.ingest(&app.id, &network_id, &json!({})).await;
    assert!(matches!(result, Err(ModelError::Protocol(_))));
}

#[tokio::test]
async fn test_delivery_does_not_require_start() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uplink"))
        .and(body_json(json!({ "test": true })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let api = relay_api().await;
    let app = application(&api, Some(format!("{}/uplink", server.uri()))).await;

    api.relay
        .test_application(&app.id, &json!({ "test": true }))
        .await
        .expect("test delivery");
}

#[tokio::test]
async fn resume_stops_applications_without_reporter() {
    let api = relay_api().await;
    let app = application(&api, Some("http://127.0.0.1:9/uplink".to_string())).await;
    api.relay.start_application(&app.id).await.expect("start");
    assert_eq!(api.relay.resume_applications().await.expect("resume"), 1);

    let reporting_id = app.reporting_protocol_id.clone().expect("reporting id");
    api.reporting_protocols
        .delete_reporting_protocol(&reporting_id)
        .await
        .expect("drop reporting protocol");

    assert_eq!(api.relay.resume_applications().await.expect("resume"), 0);
    let app = api
        .applications
        .retrieve_application(&app.id)
        .await
        .expect("application");
    assert!(!app.running);
}
