//! 网络上行数据入口
//!
//! 远端网络服务器直接回调，不要求登录；未知的应用或网络返回 404。
//! 网络未启用或应用未启动时同样返回 200，数据不投递。

use crate::AppState;
use crate::utils::{ApiResult, model_error, ok};
use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

/// POST /api/ingest/:applicationId/:networkId
pub async fn ingest_data(
    State(state): State<AppState>,
    Path((application_id, network_id)): Path<(String, String)>,
    Json(data): Json<Value>,
) -> ApiResult {
    let outcome = state
        .models
        .relay
        .ingest(&application_id, &network_id, &data)
        .await
        .map_err(model_error)?;
    tracing::debug!(target: "lpwan.api", application_id = %application_id, network_id = %network_id, ?outcome, "uplink received");
    Ok(ok(json!({ "outcome": outcome })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{body_json, build_state};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use domain::CompanyType;
    use lpwan_protocol::POST_REPORTER;
    use lpwan_storage::{NewApplication, NewNetwork, NewNetworkProtocol};
    use wiremock::matchers::{body_json as body_matches, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn network(state: &AppState, security_data: Value) -> String {
        let models = &state.models;
        let network_type = models
            .network_types
            .ensure_network_type("LoRa")
            .await
            .expect("type");
        let protocol = models
            .network_protocols
            .create_network_protocol(&NewNetworkProtocol {
                name: "Manual".to_string(),
                network_type_id: network_type.id.clone(),
                protocol_handler: "Manual_1".to_string(),
                ..NewNetworkProtocol::default()
            })
            .await
            .expect("protocol");
        let provider = models
            .network_providers
            .create_network_provider("Kyrio")
            .await
            .expect("provider");
        models
            .networks
            .create_network(&NewNetwork {
                name: "lora".to_string(),
                network_provider_id: provider.id,
                network_type_id: network_type.id,
                network_protocol_id: protocol.id,
                base_url: None,
                security_data: Some(security_data),
            })
            .await
            .expect("network")
            .id
    }

    async fn running_application(state: &AppState, base_url: String) -> String {
        let models = &state.models;
        let company = models
            .companies
            .create_company("acme", CompanyType::Vendor)
            .await
            .expect("company");
        let reporting = models
            .reporting_protocols
            .create_reporting_protocol("POST", POST_REPORTER)
            .await
            .expect("reporting protocol");
        let app = models
            .applications
            .create_application(&NewApplication {
                company_id: company.id,
                name: "tracker".to_string(),
                reporting_protocol_id: Some(reporting.id),
                base_url: Some(base_url),
                ..NewApplication::default()
            })
            .await
            .expect("application");
        models
            .relay
            .start_application(&app.id)
            .await
            .expect("start");
        app.id
    }

    #[tokio::test]
    async fn enabled_network_relays_without_login() {
        let server = MockServer::start().await;
        let data = json!({ "devEUI": "0080000000000001", "fPort": 1 });
        Mock::given(method("POST"))
            .and(path("/uplink"))
            .and(body_matches(data.clone()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        let state = build_state().await;
        let app_id = running_application(&state, format!("{}/uplink", server.uri())).await;
        let network_id = network(&state, json!({ "enabled": true })).await;

        let response = ingest_data(State(state), Path((app_id, network_id)), Json(data))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["outcome"], "delivered");
    }

    #[tokio::test]
    async fn disabled_network_is_acknowledged_but_not_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let state = build_state().await;
        let app_id = running_application(&state, server.uri()).await;
        let network_id = network(&state, json!({ "enabled": false })).await;

        let response = ingest_data(State(state), Path((app_id, network_id)), Json(json!({})))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["outcome"], "networkDisabled");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let state = build_state().await;
        let network_id = network(&state, json!({ "enabled": true })).await;

        let response = ingest_data(
            State(state.clone()),
            Path(("aaaaaaaaaaaaaaaaaaaaaaaa".to_string(), "bbbbbbbbbbbbbbbbbbbbbbbb".to_string())),
            Json(json!({})),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ingest_data(
            State(state),
            Path(("aaaaaaaaaaaaaaaaaaaaaaaa".to_string(), network_id)),
            Json(json!({})),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn failed_delivery_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let state = build_state().await;
        let app_id = running_application(&state, server.uri()).await;
        let network_id = network(&state, json!({ "enabled": true })).await;

        let response = ingest_data(State(state), Path((app_id, network_id)), Json(json!({})))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
