//! 进程计数器快照

use crate::AppState;
use crate::middleware::{require_caller, require_system_admin};
use crate::utils::{ApiResult, ok};
use axum::{extract::State, http::HeaderMap};
use serde_json::json;

/// GET /api/metrics（仅系统管理员）
pub async fn get_metrics(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_system_admin(&ctx)?;
    let snapshot = lpwan_telemetry::metrics().snapshot();
    let average_pull_ms = snapshot
        .pull_latency_ms_total
        .checked_div(snapshot.pull_latency_ms_count)
        .unwrap_or(0);
    Ok(ok(json!({
        "recordsCreated": snapshot.records_created,
        "recordsDeleted": snapshot.records_deleted,
        "cascadeFailures": snapshot.cascade_failures,
        "securityFailures": snapshot.security_failures,
        "pullRuns": snapshot.pull_runs,
        "pullFailures": snapshot.pull_failures,
        "pulledRecordsCreated": snapshot.pulled_records_created,
        "pullLatencyMsTotal": snapshot.pull_latency_ms_total,
        "pullLatencyMsCount": snapshot.pull_latency_ms_count,
        "pullLatencyMsAverage": average_pull_ms,
        "loginSuccess": snapshot.login_success,
        "loginFailure": snapshot.login_failure,
        "relayDelivered": snapshot.relay_delivered,
        "relayFailed": snapshot.relay_failed,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{body_json, build_state, system_admin, vendor};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn metrics_are_admin_only() {
        let state = build_state().await;
        let (_, vendor_headers) = vendor(&state, "acme").await;
        let response = get_metrics(State(state.clone()), vendor_headers)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = get_metrics(State(state), system_admin())
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["data"]["recordsCreated"].as_u64().expect("count") >= 1);
        assert!(body["data"].get("pullLatencyMsAverage").is_some());
    }
}
