use lpwan_telemetry::{
    TelemetryMetrics, metrics, new_request_ids, record_login, record_pull_run,
};

#[test]
fn request_ids_non_empty() {
    let ids = new_request_ids();
    assert!(!ids.request_id.is_empty());
    assert!(!ids.trace_id.is_empty());
    assert_ne!(ids.request_id, ids.trace_id);
}

#[test]
fn fresh_metrics_start_at_zero() {
    let snapshot = TelemetryMetrics::new().snapshot();
    assert_eq!(snapshot.records_created, 0);
    assert_eq!(snapshot.pull_runs, 0);
}

#[test]
fn pull_runs_track_failures_and_latency() {
    let before = metrics().snapshot();
    record_pull_run(12, false);
    record_login(true);
    let after = metrics().snapshot();
    assert!(after.pull_runs > before.pull_runs);
    assert!(after.pull_failures > before.pull_failures);
    assert!(after.pull_latency_ms_total >= before.pull_latency_ms_total + 12);
    assert!(after.login_success > before.login_success);
}
