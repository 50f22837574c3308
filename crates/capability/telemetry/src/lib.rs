//! 追踪、请求 ID 生成与进程级计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_created: u64,
    pub records_deleted: u64,
    pub cascade_failures: u64,
    pub security_failures: u64,
    pub pull_runs: u64,
    pub pull_failures: u64,
    pub pulled_records_created: u64,
    pub pull_latency_ms_total: u64,
    pub pull_latency_ms_count: u64,
    pub login_success: u64,
    pub login_failure: u64,
    pub relay_delivered: u64,
    pub relay_failed: u64,
}

/// 进程级计数器。
pub struct TelemetryMetrics {
    records_created: AtomicU64,
    records_deleted: AtomicU64,
    cascade_failures: AtomicU64,
    security_failures: AtomicU64,
    pull_runs: AtomicU64,
    pull_failures: AtomicU64,
    pulled_records_created: AtomicU64,
    pull_latency_ms_total: AtomicU64,
    pull_latency_ms_count: AtomicU64,
    login_success: AtomicU64,
    login_failure: AtomicU64,
    relay_delivered: AtomicU64,
    relay_failed: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            records_created: AtomicU64::new(0),
            records_deleted: AtomicU64::new(0),
            cascade_failures: AtomicU64::new(0),
            security_failures: AtomicU64::new(0),
            pull_runs: AtomicU64::new(0),
            pull_failures: AtomicU64::new(0),
            pulled_records_created: AtomicU64::new(0),
            pull_latency_ms_total: AtomicU64::new(0),
            pull_latency_ms_count: AtomicU64::new(0),
            login_success: AtomicU64::new(0),
            login_failure: AtomicU64::new(0),
            relay_delivered: AtomicU64::new(0),
            relay_failed: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_created: self.records_created.load(Ordering::Relaxed),
            records_deleted: self.records_deleted.load(Ordering::Relaxed),
            cascade_failures: self.cascade_failures.load(Ordering::Relaxed),
            security_failures: self.security_failures.load(Ordering::Relaxed),
            pull_runs: self.pull_runs.load(Ordering::Relaxed),
            pull_failures: self.pull_failures.load(Ordering::Relaxed),
            pulled_records_created: self.pulled_records_created.load(Ordering::Relaxed),
            pull_latency_ms_total: self.pull_latency_ms_total.load(Ordering::Relaxed),
            pull_latency_ms_count: self.pull_latency_ms_count.load(Ordering::Relaxed),
            login_success: self.login_success.load(Ordering::Relaxed),
            login_failure: self.login_failure.load(Ordering::Relaxed),
            relay_delivered: self.relay_delivered.load(Ordering::Relaxed),
            relay_failed: self.relay_failed.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数器实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info，可由 RUST_LOG 覆盖）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录实体创建次数（经由模型层）。
pub fn record_created() {
    metrics().records_created.fetch_add(1, Ordering::Relaxed);
}

/// 记录实体删除次数（含级联删除的父记录）。
pub fn record_deleted() {
    metrics().records_deleted.fetch_add(1, Ordering::Relaxed);
}

/// 记录级联删除中失败的类别数。
pub fn record_cascade_failures(count: u64) {
    metrics()
        .cascade_failures
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录 securityData 加解密或密钥缺失失败。
pub fn record_security_failure() {
    metrics()
        .security_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录一次网络拉取（成功或失败）及其耗时。
pub fn record_pull_run(latency_ms: u64, success: bool) {
    let metrics = metrics();
    metrics.pull_runs.fetch_add(1, Ordering::Relaxed);
    if !success {
        metrics.pull_failures.fetch_add(1, Ordering::Relaxed);
    }
    metrics
        .pull_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .pull_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录拉取过程中新建的本地记录数。
pub fn record_pulled_created(count: u64) {
    metrics()
        .pulled_records_created
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录登录结果。
pub fn record_login(success: bool) {
    let metrics = metrics();
    if success {
        metrics.login_success.fetch_add(1, Ordering::Relaxed);
    } else {
        metrics.login_failure.fetch_add(1, Ordering::Relaxed);
    }
}

/// 记录一次向应用转发上行数据的结果。
pub fn record_relay(delivered: bool) {
    let metrics = metrics();
    if delivered {
        metrics.relay_delivered.fetch_add(1, Ordering::Relaxed);
    } else {
        metrics.relay_failed.fetch_add(1, Ordering::Relaxed);
    }
}
