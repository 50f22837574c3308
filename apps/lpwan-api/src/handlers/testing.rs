//! handler 单元测试共用的状态与凭据构造

use crate::AppState;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::Response;
use domain::{CallerContext, CompanyType, UserRole};
use lpwan_auth::{AuthService, JwtManager};
use lpwan_model::ModelApi;
use lpwan_protocol::{PostReporter, ProtocolRegistry};
use lpwan_storage::{CompanyRecord, InMemoryRecordStore, RecordStore};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const SECRET: &str = "test-secret";
pub(crate) const ADMIN_PASSWORD: &str = "admin-pass";

/// 内存存储 + 仅含 POST 上报处理器的注册表 + 已初始化的系统管理员
pub(crate) async fn build_state() -> AppState {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let reporter = PostReporter::new(Duration::from_secs(5)).expect("reporter");
    let registry = ProtocolRegistry::new().with_reporter(Arc::new(reporter));
    let models = ModelApi::new(store, registry);
    models.initialize().await;
    models
        .seed_admin("SysAdmins", "admin", ADMIN_PASSWORD)
        .await
        .expect("seed admin");
    let jwt = JwtManager::new(SECRET.to_string(), 3600);
    let auth = Arc::new(AuthService::new(
        models.data.users.clone(),
        models.data.companies.clone(),
        jwt,
    ));
    AppState {
        auth,
        models: Arc::new(models),
        db_pool: None,
    }
}

pub(crate) fn bearer(ctx: &CallerContext) -> HeaderMap {
    let token = JwtManager::new(SECRET.to_string(), 3600)
        .issue_token(ctx)
        .expect("token");
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token.token)).expect("header"),
    );
    headers
}

pub(crate) fn system_admin() -> HeaderMap {
    bearer(&CallerContext::new(
        "sys-user",
        "sys-company",
        CompanyType::Admin,
        UserRole::Admin,
    ))
}

/// 新建一个供应商公司，返回公司与其管理员凭据
pub(crate) async fn vendor(state: &AppState, name: &str) -> (CompanyRecord, HeaderMap) {
    let company = state
        .models
        .companies
        .create_company(name, CompanyType::Vendor)
        .await
        .expect("vendor company");
    let headers = bearer(&CallerContext::new(
        format!("{name}-admin"),
        company.id.clone(),
        CompanyType::Vendor,
        UserRole::Admin,
    ));
    (company, headers)
}

pub(crate) async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
