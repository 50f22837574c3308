//! 网络类型关联 handlers（应用 / 公司 / 设备）
//!
//! 关联的归属跟随其所有者：应用关联 → 应用 → 公司，设备关联 → 设备 → 应用 → 公司。
//! 同一所有者与网络类型只允许一条关联，重复创建返回 400。

use crate::AppState;
use crate::handlers::devices::scoped_device_options;
use crate::middleware::{require_caller, require_company_access, require_company_admin};
use crate::utils::{
    ApiResult, list_options, list_response, model_error, ok, with_filter, with_members,
};
use api_contract::{
    CreateApplicationLinkRequest, CreateCompanyLinkRequest, CreateDeviceLinkRequest, ListQuery,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use lpwan_storage::LinkUpdate;

// ---- 应用网络关联 ----

pub async fn list_application_links(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let applications = &state.models.applications;
    let mut options = list_options(&query);
    match (query.application_id.as_deref(), ctx.scoped_company()) {
        (Some(application_id), scope) => {
            applications
                .validate_company_for_application(scope, application_id)
                .await
                .map_err(model_error)?;
            options = with_filter(options, "applicationId", Some(application_id));
        }
        (None, Some(own)) => {
            let ids = applications
                .application_ids_for_company(own)
                .await
                .map_err(model_error)?;
            options = with_members(options, "applicationId", ids);
        }
        (None, None) => {}
    }
    let options = with_filter(options, "networkTypeId", query.network_type_id.as_deref());
    let list = state
        .models
        .application_links
        .retrieve_application_network_type_links(&options)
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

pub async fn create_application_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateApplicationLinkRequest>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    state
        .models
        .applications
        .validate_company_for_application(ctx.scoped_company(), &req.application_id)
        .await
        .map_err(model_error)?;
    let link = state
        .models
        .application_links
        .create_application_network_type_link(
            &req.application_id,
            &req.network_type_id,
            req.network_settings,
        )
        .await
        .map_err(model_error)?;
    Ok(ok(link))
}

pub async fn get_application_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let links = &state.models.application_links;
    links
        .validate_company_for_application_link(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let link = links
        .retrieve_application_network_type_link(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(link))
}

pub async fn update_application_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<LinkUpdate>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let links = &state.models.application_links;
    links
        .validate_company_for_application_link(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let link = links
        .update_application_network_type_link(&id, &req)
        .await
        .map_err(model_error)?;
    Ok(ok(link))
}

pub async fn delete_application_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let links = &state.models.application_links;
    links
        .validate_company_for_application_link(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    links
        .delete_application_network_type_link(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(()))
}

// ---- 公司网络关联 ----

pub async fn list_company_links(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let company = ctx.scoped_company().or(query.company_id.as_deref());
    let options = with_filter(list_options(&query), "companyId", company);
    let options = with_filter(options, "networkTypeId", query.network_type_id.as_deref());
    let list = state
        .models
        .company_links
        .retrieve_company_network_type_links(&options)
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

pub async fn create_company_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateCompanyLinkRequest>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    require_company_access(&ctx, &req.company_id)?;
    let link = state
        .models
        .company_links
        .create_company_network_type_link(
            &req.company_id,
            &req.network_type_id,
            req.network_settings,
        )
        .await
        .map_err(model_error)?;
    Ok(ok(link))
}

pub async fn get_company_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let link = state
        .models
        .company_links
        .retrieve_company_network_type_link(&id)
        .await
        .map_err(model_error)?;
    require_company_access(&ctx, &link.company_id)?;
    Ok(ok(link))
}

pub async fn update_company_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<LinkUpdate>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let links = &state.models.company_links;
    let existing = links
        .retrieve_company_network_type_link(&id)
        .await
        .map_err(model_error)?;
    require_company_access(&ctx, &existing.company_id)?;
    let link = links
        .update_company_network_type_link(&id, &req)
        .await
        .map_err(model_error)?;
    Ok(ok(link))
}

pub async fn delete_company_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let links = &state.models.company_links;
    let existing = links
        .retrieve_company_network_type_link(&id)
        .await
        .map_err(model_error)?;
    require_company_access(&ctx, &existing.company_id)?;
    links
        .delete_company_network_type_link(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(()))
}

// ---- 设备网络关联 ----

pub async fn list_device_links(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let mut options = list_options(&query);
    match (query.device_id.as_deref(), ctx.scoped_company()) {
        (Some(device_id), scope) => {
            state
                .models
                .devices
                .validate_company_for_device(scope, device_id)
                .await
                .map_err(model_error)?;
            options = with_filter(options, "deviceId", Some(device_id));
        }
        (None, Some(_)) => {
            // 本公司全部设备
            let device_options =
                scoped_device_options(&state, &ctx, &ListQuery::default()).await?;
            let devices = state
                .models
                .devices
                .retrieve_devices(&device_options)
                .await
                .map_err(model_error)?;
            let ids = devices.records.into_iter().map(|device| device.id).collect();
            options = with_members(options, "deviceId", ids);
        }
        (None, None) => {}
    }
    let options = with_filter(options, "networkTypeId", query.network_type_id.as_deref());
    let options = with_filter(
        options,
        "deviceProfileId",
        query.device_profile_id.as_deref(),
    );
    let list = state
        .models
        .device_links
        .retrieve_device_network_type_links(&options)
        .await
        .map_err(model_error)?;
    Ok(list_response(list))
}

pub async fn create_device_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateDeviceLinkRequest>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let models = &state.models;
    models
        .devices
        .validate_company_for_device(ctx.scoped_company(), &req.device_id)
        .await
        .map_err(model_error)?;
    models
        .device_profiles
        .validate_company_for_device_profile(ctx.scoped_company(), &req.device_profile_id)
        .await
        .map_err(model_error)?;
    let link = models
        .device_links
        .create_device_network_type_link(
            &req.device_id,
            &req.network_type_id,
            &req.device_profile_id,
            req.network_settings,
        )
        .await
        .map_err(model_error)?;
    Ok(ok(link))
}

pub async fn get_device_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    let links = &state.models.device_links;
    links
        .validate_company_for_device_link(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    let link = links
        .retrieve_device_network_type_link(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(link))
}

pub async fn update_device_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<LinkUpdate>,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let models = &state.models;
    models
        .device_links
        .validate_company_for_device_link(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    if let Some(profile_id) = req.device_profile_id.as_deref() {
        models
            .device_profiles
            .validate_company_for_device_profile(ctx.scoped_company(), profile_id)
            .await
            .map_err(model_error)?;
    }
    let link = models
        .device_links
        .update_device_network_type_link(&id, &req)
        .await
        .map_err(model_error)?;
    Ok(ok(link))
}

pub async fn delete_device_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let ctx = require_caller(&state, &headers)?;
    require_company_admin(&ctx)?;
    let links = &state.models.device_links;
    links
        .validate_company_for_device_link(ctx.scoped_company(), &id)
        .await
        .map_err(model_error)?;
    links
        .delete_device_network_type_link(&id)
        .await
        .map_err(model_error)?;
    Ok(ok(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::applications::get_application;
    use crate::handlers::devices::get_device;
    use crate::handlers::testing::{body_json, build_state, vendor};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use lpwan_storage::{NewApplication, NewDevice, NewDeviceProfile};
    use serde_json::json;

    #[tokio::test]
    async fn acme_tracker_dog1_networks() {
        let state = build_state().await;
        let (acme, headers) = vendor(&state, "acme").await;
        let models = &state.models;
        let lora = models
            .network_types
            .ensure_network_type("LoRa")
            .await
            .expect("lora");
        let tracker = models
            .applications
            .create_application(&NewApplication {
                company_id: acme.id.clone(),
                name: "tracker".to_string(),
                ..NewApplication::default()
            })
            .await
            .expect("tracker");
        let dog1 = models
            .devices
            .create_device(&NewDevice {
                application_id: tracker.id.clone(),
                name: "dog1".to_string(),
                ..NewDevice::default()
            })
            .await
            .expect("dog1");
        let profile = models
            .device_profiles
            .create_device_profile(&NewDeviceProfile {
                network_type_id: lora.id.clone(),
                company_id: acme.id.clone(),
                name: "class-a".to_string(),
                ..NewDeviceProfile::default()
            })
            .await
            .expect("profile");

        let response = create_application_link(
            State(state.clone()),
            headers.clone(),
            Json(CreateApplicationLinkRequest {
                application_id: tracker.id.clone(),
                network_type_id: lora.id.clone(),
                network_settings: json!({ "appEUI": "70b3d57ed0000001" }),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let response = create_device_link(
            State(state.clone()),
            headers.clone(),
            Json(CreateDeviceLinkRequest {
                device_id: dog1.id.clone(),
                network_type_id: lora.id.clone(),
                device_profile_id: profile.id.clone(),
                network_settings: json!({ "devEUI": "0080000000000001" }),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_application(State(state.clone()), Path(tracker.id), headers.clone())
            .await
            .into_response();
        let body = body_json(response).await;
        assert_eq!(body["data"]["networks"], json!([lora.id.clone()]));

        let response = get_device(State(state.clone()), Path(dog1.id.clone()), headers.clone())
            .await
            .into_response();
        let body = body_json(response).await;
        assert_eq!(body["data"]["networks"], json!([lora.id.clone()]));

        let response = list_device_links(State(state), headers, Query(ListQuery::default()))
            .await
            .into_response();
        let body = body_json(response).await;
        assert_eq!(body["data"]["totalCount"], 1);
        assert_eq!(
            body["data"]["records"][0]["networkSettings"],
            json!({ "devEUI": "0080000000000001" })
        );
    }

    #[tokio::test]
    async fn duplicate_company_link_is_bad_request() {
        let state = build_state().await;
        let (acme, headers) = vendor(&state, "acme").await;
        let lora = state
            .models
            .network_types
            .ensure_network_type("LoRa")
            .await
            .expect("lora");
        let request = || CreateCompanyLinkRequest {
            company_id: acme.id.clone(),
            network_type_id: lora.id.clone(),
            network_settings: json!({ "region": "US902" }),
        };

        let first = create_company_link(State(state.clone()), headers.clone(), Json(request()))
            .await
            .into_response();
        assert_eq!(first.status(), StatusCode::OK);
        let second = create_company_link(State(state), headers, Json(request()))
            .await
            .into_response();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    }
}
