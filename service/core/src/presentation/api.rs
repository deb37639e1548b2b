// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # HTTP API
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | GET | `/nas/api/v2/healthz` | `{"status":"healthy","uptimeSeconds":n}` |
//! | POST | `/nas/api/v2/request` | `{"id":"..."}` |
//! | GET | `/nas/api/v2/request/findByRequestId?requestId=` | `{"accessRequest":{..}}` |
//! | GET | `/nas/api/v2/allowlist/findIpAddressByIp?ipAddress=&accountId=` | `{"ipSpec":{..}}` |
//!
//! Errors are `{"error": "..."}` with 400 for bad input, 404 for unknown
//! records and 500 for storage failures. Validation failures also carry a
//! `violations` list.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::application::access_service::{AccessError, AccessRequestService, ErrorClass};
use crate::domain::access_request::AccessRequest;
use crate::domain::allow_list::{IpAllowSpec, IpAllowSpecDraft};
use crate::domain::validation::{summarize, violations};

pub const API_PREFIX: &str = "/nas/api/v2";

pub struct AppState {
    pub service: Arc<dyn AccessRequestService>,
    pub started_at: Instant,
}

pub fn app(service: Arc<dyn AccessRequestService>) -> Router {
    let state = Arc::new(AppState {
        service,
        started_at: Instant::now(),
    });

    let routes = Router::new()
        .route("/healthz", get(health))
        .route("/request", post(submit_access_request))
        .route("/request/findByRequestId", get(find_access_request))
        .route("/allowlist/findIpAddressByIp", get(find_allowed_ip));

    Router::new()
        .nest(API_PREFIX, routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAccessRequest {
    #[serde(default, alias = "ipAddress")]
    pub ip_spec: IpAllowSpecDraft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAccessResponse {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindRequestParams {
    #[serde(default)]
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequestResponse {
    pub access_request: AccessRequest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindIpParams {
    #[serde(default)]
    pub ip_address: String,

    #[serde(default, alias = "awsAccountId")]
    pub account_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpSpecResponse {
    pub ip_spec: IpAllowSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
}

/// Error responses produced by the handlers.
#[derive(Debug)]
pub enum ApiError {
    Access(AccessError),
    MalformedRequest(String),
    Unavailable(String),
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        ApiError::Access(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Access(AccessError::Validation(errors)) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": format!("validation failed: {}", summarize(&errors)),
                    "violations": violations(&errors),
                }),
            ),
            ApiError::Access(err) => match err.class() {
                ErrorClass::BadInput => (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() })),
                ErrorClass::NotFound => (StatusCode::NOT_FOUND, json!({ "error": err.to_string() })),
                ErrorClass::Internal => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal storage error" }),
                ),
            },
            ApiError::MalformedRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            ApiError::Unavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "status": "unhealthy", "error": message }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    state
        .service
        .health_check()
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

async fn submit_access_request(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitAccessRequest>, JsonRejection>,
) -> Result<Json<SubmitAccessResponse>, ApiError> {
    let Json(payload) = payload?;
    let id = state.service.submit_access_request(payload.ip_spec).await?;

    Ok(Json(SubmitAccessResponse { id: id.to_string() }))
}

async fn find_access_request(
    State(state): State<Arc<AppState>>,
    params: Result<Query<FindRequestParams>, QueryRejection>,
) -> Result<Json<AccessRequestResponse>, ApiError> {
    let Query(params) = params?;
    let access_request = state.service.get_access_request(&params.request_id).await?;

    Ok(Json(AccessRequestResponse { access_request }))
}

async fn find_allowed_ip(
    State(state): State<Arc<AppState>>,
    params: Result<Query<FindIpParams>, QueryRejection>,
) -> Result<Json<IpSpecResponse>, ApiError> {
    let Query(params) = params?;
    let ip_spec = state
        .service
        .lookup_allowed_ip(&params.ip_address, &params.account_id)
        .await?;

    Ok(Json(IpSpecResponse { ip_spec }))
}
