// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::types::{
    AccessRequest, AccessRequestId, AccessRequestResponse, ErrorBody, FieldViolation, HealthResponse,
    IpAllowSpec, IpAllowSpecDraft, IpSpecResponse, SubmitAccessRequest, SubmitAccessResponse,
};

const API_PREFIX: &str = "nas/api/v2";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
        violations: Vec<FieldViolation>,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Client for the network access service.
#[derive(Clone)]
pub struct NasClient {
    base_url: Url,
    client: Client,
}

impl NasClient {
    /// Create a client for a service root such as `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            client: Client::new(),
        })
    }

    /// Use a preconfigured reqwest client (timeouts, proxies, TLS).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(&format!("{}/{}", API_PREFIX, path))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    /// Check the service health endpoint.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.client.get(self.endpoint("healthz")?).send().await?;
        decode(response).await
    }

    /// Submit a request to allow an IP range for an account.
    pub async fn submit_access_request(&self, ip_spec: IpAllowSpecDraft) -> Result<AccessRequestId, ClientError> {
        let body = SubmitAccessRequest { ip_spec };
        let response = self.client.post(self.endpoint("request")?).json(&body).send().await?;
        let submitted: SubmitAccessResponse = decode(response).await?;

        AccessRequestId::parse(&submitted.id)
            .map_err(|_| ClientError::Decode("service returned an empty request id".to_string()))
    }

    /// Fetch a previously submitted request.
    pub async fn get_access_request(&self, request_id: &str) -> Result<AccessRequest, ClientError> {
        let mut url = self.endpoint("request/findByRequestId")?;
        url.query_pairs_mut().append_pair("requestId", request_id);

        let response = self.client.get(url).send().await?;
        let found: AccessRequestResponse = decode(response).await?;
        Ok(found.access_request)
    }

    /// Look up the allow-list entry for an (ip, account) pair.
    pub async fn lookup_allowed_ip(&self, ip: &str, account_id: &str) -> Result<IpAllowSpec, ClientError> {
        let mut url = self.endpoint("allowlist/findIpAddressByIp")?;
        url.query_pairs_mut()
            .append_pair("ipAddress", ip)
            .append_pair("accountId", account_id);

        let response = self.client.get(url).send().await?;
        let found: IpSpecResponse = decode(response).await?;
        Ok(found.ip_spec)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()));
    }

    let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_else(|_| ErrorBody {
        error: String::from_utf8_lossy(&bytes).into_owned(),
        violations: vec![],
    });

    Err(match status {
        StatusCode::BAD_REQUEST => ClientError::InvalidInput {
            message: body.error,
            violations: body.violations,
        },
        StatusCode::NOT_FOUND => ClientError::NotFound(body.error),
        _ => ClientError::Server {
            status: status.as_u16(),
            message: body.error,
        },
    })
}
