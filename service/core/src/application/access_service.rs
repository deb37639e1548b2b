// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Access Request Service
//!
//! Orchestrates validation and the two repositories. Every operation
//! validates its input before touching storage, and turns a repository
//! `Ok(None)` into the matching not-found error.
//!
//! The service holds only `Arc` handles to its repositories, so one instance
//! is shared by every concurrent HTTP request. It adds no retries, timeouts or
//! caching of its own.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::access_request::{AccessRequest, AccessRequestId};
use crate::domain::allow_list::{AllowListKey, IpAllowSpec, IpAllowSpecDraft};
use crate::domain::repository::{AccessRequestRepository, AllowListRepository, RepositoryError};
use crate::domain::validation::summarize;

const SUBMITTED_TOTAL: &str = "nas_access_requests_submitted_total";
const REQUEST_LOOKUPS_TOTAL: &str = "nas_access_request_lookups_total";
const ALLOW_LIST_LOOKUPS_TOTAL: &str = "nas_allow_list_lookups_total";

/// Coarse error class used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    BadInput,
    NotFound,
    Internal,
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("validation failed: {}", summarize(.0))]
    Validation(#[from] ValidationErrors),

    #[error("access request '{0}' not found")]
    RequestNotFound(AccessRequestId),

    #[error("no allow-list entry for ip {} in account {}", .0.ip, .0.account_id)]
    IpNotFound(AllowListKey),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl AccessError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AccessError::Validation(_) => ErrorClass::BadInput,
            AccessError::RequestNotFound(_) | AccessError::IpNotFound(_) => ErrorClass::NotFound,
            AccessError::Storage(_) => ErrorClass::Internal,
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            AccessError::Validation(_) => "invalid",
            AccessError::RequestNotFound(_) | AccessError::IpNotFound(_) => "not_found",
            AccessError::Storage(_) => "storage_error",
        }
    }
}

#[async_trait]
pub trait AccessRequestService: Send + Sync {
    /// Validates the draft and records a new pending request.
    async fn submit_access_request(&self, draft: IpAllowSpecDraft) -> Result<AccessRequestId, AccessError>;

    async fn get_access_request(&self, request_id: &str) -> Result<AccessRequest, AccessError>;

    async fn lookup_allowed_ip(&self, ip: &str, account_id: &str) -> Result<IpAllowSpec, AccessError>;

    /// Readiness check. Always succeeds for the standard service.
    async fn health_check(&self) -> Result<(), AccessError>;
}

pub struct StandardAccessRequestService {
    requests: Arc<dyn AccessRequestRepository>,
    allow_list: Arc<dyn AllowListRepository>,
}

impl StandardAccessRequestService {
    pub fn new(
        requests: Arc<dyn AccessRequestRepository>,
        allow_list: Arc<dyn AllowListRepository>,
    ) -> Self {
        Self { requests, allow_list }
    }
}

/// Registers counter descriptions with the installed recorder.
pub fn describe_metrics() {
    metrics::describe_counter!(SUBMITTED_TOTAL, "Access requests submitted, by outcome");
    metrics::describe_counter!(REQUEST_LOOKUPS_TOTAL, "Access request lookups by id, by outcome");
    metrics::describe_counter!(ALLOW_LIST_LOOKUPS_TOTAL, "Allow-list lookups by ip and account, by outcome");
}

fn record<T>(name: &'static str, result: &Result<T, AccessError>, success: &'static str) {
    let outcome = match result {
        Ok(_) => success,
        Err(e) => e.outcome(),
    };
    counter!(name, "outcome" => outcome).increment(1);
}

impl StandardAccessRequestService {
    async fn submit(&self, draft: IpAllowSpecDraft) -> Result<AccessRequestId, AccessError> {
        let ip_spec = draft.to_spec()?;
        let request = AccessRequest::new(ip_spec);

        if let Err(e) = self.requests.create(&request).await {
            tracing::error!(request_id = %request.id(), error = %e, "Failed to persist access request");
            return Err(e.into());
        }

        tracing::info!(
            request_id = %request.id(),
            ip = %request.ip_spec().ip,
            account_id = %request.ip_spec().account_id,
            kind = request.ip_spec().kind(),
            "Access request submitted"
        );
        Ok(request.id().clone())
    }

    async fn find_request(&self, request_id: &str) -> Result<AccessRequest, AccessError> {
        let id = AccessRequestId::parse(request_id)?;
        match self.requests.find_by_id(&id).await {
            Ok(Some(request)) => Ok(request),
            Ok(None) => Err(AccessError::RequestNotFound(id)),
            Err(e) => {
                tracing::error!(request_id = %id, error = %e, "Failed to load access request");
                Err(e.into())
            }
        }
    }

    async fn find_allowed_ip(&self, ip: &str, account_id: &str) -> Result<IpAllowSpec, AccessError> {
        let key = AllowListKey::parse(ip, account_id)?;
        match self.allow_list.find_by_ip_and_account(&key).await {
            Ok(Some(spec)) => Ok(spec),
            Ok(None) => Err(AccessError::IpNotFound(key)),
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to query allow list");
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl AccessRequestService for StandardAccessRequestService {
    async fn submit_access_request(&self, draft: IpAllowSpecDraft) -> Result<AccessRequestId, AccessError> {
        let result = self.submit(draft).await;
        if let Err(AccessError::Validation(e)) = &result {
            tracing::debug!(violations = %summarize(e), "Rejected access request");
        }
        record(SUBMITTED_TOTAL, &result, "accepted");
        result
    }

    async fn get_access_request(&self, request_id: &str) -> Result<AccessRequest, AccessError> {
        let result = self.find_request(request_id).await;
        record(REQUEST_LOOKUPS_TOTAL, &result, "found");
        result
    }

    async fn lookup_allowed_ip(&self, ip: &str, account_id: &str) -> Result<IpAllowSpec, AccessError> {
        let result = self.find_allowed_ip(ip, account_id).await;
        record(ALLOW_LIST_LOOKUPS_TOTAL, &result, "found");
        result
    }

    async fn health_check(&self) -> Result<(), AccessError> {
        Ok(())
    }
}
