// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Access Request Aggregate
//!
//! A record of one submission asking for an [`IpAllowSpec`] to be added to
//! the allow list. The id and timestamp are assigned once at creation by the
//! domain service; the status starts at [`RequestStatus::Pending`] and is only
//! ever changed by out-of-band approval processes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::domain::allow_list::IpAllowSpec;
use crate::domain::validation::{single, validate_required};

/// Opaque request identifier. Generated ids are UUID v4 strings, but ids
/// read back from storage are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessRequestId(String);

impl AccessRequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Validates a caller-supplied id. Only presence is checked.
    pub fn parse(raw: &str) -> Result<Self, ValidationErrors> {
        validate_required(raw).map_err(|e| single("requestId", e))?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Completed,
    Failed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Completed => "Completed",
            RequestStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown request status '{0}'")]
pub struct UnknownStatus(String);

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(RequestStatus::Pending),
            "Completed" => Ok(RequestStatus::Completed),
            "Failed" => Ok(RequestStatus::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    id: AccessRequestId,
    ip_spec: IpAllowSpec,
    status: RequestStatus,
    requested_at: DateTime<Utc>,
}

impl AccessRequest {
    /// New pending request with a freshly generated id. The timestamp is
    /// kept at microsecond precision, the finest any store keeps.
    pub fn new(ip_spec: IpAllowSpec) -> Self {
        Self {
            id: AccessRequestId::generate(),
            ip_spec,
            status: RequestStatus::Pending,
            requested_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Rehydrates a stored request.
    pub fn restore(
        id: AccessRequestId,
        ip_spec: IpAllowSpec,
        status: RequestStatus,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            ip_spec,
            status,
            requested_at,
        }
    }

    pub fn id(&self) -> &AccessRequestId {
        &self.id
    }

    pub fn ip_spec(&self) -> &IpAllowSpec {
        &self.ip_spec
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allow_list::IpAllowSpecDraft;

    fn spec() -> IpAllowSpec {
        IpAllowSpecDraft {
            ip: "10.1.0.0/16".to_string(),
            kind: "persistent".to_string(),
            account_id: "111122223333".to_string(),
            expiry: None,
            requestor: "alice".to_string(),
            approver: "bob".to_string(),
        }
        .to_spec()
        .unwrap()
    }

    #[test]
    fn test_new_request_is_pending_with_generated_id() {
        let a = AccessRequest::new(spec());
        let b = AccessRequest::new(spec());

        assert_eq!(a.status(), RequestStatus::Pending);
        assert!(!a.id().as_str().is_empty());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.ip_spec(), b.ip_spec());
    }

    #[test]
    fn test_requested_at_has_microsecond_precision() {
        let request = AccessRequest::new(spec());
        assert_eq!(request.requested_at().timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_parse_rejects_blank_id() {
        let errors = AccessRequestId::parse("").unwrap_err();
        assert!(errors.field_errors().contains_key("requestId"));
        assert!(AccessRequestId::parse("  ").is_err());
        assert_eq!(AccessRequestId::parse("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [RequestStatus::Pending, RequestStatus::Completed, RequestStatus::Failed] {
            assert_eq!(status.as_str().parse::<RequestStatus>().unwrap(), status);
        }
        assert!("Approved".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_wire_shape() {
        let request = AccessRequest::new(spec());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["id"], request.id().as_str());
        assert_eq!(value["status"], "Pending");
        assert_eq!(value["ipSpec"]["ip"], "10.1.0.0/16");
        assert!(value["requestedAt"].is_string());
    }
}
