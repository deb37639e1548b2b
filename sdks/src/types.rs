// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Wire types shared with the service.

use serde::{Deserialize, Serialize};

pub use nas_core::domain::access_request::{AccessRequest, AccessRequestId, RequestStatus};
pub use nas_core::domain::allow_list::{AccessTerm, AccountId, IpAllowSpec, IpAllowSpecDraft, Ipv4Cidr};
pub use nas_core::domain::validation::FieldViolation;
pub use nas_core::presentation::api::{
    AccessRequestResponse, HealthResponse, IpSpecResponse, SubmitAccessRequest, SubmitAccessResponse,
};

/// Error body returned by the service for any non-2xx status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: String,

    #[serde(default)]
    pub violations: Vec<FieldViolation>,
}
