// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contracts consumed by the domain service. Interfaces live in
//! the domain layer and are implemented in `crate::infrastructure::repositories`.
//!
//! | Trait | Record | Implementations |
//! |-------|--------|----------------|
//! | `AccessRequestRepository` | `AccessRequest` | `InMemoryAccessRequestRepository`, `PostgresAccessRequestRepository` |
//! | `AllowListRepository` | `IpAllowSpec` | `InMemoryAllowListRepository`, `PostgresAllowListRepository` |
//!
//! Absence is always reported as `Ok(None)`, never as a default-valued record.
//!
//! ## Storage Backend Abstraction
//!
//! Concrete implementations are selected at startup from the service
//! configuration (`nas-config.yaml`). In-memory implementations are used for
//! development and testing; PostgreSQL implementations for production.

use async_trait::async_trait;

use crate::domain::access_request::{AccessRequest, AccessRequestId};
use crate::domain::allow_list::{AllowListKey, IpAllowSpec};

/// Storage backend enum for pluggable persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    InMemory,
    PostgreSQL(PostgresConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub connection_string: String,
    pub max_connections: u32,
}

/// Durable log of submitted access requests, keyed by request id.
#[async_trait]
pub trait AccessRequestRepository: Send + Sync {
    /// Persist a new request. Writing the same id twice keeps the first record.
    async fn create(&self, request: &AccessRequest) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &AccessRequestId) -> Result<Option<AccessRequest>, RepositoryError>;
}

/// Read side of the allow list, keyed by (ip, account).
#[async_trait]
pub trait AllowListRepository: Send + Sync {
    async fn find_by_ip_and_account(
        &self,
        key: &AllowListKey,
    ) -> Result<Option<IpAllowSpec>, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                RepositoryError::Serialization(err.to_string())
            }
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}
