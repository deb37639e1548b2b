// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the repository traits defined in
//! `crate::domain::repository`.
//!
//! # Available Implementations
//!
//! ## PostgreSQL Repositories
//!
//! - **PostgresAccessRequestRepository** - `ip_access_requests` table
//! - **PostgresAllowListRepository** - `ip_allow_list` table
//!
//! ## In-Memory Repositories
//!
//! HashMap-backed storage for development and tests:
//! - **InMemoryAccessRequestRepository** - Ephemeral request log
//! - **InMemoryAllowListRepository** - Allow list, writable through `upsert` / `remove`
//!
//! # Usage
//!
//! ```no_run
//! # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//! use nas_core::domain::allow_list::AllowListKey;
//! use nas_core::domain::repository::AllowListRepository;
//! use nas_core::infrastructure::repositories::postgres_allow_list::PostgresAllowListRepository;
//!
//! let repo = PostgresAllowListRepository::new(pool);
//! let key = AllowListKey::parse("10.0.0.0/24", "123456789012")?;
//! let entry = repo.find_by_ip_and_account(&key).await?;
//! # Ok(())
//! # }
//! ```

pub mod postgres_access_request;
pub mod postgres_allow_list;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::access_request::{AccessRequest, AccessRequestId};
use crate::domain::allow_list::{AllowListKey, IpAllowSpec};
use crate::domain::repository::{AccessRequestRepository, AllowListRepository, RepositoryError};

pub use postgres_access_request::PostgresAccessRequestRepository;
pub use postgres_allow_list::PostgresAllowListRepository;

#[derive(Clone, Default)]
pub struct InMemoryAccessRequestRepository {
    requests: Arc<RwLock<HashMap<AccessRequestId, AccessRequest>>>,
}

impl InMemoryAccessRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.requests.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.requests.read().await.is_empty()
    }
}

#[async_trait]
impl AccessRequestRepository for InMemoryAccessRequestRepository {
    async fn create(&self, request: &AccessRequest) -> Result<(), RepositoryError> {
        let mut requests = self.requests.write().await;
        requests
            .entry(request.id().clone())
            .or_insert_with(|| request.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AccessRequestId) -> Result<Option<AccessRequest>, RepositoryError> {
        let requests = self.requests.read().await;
        Ok(requests.get(id).cloned())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAllowListRepository {
    entries: Arc<RwLock<HashMap<AllowListKey, IpAllowSpec>>>,
}

impl InMemoryAllowListRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = IpAllowSpec>) -> Self {
        let entries = entries.into_iter().map(|spec| (spec.key(), spec)).collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Adds or replaces the entry keyed by its (ip, account) pair.
    pub async fn upsert(&self, spec: IpAllowSpec) {
        self.entries.write().await.insert(spec.key(), spec);
    }

    pub async fn remove(&self, key: &AllowListKey) -> Option<IpAllowSpec> {
        self.entries.write().await.remove(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl AllowListRepository for InMemoryAllowListRepository {
    async fn find_by_ip_and_account(
        &self,
        key: &AllowListKey,
    ) -> Result<Option<IpAllowSpec>, RepositoryError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }
}
