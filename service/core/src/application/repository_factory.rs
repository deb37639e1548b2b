// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Creates concrete repository implementations from the storage backend
//! configuration, keeping the domain layer free of infrastructure types.

use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;

use crate::domain::allow_list::IpAllowSpec;
use crate::domain::repository::{AccessRequestRepository, AllowListRepository, StorageBackend};
use crate::infrastructure::db::Database;
use crate::infrastructure::repositories::{
    InMemoryAccessRequestRepository, InMemoryAllowListRepository, PostgresAccessRequestRepository,
    PostgresAllowListRepository,
};

/// Repository handles injected into the access request service.
#[derive(Clone)]
pub struct Repositories {
    pub access_requests: Arc<dyn AccessRequestRepository>,
    pub allow_list: Arc<dyn AllowListRepository>,
}

/// Creates an AccessRequestRepository implementation based on the configured backend
pub fn create_access_request_repository(
    backend: &StorageBackend,
    pool: Option<PgPool>,
) -> Result<Arc<dyn AccessRequestRepository>> {
    match (backend, pool) {
        (StorageBackend::InMemory, _) => Ok(Arc::new(InMemoryAccessRequestRepository::new())),
        (StorageBackend::PostgreSQL(_), Some(pool)) => Ok(Arc::new(PostgresAccessRequestRepository::new(pool))),
        (StorageBackend::PostgreSQL(_), None) => anyhow::bail!("PostgreSQL backend requires a connection pool"),
    }
}

/// Creates an AllowListRepository implementation based on the configured backend.
/// Seed entries only apply to the in-memory store.
pub fn create_allow_list_repository(
    backend: &StorageBackend,
    pool: Option<PgPool>,
    seed: Vec<IpAllowSpec>,
) -> Result<Arc<dyn AllowListRepository>> {
    match (backend, pool) {
        (StorageBackend::InMemory, _) => Ok(Arc::new(InMemoryAllowListRepository::with_entries(seed))),
        (StorageBackend::PostgreSQL(_), Some(pool)) => {
            if !seed.is_empty() {
                tracing::warn!(
                    entries = seed.len(),
                    "seed_allow_list is ignored for the postgres backend"
                );
            }
            Ok(Arc::new(PostgresAllowListRepository::new(pool)))
        }
        (StorageBackend::PostgreSQL(_), None) => anyhow::bail!("PostgreSQL backend requires a connection pool"),
    }
}

/// Connects to the configured backend and builds both repositories.
pub async fn build_repositories(backend: &StorageBackend, seed: Vec<IpAllowSpec>) -> Result<Repositories> {
    let pool = match backend {
        StorageBackend::InMemory => {
            tracing::info!(seeded = seed.len(), "Using in-memory storage");
            None
        }
        StorageBackend::PostgreSQL(config) => {
            tracing::info!(max_connections = config.max_connections, "Connecting to PostgreSQL");
            Some(Database::new(config).await?.get_pool().clone())
        }
    };

    Ok(Repositories {
        access_requests: create_access_request_repository(backend, pool.clone())?,
        allow_list: create_allow_list_repository(backend, pool, seed)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allow_list::{AllowListKey, IpAllowSpecDraft};
    use crate::domain::repository::PostgresConfig;

    #[tokio::test]
    async fn test_in_memory_backend_is_seeded() {
        let seed = IpAllowSpecDraft {
            ip: "10.0.0.0/8".to_string(),
            kind: "persistent".to_string(),
            account_id: "99".to_string(),
            expiry: None,
            requestor: "ops".to_string(),
            approver: "secops".to_string(),
        }
        .to_spec()
        .unwrap();

        let repos = build_repositories(&StorageBackend::InMemory, vec![seed]).await.unwrap();
        let key = AllowListKey::parse("10.0.0.0/8", "99").unwrap();
        assert!(repos.allow_list.find_by_ip_and_account(&key).await.unwrap().is_some());
    }

    #[test]
    fn test_postgres_backend_without_pool_fails() {
        let backend = StorageBackend::PostgreSQL(PostgresConfig {
            connection_string: "postgres://localhost/nas".to_string(),
            max_connections: 1,
        });
        assert!(create_access_request_repository(&backend, None).is_err());
        assert!(create_allow_list_repository(&backend, None, vec![]).is_err());
    }
}
