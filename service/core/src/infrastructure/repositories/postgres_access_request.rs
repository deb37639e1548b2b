// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Postgres Access Request
//!
//! Request log stored in `ip_access_requests`. The allow-list snapshot is kept
//! as JSONB so the record reads back exactly as it was submitted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::access_request::{AccessRequest, AccessRequestId, RequestStatus};
use crate::domain::allow_list::IpAllowSpec;
use crate::domain::repository::{AccessRequestRepository, RepositoryError};

pub struct PostgresAccessRequestRepository {
    pool: PgPool,
}

impl PostgresAccessRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessRequestRepository for PostgresAccessRequestRepository {
    async fn create(&self, request: &AccessRequest) -> Result<(), RepositoryError> {
        let ip_spec_json = serde_json::to_value(request.ip_spec())?;

        sqlx::query(
            r#"
            INSERT INTO ip_access_requests (id, ip_spec, status, requested_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(request.id().as_str())
        .bind(ip_spec_json)
        .bind(request.status().as_str())
        .bind(request.requested_at())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to save access request: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &AccessRequestId) -> Result<Option<AccessRequest>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, ip_spec, status, requested_at
            FROM ip_access_requests
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.map(parse_access_request_row).transpose()
    }
}

fn parse_access_request_row(row: PgRow) -> Result<AccessRequest, RepositoryError> {
    let id: String = row.try_get("id")?;
    let ip_spec_val: serde_json::Value = row.try_get("ip_spec")?;
    let status: String = row.try_get("status")?;
    let requested_at: DateTime<Utc> = row.try_get("requested_at")?;

    let id = AccessRequestId::parse(&id)
        .map_err(|e| RepositoryError::Serialization(format!("Invalid request id: {}", e)))?;

    let ip_spec: IpAllowSpec = serde_json::from_value(ip_spec_val)
        .map_err(|e| RepositoryError::Serialization(format!("Failed to deserialize ip_spec: {}", e)))?;

    let status: RequestStatus = status
        .parse()
        .map_err(|e| RepositoryError::Serialization(format!("{}", e)))?;

    Ok(AccessRequest::restore(id, ip_spec, status, requested_at))
}
