// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Postgres Allow List
//!
//! Read side of `ip_allow_list`, one row per (ip, account_id). Rows are
//! written by the approval pipeline, which lives outside this service.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::allow_list::{AccessTerm, AccountId, AllowListKey, IpAllowSpec, Ipv4Cidr};
use crate::domain::repository::{AllowListRepository, RepositoryError};

pub struct PostgresAllowListRepository {
    pool: PgPool,
}

impl PostgresAllowListRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Adds or replaces an entry. Used for seeding and tests.
    pub async fn upsert(&self, spec: &IpAllowSpec) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO ip_allow_list (ip, account_id, kind, expiry, requestor, approver)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (ip, account_id) DO UPDATE SET
                kind = EXCLUDED.kind,
                expiry = EXCLUDED.expiry,
                requestor = EXCLUDED.requestor,
                approver = EXCLUDED.approver
            "#,
        )
        .bind(spec.ip.to_string())
        .bind(spec.account_id.as_str())
        .bind(spec.kind())
        .bind(spec.expiry())
        .bind(&spec.requestor)
        .bind(&spec.approver)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to save allow-list entry: {}", e)))?;

        Ok(())
    }

    pub async fn remove(&self, key: &AllowListKey) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM ip_allow_list WHERE ip = $1 AND account_id = $2")
            .bind(key.ip.to_string())
            .bind(key.account_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AllowListRepository for PostgresAllowListRepository {
    async fn find_by_ip_and_account(
        &self,
        key: &AllowListKey,
    ) -> Result<Option<IpAllowSpec>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT ip, account_id, kind, expiry, requestor, approver
            FROM ip_allow_list
            WHERE ip = $1 AND account_id = $2
            "#,
        )
        .bind(key.ip.to_string())
        .bind(key.account_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.map(parse_allow_list_row).transpose()
    }
}

fn parse_allow_list_row(row: PgRow) -> Result<IpAllowSpec, RepositoryError> {
    let ip: String = row.try_get("ip")?;
    let account_id: String = row.try_get("account_id")?;
    let kind: String = row.try_get("kind")?;
    let expiry: Option<i64> = row.try_get("expiry")?;
    let requestor: String = row.try_get("requestor")?;
    let approver: String = row.try_get("approver")?;

    let ip = Ipv4Cidr::parse(&ip).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    let account_id =
        AccountId::parse(&account_id).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    let term = AccessTerm::from_parts(&kind, expiry).ok_or_else(|| {
        RepositoryError::Serialization(format!(
            "Invalid access term: kind '{}' with expiry {:?}",
            kind, expiry
        ))
    })?;

    Ok(IpAllowSpec {
        ip,
        term,
        account_id,
        requestor,
        approver,
    })
}
