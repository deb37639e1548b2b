// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Behaviour of the access request service against in-memory, counting and
//! failing repositories.
//!
//! Covers validation-before-I/O, not-found translation, storage error
//! propagation and concurrent submissions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use nas_core::application::{AccessError, AccessRequestService, ErrorClass, StandardAccessRequestService};
use nas_core::domain::access_request::{AccessRequest, AccessRequestId, RequestStatus};
use nas_core::domain::allow_list::{AccessTerm, AllowListKey, IpAllowSpec, IpAllowSpecDraft};
use nas_core::domain::repository::{AccessRequestRepository, AllowListRepository, RepositoryError};
use nas_core::infrastructure::repositories::{InMemoryAccessRequestRepository, InMemoryAllowListRepository};
use validator::ValidationErrors;

fn draft() -> IpAllowSpecDraft {
    IpAllowSpecDraft {
        ip: "10.0.0.0/24".to_string(),
        kind: "persistent".to_string(),
        account_id: "123456789012".to_string(),
        expiry: None,
        requestor: "alice".to_string(),
        approver: "bob".to_string(),
    }
}

fn has_field(errors: &ValidationErrors, field: &str) -> bool {
    errors.field_errors().contains_key(field)
}

fn in_memory_service() -> (StandardAccessRequestService, InMemoryAllowListRepository) {
    let allow_list = InMemoryAllowListRepository::new();
    let service = StandardAccessRequestService::new(
        Arc::new(InMemoryAccessRequestRepository::new()),
        Arc::new(allow_list.clone()),
    );
    (service, allow_list)
}

/// Counts calls and answers with nothing.
#[derive(Default)]
struct CountingRepository {
    calls: AtomicUsize,
}

impl CountingRepository {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessRequestRepository for CountingRepository {
    async fn create(&self, _request: &AccessRequest) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_by_id(&self, _id: &AccessRequestId) -> Result<Option<AccessRequest>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

#[async_trait]
impl AllowListRepository for CountingRepository {
    async fn find_by_ip_and_account(&self, _key: &AllowListKey) -> Result<Option<IpAllowSpec>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

/// Fails every call with a database error.
struct FailingRepository;

#[async_trait]
impl AccessRequestRepository for FailingRepository {
    async fn create(&self, _request: &AccessRequest) -> Result<(), RepositoryError> {
        Err(RepositoryError::Database("connection refused".to_string()))
    }

    async fn find_by_id(&self, _id: &AccessRequestId) -> Result<Option<AccessRequest>, RepositoryError> {
        Err(RepositoryError::Database("connection refused".to_string()))
    }
}

#[async_trait]
impl AllowListRepository for FailingRepository {
    async fn find_by_ip_and_account(&self, _key: &AllowListKey) -> Result<Option<IpAllowSpec>, RepositoryError> {
        Err(RepositoryError::Database("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_submit_then_get_returns_pending_record() {
    let (service, _) = in_memory_service();
    let expected = draft().to_spec().unwrap();

    let id = service.submit_access_request(draft()).await.unwrap();
    assert!(!id.as_str().is_empty());

    let request = service.get_access_request(id.as_str()).await.unwrap();
    assert_eq!(request.id(), &id);
    assert_eq!(request.status(), RequestStatus::Pending);
    assert_eq!(request.ip_spec(), &expected);
}

#[tokio::test]
async fn test_persistent_spec_needs_no_expiry() {
    let (service, _) = in_memory_service();

    for expiry in [None, Some(json!(0)), Some(json!(""))] {
        let mut d = draft();
        d.expiry = expiry;
        assert!(service.submit_access_request(d).await.is_ok());
    }
}

#[tokio::test]
async fn test_time_bounded_spec_requires_numeric_expiry() {
    let (service, _) = in_memory_service();

    for expiry in [None, Some(json!("next-week")), Some(json!(1.5))] {
        let mut d = draft();
        d.kind = "time-bounded".to_string();
        d.expiry = expiry;

        match service.submit_access_request(d).await {
            Err(AccessError::Validation(errors)) => assert!(has_field(&errors, "expiry")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    let mut d = draft();
    d.kind = "time-bounded".to_string();
    d.expiry = Some(json!(1767225600));
    let id = service.submit_access_request(d).await.unwrap();
    let request = service.get_access_request(id.as_str()).await.unwrap();
    assert_eq!(request.ip_spec().term, AccessTerm::TimeBounded { expiry: 1767225600 });
}

#[tokio::test]
async fn test_invalid_cidr_never_reaches_storage() {
    let requests = Arc::new(CountingRepository::default());
    let allow_list = Arc::new(CountingRepository::default());
    let service = StandardAccessRequestService::new(requests.clone(), allow_list.clone());

    for ip in [
        "10.0.0.0",
        "10.0.0.0/40",
        "300.1.1.1/8",
        "fe80::/10",
        "",
        "10.0.0.0/255.255.255.0",
        "10.0.0.0/+24",
        "10.0.0.0/024",
    ] {
        let mut d = draft();
        d.ip = ip.to_string();

        let err = service.submit_access_request(d).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::BadInput, "submit with ip {ip:?}");

        let err = service.lookup_allowed_ip(ip, "123456").await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::BadInput, "lookup with ip {ip:?}");
    }

    assert_eq!(requests.calls(), 0);
    assert_eq!(allow_list.calls(), 0);
}

#[tokio::test]
async fn test_stored_snapshot_keeps_submitted_ip_text() {
    let (service, _) = in_memory_service();

    for ip in ["10.0.0.0/24", "10.0.0.7/24", "0.0.0.0/0"] {
        let mut d = draft();
        d.ip = ip.to_string();
        let id = service.submit_access_request(d).await.unwrap();

        let request = service.get_access_request(id.as_str()).await.unwrap();
        assert_eq!(request.ip_spec().ip.to_string(), ip);
    }

    let mut d = draft();
    d.ip = "10.0.0.0/255.255.255.0".to_string();
    let AccessError::Validation(errors) = service.submit_access_request(d).await.unwrap_err() else {
        panic!("expected validation error");
    };
    assert!(has_field(&errors, "ip"));
}

#[tokio::test]
async fn test_validation_reports_every_bad_field() {
    let (service, _) = in_memory_service();

    let err = service
        .submit_access_request(IpAllowSpecDraft::default())
        .await
        .unwrap_err();

    let AccessError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    for field in ["ip", "type", "accountId", "requestor", "approver"] {
        assert!(has_field(&errors, field), "missing {field}");
    }
}

#[tokio::test]
async fn test_empty_request_id_is_validation_error() {
    let requests = Arc::new(CountingRepository::default());
    let service = StandardAccessRequestService::new(requests.clone(), Arc::new(CountingRepository::default()));

    let err = service.get_access_request("").await.unwrap_err();
    assert!(matches!(err, AccessError::Validation(_)));
    assert_eq!(requests.calls(), 0);
}

#[tokio::test]
async fn test_unknown_request_id_is_not_found() {
    let (service, _) = in_memory_service();

    let err = service.get_access_request("does-not-exist").await.unwrap_err();
    assert!(matches!(err, AccessError::RequestNotFound(ref id) if id.as_str() == "does-not-exist"));
    assert_eq!(err.class(), ErrorClass::NotFound);
}

#[tokio::test]
async fn test_lookup_on_empty_store_is_ip_not_found() {
    let (service, _) = in_memory_service();

    let err = service.lookup_allowed_ip("10.0.0.0/24", "123456").await.unwrap_err();
    assert!(matches!(err, AccessError::IpNotFound(_)));
    assert_eq!(err.class(), ErrorClass::NotFound);
}

#[tokio::test]
async fn test_lookup_returns_stored_entry() {
    let (service, allow_list) = in_memory_service();
    let entry = draft().to_spec().unwrap();
    allow_list.upsert(entry.clone()).await;

    let found = service.lookup_allowed_ip("10.0.0.0/24", "123456789012").await.unwrap();
    assert_eq!(found, entry);

    let err = service.lookup_allowed_ip("10.0.0.0/24", "999").await.unwrap_err();
    assert!(matches!(err, AccessError::IpNotFound(_)));
}

#[tokio::test]
async fn test_lookup_rejects_non_numeric_account() {
    let (service, _) = in_memory_service();

    let AccessError::Validation(errors) = service.lookup_allowed_ip("10.0.0.0/24", "acct-1").await.unwrap_err() else {
        panic!("expected validation error");
    };
    assert!(has_field(&errors, "accountId"));
    assert!(!has_field(&errors, "ip"));
}

#[tokio::test]
async fn test_storage_failures_propagate() {
    let service = StandardAccessRequestService::new(Arc::new(FailingRepository), Arc::new(FailingRepository));

    let err = service.submit_access_request(draft()).await.unwrap_err();
    assert!(matches!(err, AccessError::Storage(RepositoryError::Database(_))));
    assert_eq!(err.class(), ErrorClass::Internal);

    let err = service.get_access_request("some-id").await.unwrap_err();
    assert!(matches!(err, AccessError::Storage(_)));

    let err = service.lookup_allowed_ip("10.0.0.0/24", "123456").await.unwrap_err();
    assert!(matches!(err, AccessError::Storage(_)));
}

#[tokio::test]
async fn test_validation_wins_over_storage_failure() {
    let service = StandardAccessRequestService::new(Arc::new(FailingRepository), Arc::new(FailingRepository));

    assert!(matches!(service.get_access_request("").await, Err(AccessError::Validation(_))));
    assert!(matches!(
        service.lookup_allowed_ip("nope", "123").await,
        Err(AccessError::Validation(_))
    ));
}

#[tokio::test]
async fn test_concurrent_identical_submissions_get_distinct_ids() {
    let (service, _) = in_memory_service();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.submit_access_request(draft()).await })
        })
        .collect();

    let ids: Vec<AccessRequestId> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());

    for id in &ids {
        let request = service.get_access_request(id.as_str()).await.unwrap();
        assert_eq!(request.id(), id);
    }
}

#[tokio::test]
async fn test_health_check_succeeds() {
    let (service, _) = in_memory_service();
    assert!(service.health_check().await.is_ok());
}
