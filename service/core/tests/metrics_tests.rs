// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Outcome counters emitted by the access request service.
//!
//! The recorder is thread-local, so the service runs on a current-thread
//! runtime inside `with_local_recorder`.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;

use nas_core::application::{AccessRequestService, StandardAccessRequestService};
use nas_core::domain::allow_list::IpAllowSpecDraft;
use nas_core::infrastructure::repositories::{InMemoryAccessRequestRepository, InMemoryAllowListRepository};

fn draft(ip: &str) -> IpAllowSpecDraft {
    IpAllowSpecDraft {
        ip: ip.to_string(),
        kind: "persistent".to_string(),
        account_id: "123456789012".to_string(),
        expiry: None,
        requestor: "alice".to_string(),
        approver: "bob".to_string(),
    }
}

#[test]
fn test_service_counts_each_outcome() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let allow_list = InMemoryAllowListRepository::with_entries(vec![draft("10.0.0.0/24").to_spec().unwrap()]);
    let service = StandardAccessRequestService::new(
        Arc::new(InMemoryAccessRequestRepository::new()),
        Arc::new(allow_list),
    );

    metrics::with_local_recorder(&recorder, || {
        runtime.block_on(async {
            let id = service.submit_access_request(draft("10.1.0.0/16")).await.unwrap();
            service.submit_access_request(draft("10.1.0.0/255.255.0.0")).await.unwrap_err();
            service.submit_access_request(draft("10.1.0.0/+16")).await.unwrap_err();

            service.get_access_request(id.as_str()).await.unwrap();
            service.get_access_request("").await.unwrap_err();
            service.get_access_request("unknown").await.unwrap_err();

            service.lookup_allowed_ip("10.0.0.0/24", "123456789012").await.unwrap();
            service.lookup_allowed_ip("10.0.0.0/24", "1").await.unwrap_err();
        })
    });

    let rendered = handle.render();
    for line in [
        r#"nas_access_requests_submitted_total{outcome="accepted"} 1"#,
        r#"nas_access_requests_submitted_total{outcome="invalid"} 2"#,
        r#"nas_access_request_lookups_total{outcome="found"} 1"#,
        r#"nas_access_request_lookups_total{outcome="invalid"} 1"#,
        r#"nas_access_request_lookups_total{outcome="not_found"} 1"#,
        r#"nas_allow_list_lookups_total{outcome="found"} 1"#,
        r#"nas_allow_list_lookups_total{outcome="not_found"} 1"#,
    ] {
        assert!(rendered.contains(line), "missing {line} in:\n{rendered}");
    }
}
