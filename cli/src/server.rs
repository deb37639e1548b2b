// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! HTTP server bootstrap for `nas serve`.
//!
//! Builds the repositories selected by the configuration, wires them into the
//! access request service and serves the axum router until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use nas_core::application::access_service::describe_metrics;
use nas_core::application::repository_factory::build_repositories;
use nas_core::application::StandardAccessRequestService;
use nas_core::domain::service_config::{MetricsConfig, ServiceConfigManifest};
use nas_core::presentation::app;

pub async fn start_server(config: ServiceConfigManifest) -> Result<()> {
    config.validate().context("Configuration validation failed")?;

    info!(
        name = %config.metadata.name,
        backend = ?config.spec.storage.backend,
        "Starting NAS"
    );

    if config.spec.observability.metrics.enabled {
        install_metrics_exporter(&config.spec.observability.metrics)?;
    }

    let backend = config.storage_backend()?;
    let seed = config.seed_entries()?;
    let repositories = build_repositories(&backend, seed)
        .await
        .context("Failed to initialise storage")?;

    let service = Arc::new(StandardAccessRequestService::new(
        repositories.access_requests,
        repositories.allow_list,
    ));
    let app = app(service);

    let addr = format!(
        "{}:{}",
        config.spec.network.bind_address, config.spec.network.port
    );
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("NAS listening on http://{}/nas/api/v2", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("NAS shutting down");

    Ok(())
}

fn install_metrics_exporter(config: &MetricsConfig) -> Result<()> {
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {e}"))?;

    describe_metrics();
    info!("Prometheus metrics exposed on http://{}/metrics", addr);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
