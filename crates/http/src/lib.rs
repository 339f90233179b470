//! HTTP server facade for the storefront: router assembly, page errors and
//! graceful shutdown.

use anyhow::Context;
use axum::{routing::get, Router};
use tokio_util::sync::CancellationToken;

use storefront_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod html;
pub mod router;

pub use error::AppError;
use router::RouterBuilder;

/// Start the HTTP server and serve until `shutdown` is cancelled or the
/// process receives Ctrl+C / SIGTERM.
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &Settings,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let addr = settings.server.address();
    tracing::info!("starting HTTP server on {}", addr);

    let app = build_router(registry, settings);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    tracing::info!("HTTP server listening on http://{}", addr);

    let signal_token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = shutdown_signal() => {},
                _ = signal_token.cancelled() => {},
            }
            // In-flight page loads observe this and drop their results.
            signal_token.cancel();
        })
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped gracefully");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let mut router_builder = RouterBuilder::new()
        .with_tracing()
        .with_request_id()
        .with_static_files(&settings.server.static_dir)
        .route("/healthz", get(health_check));

    if let Some(timeout_ms) = settings.server.request_timeout_ms {
        router_builder = router_builder.with_timeout(timeout_ms);
    }

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            "mounting module routes under {}",
            module.mount_path()
        );
        router_builder = router_builder.mount_module(module.mount_path(), module.routes());
    }

    router_builder.build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("received SIGTERM signal");
        },
    }

    tracing::info!("shutting down gracefully...");
}
