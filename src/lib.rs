//! Storefront application: the catalog and product detail views, mounted as
//! modules on the storefront HTTP server.

pub mod modules;
pub mod services;
pub mod utils;
pub mod view_state;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use storefront_kernel::{InitCtx, ModuleRegistry, Settings};

pub use services::Services;
pub use view_state::ViewState;

/// Build the registry with every view module
pub fn build_registry(services: &Services) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, services);
    registry
}

/// Run the storefront server until shutdown.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let services = Services::from_settings(&settings, shutdown.clone())?;
    let registry = build_registry(&services);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_all(&ctx)
        .await
        .context("failed to initialize modules")?;
    registry
        .start_all(&ctx)
        .await
        .context("failed to start modules")?;

    let served = storefront_http::start_server(&registry, &settings, shutdown.clone()).await;
    shutdown.cancel();

    registry
        .stop_all()
        .await
        .context("failed to stop modules")?;

    served
}
