use anyhow::Context;
use storefront_kernel::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load storefront settings")?;
    storefront_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        api = %settings.api.base_url,
        "storefront-app bootstrap starting"
    );

    storefront_app::serve(settings).await?;

    tracing::info!("storefront-app stopped");
    Ok(())
}
