use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use storefront_app::modules::{
    catalog::{filter::CatalogFilter, view as catalog_view},
    product::view as product_view,
};
use storefront_app::{Services, ViewState};
use storefront_kernel::Settings;

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Browse the storefront catalog")]
struct Cli {
    /// Override the product API base url
    #[arg(long, global = true, env = "STOREFRONT_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the storefront pages over HTTP
    Serve,
    /// List active products, optionally filtered
    Catalog {
        /// Case-insensitive substring of the product name
        #[arg(short, long)]
        search: Option<String>,
        /// Inclusive upper bound on price
        #[arg(short = 'p', long, value_parser = parse_max_price)]
        max_price: Option<f64>,
    },
    /// Show one product
    Product {
        /// Product identifier
        id: String,
        /// Carousel slot to show (0-based)
        #[arg(short, long, default_value_t = 0)]
        image: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load storefront settings")?;
    if let Some(api_url) = cli.api_url {
        settings.api.base_url = api_url;
    }
    storefront_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => storefront_app::serve(settings).await,
        Command::Catalog { search, max_price } => {
            let services = Services::from_settings(&settings, CancellationToken::new())?;
            let filter = CatalogFilter::new(search, max_price);
            let state = catalog_view::mount(
                &services.api,
                services.catalog_images.as_ref(),
                &services.page_token(),
            )
            .await;

            match state.error() {
                Some(message) => eprintln!("{}", message),
                None => {
                    let display = catalog_view::CatalogDisplay::from_state(&state, &filter);
                    print!("{}", catalog_view::render_text(&display));
                }
            }
            exit_status(&state)
        }
        Command::Product { id, image } => {
            let services = Services::from_settings(&settings, CancellationToken::new())?;
            let state = product_view::mount(
                &services.api,
                services.media.as_ref(),
                Some(id.as_str()),
                &services.page_token(),
            )
            .await;

            match &state {
                ViewState::Ready(page) => {
                    print!("{}", product_view::render_text(page, page.carousel(image)));
                }
                ViewState::Failed(message) => eprintln!("{}", message),
                ViewState::Idle | ViewState::Loading => println!("Loading..."),
            }
            exit_status(&state)
        }
    }
}

fn parse_max_price(raw: &str) -> Result<f64, String> {
    CatalogFilter::parse_max_price(raw)?.ok_or_else(|| "max_price must not be empty".to_string())
}

fn exit_status<T>(state: &ViewState<T>) -> anyhow::Result<()> {
    match state.error() {
        Some(message) => {
            tracing::debug!(%message, "view failed");
            std::process::exit(1)
        }
        None => Ok(()),
    }
}
